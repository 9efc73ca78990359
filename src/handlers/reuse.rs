use tracing::debug;

use super::{language, Outcome, Rendering, ResponseHandler};
use crate::config::{Config, ResponseViewMode};
use crate::content::select;
use crate::exchange::Exchange;
use crate::host::{DocumentId, Host, HostError};

/// Puts the response into a result document that is already open, rather
/// than opening yet another one. Only untitled documents are reused; the
/// most recently opened one wins.
pub struct ReuseDocument;

impl ResponseHandler for ReuseDocument {
    fn name(&self) -> &'static str {
        "reuse"
    }

    fn handle(
        &self,
        exchange: &Exchange,
        visible: &[DocumentId],
        host: &mut dyn Host,
        config: &Config,
    ) -> Result<Outcome, HostError> {
        if config
            .settings
            .response_view_mode
            != ResponseViewMode::Reuse
        {
            return Ok(Outcome::Declined);
        }

        let document = visible
            .iter()
            .rev()
            .copied()
            .find(|document| {
                host.document(*document)
                    .map_or(false, |info| info.is_untitled())
            });

        let document = match document {
            Some(document) => document,
            None => {
                debug!("No open result document to reuse");
                return Ok(Outcome::Declined);
            }
        };

        let selection = select(exchange, &config.settings);
        host.replace_content(document, &selection.text(), language(exchange, &selection))?;
        let viewer = host.show_document(document, false)?;

        Ok(Outcome::Rendered(Rendering {
            document,
            viewer,
            delete_file: false,
        }))
    }
}
