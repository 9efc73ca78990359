use super::{language, Outcome, Rendering, ResponseHandler};
use crate::config::{Config, ResponseViewMode};
use crate::content::select;
use crate::exchange::Exchange;
use crate::host::{DocumentId, Host, HostError};

/// Opens a new untitled document holding the response. This is the last
/// resort, and applies in every mode except `none`.
pub struct OpenDocument;

impl ResponseHandler for OpenDocument {
    fn name(&self) -> &'static str {
        "open"
    }

    fn handle(
        &self,
        exchange: &Exchange,
        _visible: &[DocumentId],
        host: &mut dyn Host,
        config: &Config,
    ) -> Result<Outcome, HostError> {
        if config
            .settings
            .response_view_mode
            == ResponseViewMode::None
        {
            return Ok(Outcome::Declined);
        }

        let selection = select(exchange, &config.settings);
        let document = host.open_untitled(&selection.text(), language(exchange, &selection))?;
        let viewer = host.show_document(document, false)?;

        Ok(Outcome::Rendered(Rendering {
            document,
            viewer,
            delete_file: false,
        }))
    }
}
