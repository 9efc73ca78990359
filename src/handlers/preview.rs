use super::{write_selection, Outcome, Rendering, ResponseHandler};
use crate::config::{Config, ResponseViewMode};
use crate::exchange::Exchange;
use crate::host::{DocumentId, Host, HostError};

/// Writes the selected content to a temporary file and shows it in a
/// preview viewer. The file belongs to us and goes when the document is
/// closed.
pub struct PreviewDocument;

impl ResponseHandler for PreviewDocument {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn handle(
        &self,
        exchange: &Exchange,
        _visible: &[DocumentId],
        host: &mut dyn Host,
        config: &Config,
    ) -> Result<Outcome, HostError> {
        if !config
            .workbench
            .enable_preview
            || config
                .settings
                .response_view_mode
                != ResponseViewMode::Preview
        {
            return Ok(Outcome::Declined);
        }

        let has_raw_body = exchange
            .response
            .as_ref()
            .map_or(false, |response| {
                response
                    .raw_body
                    .is_some()
            });
        if !has_raw_body {
            return Ok(Outcome::Declined);
        }

        let path = write_selection(exchange, host, config)?;
        let document = host.open_file(&path)?;
        let viewer = host.show_document(document, true)?;

        Ok(Outcome::Rendered(Rendering {
            document,
            viewer,
            delete_file: true,
        }))
    }
}
