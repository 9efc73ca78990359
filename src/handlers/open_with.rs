use tracing::info;

use super::{write_selection, Outcome, ResponseHandler};
use crate::config::Config;
use crate::exchange::Exchange;
use crate::host::{DocumentId, Host, HostError};

/// Hands the response to a viewer outside the editor when the exchange
/// carries an `openWith` directive. The directive's value, if a string,
/// names the kind of viewer wanted.
pub struct OpenWith;

impl ResponseHandler for OpenWith {
    fn name(&self) -> &'static str {
        "open-with"
    }

    fn handle(
        &self,
        exchange: &Exchange,
        _visible: &[DocumentId],
        host: &mut dyn Host,
        config: &Config,
    ) -> Result<Outcome, HostError> {
        if !exchange.has_metadata("openWith") {
            return Ok(Outcome::Declined);
        }

        let path = write_selection(exchange, host, config)?;
        let viewer_type = exchange.metadata_str("openWith");

        host.open_external(&path, viewer_type)?;
        info!("Response opened externally from {}", path.display());

        Ok(Outcome::Handled)
    }
}
