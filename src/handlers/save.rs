use std::path::Path;

use tracing::info;

use super::{Outcome, ResponseHandler};
use crate::config::Config;
use crate::exchange::Exchange;
use crate::host::{DocumentId, Host, HostError};

/// Writes the response body to the location named by the `save`
/// directive. Nothing is shown.
pub struct SaveFile;

impl ResponseHandler for SaveFile {
    fn name(&self) -> &'static str {
        "save"
    }

    fn handle(
        &self,
        exchange: &Exchange,
        _visible: &[DocumentId],
        host: &mut dyn Host,
        _config: &Config,
    ) -> Result<Outcome, HostError> {
        let target = match exchange.metadata_str("save") {
            Some(target) => Path::new(target),
            None => return Ok(Outcome::Declined),
        };

        let response = match &exchange.response {
            Some(response) => response,
            None => return Ok(Outcome::Declined),
        };

        let content = match (&response.raw_body, &response.body) {
            (Some(raw), _) => raw.clone(),
            (None, Some(body)) => body
                .as_bytes()
                .to_vec(),
            (None, None) => Vec::new(),
        };

        host.write_file(target, &content)?;
        info!("Response saved to {}", target.display());

        Ok(Outcome::Handled)
    }
}
