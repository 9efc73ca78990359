//! The ways an exchange can be displayed, tried in a fixed order until one
//! of them takes it.

use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::content::{extension_for, language_for, select, Selection};
use crate::exchange::Exchange;
use crate::host::{DocumentId, Host, HostError, ViewerId};

mod open;
mod open_with;
mod preview;
mod reuse;
mod save;

pub use open::OpenDocument;
pub use open_with::OpenWith;
pub use preview::PreviewDocument;
pub use reuse::ReuseDocument;
pub use save::SaveFile;

/// A document now representing an exchange, the viewer showing it, and
/// whether we own the file behind it and must delete it on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendering {
    pub document: DocumentId,
    pub viewer: ViewerId,
    pub delete_file: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This handler doesn't apply.
    Declined,
    /// Displayed somewhere we don't track.
    Handled,
    Rendered(Rendering),
}

/// One way of displaying an exchange. Handlers may do host I/O but never
/// touch the output cache; what they return decides what gets cached.
/// Running a handler twice on the same input must not do anything the
/// host's own document opening wouldn't already make idempotent.
pub trait ResponseHandler {
    fn name(&self) -> &'static str;

    /// `visible` lists the documents currently showing results.
    fn handle(
        &self,
        exchange: &Exchange,
        visible: &[DocumentId],
        host: &mut dyn Host,
        config: &Config,
    ) -> Result<Outcome, HostError>;
}

pub struct Chain {
    handlers: Vec<Box<dyn ResponseHandler>>,
}

impl Chain {
    pub fn new(handlers: Vec<Box<dyn ResponseHandler>>) -> Self {
        Chain { handlers }
    }

    /// Explicit save and open-with directives come first, so they are
    /// honoured before any document is created; reusing a document comes
    /// before opening another.
    pub fn standard() -> Self {
        Chain::new(vec![
            Box::new(SaveFile),
            Box::new(OpenWith),
            Box::new(PreviewDocument),
            Box::new(ReuseDocument),
            Box::new(OpenDocument),
        ])
    }

    /// Run the handlers in order, returning the first outcome that isn't
    /// a decline. A host failure in a handler ends the dispatch.
    pub fn dispatch(
        &self,
        exchange: &Exchange,
        visible: &[DocumentId],
        host: &mut dyn Host,
        config: &Config,
    ) -> Result<Outcome, HostError> {
        for handler in &self.handlers {
            match handler.handle(exchange, visible, host, config)? {
                Outcome::Declined => continue,
                outcome => {
                    debug!(handler = handler.name(), ?outcome, "Response handled");
                    return Ok(outcome);
                }
            }
        }

        debug!("No response handler applied");
        Ok(Outcome::Declined)
    }
}

/// Base name for files written for an exchange.
pub(crate) fn file_stem(exchange: &Exchange) -> String {
    let name = exchange
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("response");

    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The extension to use for a selection: its own if it has one, otherwise
/// whatever the response content type implies.
pub(crate) fn extension(exchange: &Exchange, selection: &Selection) -> Option<&'static str> {
    selection
        .extension
        .or_else(|| {
            exchange
                .response
                .as_ref()
                .and_then(|response| response.mime_type())
                .and_then(|mime| extension_for(&mime))
        })
}

pub(crate) fn language(exchange: &Exchange, selection: &Selection) -> Option<&'static str> {
    extension(exchange, selection).and_then(language_for)
}

/// Select content for the exchange and write it to a temporary file.
pub(crate) fn write_selection(
    exchange: &Exchange,
    host: &mut dyn Host,
    config: &Config,
) -> Result<PathBuf, HostError> {
    let selection = select(exchange, &config.settings);
    let extension = extension(exchange, &selection);

    host.write_temp_file(&selection.content, &file_stem(exchange), extension)
}
