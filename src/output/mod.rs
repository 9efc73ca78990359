//! Output management: showing exchanges, and keeping what we know about
//! the documents showing them in step with the host.

use lsp_types::{CodeLens, Hover, Position};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::exchange::Exchange;
use crate::handlers::{Chain, Outcome, Rendering};
use crate::host::{DocumentFilter, DocumentId, Host, HostError, HostEvent, Interest, Subscription, ViewerId};

pub mod annotations;
mod cache;
pub mod pretty;

pub use cache::*;

/// Entry point for displaying responses. Created once when the host
/// starts up, registering for the host events it needs, and shut down
/// explicitly when the host goes away.
pub struct ResponseOutput {
    config: Config,
    chain: Chain,
    cache: OutputCache,
    subscriptions: Vec<Subscription>,
}

impl ResponseOutput {
    pub fn start(host: &mut dyn Host, config: Config) -> Self {
        ResponseOutput::with_chain(host, config, Chain::standard())
    }

    pub fn with_chain(host: &mut dyn Host, config: Config, chain: Chain) -> Self {
        let filter = DocumentFilter::result_documents();

        let subscriptions = vec![
            host.subscribe(Interest::Hovers(filter.clone())),
            host.subscribe(Interest::Summaries(filter)),
            host.subscribe(Interest::DocumentClosed),
            host.subscribe(Interest::ActiveViewerChanged),
        ];

        info!("Response output started");

        ResponseOutput {
            config,
            chain,
            cache: OutputCache::new(),
            subscriptions,
        }
    }

    pub fn shutdown(self, host: &mut dyn Host) {
        for subscription in self.subscriptions {
            host.unsubscribe(subscription);
        }
        let open = self
            .cache
            .len();
        info!(
            "Response output stopped with {} result document{} open",
            open,
            if open == 1 { "" } else { "s" }
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        debug!(?config, "Configuration changed");
        self.config = config;
    }

    pub fn cache(&self) -> &OutputCache {
        &self.cache
    }

    /// Display an exchange. Incomplete exchanges are ignored. If displaying
    /// fails partway, the error is returned and the cache is left as it
    /// was.
    pub fn show(&mut self, host: &mut dyn Host, exchange: Exchange) -> Result<(), HostError> {
        if !exchange.is_complete() {
            warn!("Ignoring exchange without both request and response");
            return Ok(());
        }

        let visible = self
            .cache
            .documents();

        let rendering = match self
            .chain
            .dispatch(&exchange, &visible, host, &self.config)?
        {
            Outcome::Declined | Outcome::Handled => return Ok(()),
            Outcome::Rendered(rendering) => rendering,
        };

        let Rendering {
            document,
            viewer,
            delete_file,
        } = rendering;

        let previous = self
            .cache
            .upsert(document, exchange, delete_file);

        match previous {
            Some(_) => debug!(%document, "Result document updated"),
            None => debug!(%document, delete_file, "Result document added"),
        }

        match pretty::schedule(host, &self.config.settings, viewer) {
            Ok(needed) => {
                if let Some(entry) = self
                    .cache
                    .get_mut(document)
                {
                    entry.pretty_print_needed = needed;
                }
                Ok(())
            }
            Err(error) => {
                self.cache
                    .restore(document, previous);
                Err(error)
            }
        }
    }

    /// React to a host event.
    pub fn notify(&mut self, host: &mut dyn Host, event: HostEvent) {
        match event {
            HostEvent::ActiveViewerChanged { viewer, document } => {
                self.focused(host, viewer, document)
            }
            HostEvent::DocumentClosed(document) => self.closed(host, document),
        }
    }

    fn focused(&mut self, host: &mut dyn Host, viewer: ViewerId, document: DocumentId) {
        let entry = match self
            .cache
            .get_mut(document)
        {
            Some(entry) if entry.pretty_print_needed => entry,
            _ => return,
        };

        // cleared before formatting so that it is only ever tried once
        entry.pretty_print_needed = false;

        match pretty::apply(host, &self.config.settings, viewer) {
            Ok(formatted) => debug!(%document, formatted, "Deferred formatting done"),
            Err(error) => error!(%document, "Formatting failed: {}", error),
        }
    }

    fn closed(&mut self, host: &mut dyn Host, document: DocumentId) {
        let entry = match self
            .cache
            .remove(document)
        {
            Some(entry) => entry,
            None => return,
        };

        debug!(%document, "Result document closed");

        if !entry.delete_file() {
            return;
        }

        let path = host
            .document(document)
            .and_then(|info| info.path())
            .map(|path| path.to_path_buf());

        match path {
            Some(path) => match host.delete_file(&path) {
                Ok(()) => debug!("Deleted {}", path.display()),
                Err(error) => error!("Unable to delete {}: {}", path.display(), error),
            },
            None => error!(%document, "No file known for closed document"),
        }
    }

    pub fn summaries(&self, document: DocumentId) -> Vec<CodeLens> {
        annotations::summaries(&self.cache, &self.config.settings, document)
    }

    pub fn hover(
        &self,
        document: DocumentId,
        position: Position,
        first_line: Option<&str>,
    ) -> Option<Hover> {
        annotations::hover(&self.cache, document, position, first_line)
    }
}
