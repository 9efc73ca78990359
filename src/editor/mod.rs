use lsp_server::Connection;
use lsp_types::{
    CodeLensOptions, HoverProviderCapability, InitializeParams, ServerCapabilities,
    TextDocumentSyncCapability, TextDocumentSyncKind,
};
use tracing::{debug, info};

use response_view::config::Config;

mod server;
mod workspace;

/// Serve result-document annotations to an editor over standard input and
/// output. Settings passed by the editor at initialization take precedence
/// over any that were loaded from a file.
pub(crate) fn run_language_server(
    config: Config,
) -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
    debug!("Starting Response View Language Server");

    let (connection, threads) = Connection::stdio();

    let capabilities = serde_json::to_value(ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        code_lens_provider: Some(CodeLensOptions {
            resolve_provider: Some(false),
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        ..Default::default()
    })?;

    // extract any initialization parameters passed from the editor.
    if let Ok(params) = connection.initialize(capabilities) {
        let params = serde_json::from_value::<InitializeParams>(params)?;

        let config = match params.initialization_options {
            Some(options) => Config::from_value(options)?,
            None => config,
        };

        info!("Response View Language Server starting on stdin");

        let workspace = workspace::Workspace::new(std::env::temp_dir());
        let server = server::ResponseViewServer::new(workspace, config);

        server.run(connection)?;
    }

    threads.join()?;
    Ok(())
}
