use lsp_server::{Connection, Message, Notification, Request, Response};
use lsp_types::{
    CodeLens, CodeLensParams, DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, Hover, HoverParams, Uri,
};
use serde::Deserialize;
use serde_json::{from_value, Value};
use tracing::{debug, error, info, warn};

use response_view::config::Config;
use response_view::exchange::Exchange;
use response_view::host::HostEvent;
use response_view::output::ResponseOutput;

use super::workspace::Workspace;

type Failure = Box<dyn std::error::Error + Sync + Send>;

/// Parameters of the `responseView/didChangeActiveEditor` notification.
#[derive(Debug, Deserialize)]
struct ActiveEditorParams {
    uri: Option<Uri>,
}

pub struct ResponseViewServer {
    workspace: Workspace,
    output: ResponseOutput,
}

impl ResponseViewServer {
    pub fn new(mut workspace: Workspace, config: Config) -> Self {
        let output = ResponseOutput::start(&mut workspace, config);
        Self { workspace, output }
    }

    /// Main server loop that handles incoming LSP messages
    pub fn run(mut self, connection: Connection) -> Result<(), Failure> {
        info!("Starting Language Server main loop");

        for message in &connection.receiver {
            match message {
                Message::Request(request) => {
                    if let Err(err) = self.handle_request(request, &|msg| {
                        connection
                            .sender
                            .send(msg)
                    }) {
                        error!("Error handling request: {}", err);
                    }
                }
                Message::Notification(notification) => {
                    if notification.method == "exit" {
                        break;
                    }

                    if let Err(error) = self.handle_notification(notification, &|message| {
                        connection
                            .sender
                            .send(message)
                    }) {
                        error!("Error handling notification: {}", error);
                    }
                }
                Message::Response(response) => {
                    // answers to showDocument, applyEdit and formatDocument
                    debug!("Editor responded to request {:?}", response.id);
                }
            }
        }

        self.output
            .shutdown(&mut self.workspace);
        Ok(())
    }

    fn flush<E>(&mut self, sender: &dyn Fn(Message) -> Result<(), E>) -> Result<(), Failure>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        for message in self
            .workspace
            .take_outgoing()
        {
            sender(message)?;
        }
        Ok(())
    }

    fn handle_request<E>(
        &mut self,
        req: Request,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Failure>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match req
            .method
            .as_str()
        {
            "textDocument/codeLens" => match from_value::<CodeLensParams>(req.params) {
                Ok(params) => {
                    let result = self.handle_code_lens(params);
                    sender(Message::Response(Response::new_ok(req.id, result)))?;
                }
                Err(err) => {
                    let response = Response::new_err(
                        req.id,
                        lsp_server::ErrorCode::InvalidParams as i32,
                        err.to_string(),
                    );
                    sender(Message::Response(response))?;
                }
            },
            "textDocument/hover" => match from_value::<HoverParams>(req.params) {
                Ok(params) => {
                    let result = self.handle_hover(params);
                    sender(Message::Response(Response::new_ok(req.id, result)))?;
                }
                Err(err) => {
                    let response = Response::new_err(
                        req.id,
                        lsp_server::ErrorCode::InvalidParams as i32,
                        err.to_string(),
                    );
                    sender(Message::Response(response))?;
                }
            },
            "shutdown" => {
                info!("Language Server received shutdown request");
                let response = Response::new_ok(req.id, Value::Null);
                sender(Message::Response(response))?;
            }
            _ => {
                warn!("Unhandled request method: {}", req.method);
                let response = Response::new_err(
                    req.id,
                    lsp_server::ErrorCode::MethodNotFound as i32,
                    format!("Method not found: {}", req.method),
                );
                sender(Message::Response(response))?;
            }
        }
        Ok(())
    }

    fn handle_notification<E>(
        &mut self,
        notification: Notification,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Failure>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match notification
            .method
            .as_str()
        {
            "initialized" => {
                debug!("Editor initialized");
            }
            "textDocument/didOpen" => {
                let params: DidOpenTextDocumentParams = from_value(notification.params)?;
                let document = params.text_document;
                debug!("Document opened: {:?}", document.uri);
                self.workspace
                    .did_open(document.uri, document.text);
            }
            "textDocument/didChange" => {
                let params: DidChangeTextDocumentParams = from_value(notification.params)?;
                if let Some(change) = params
                    .content_changes
                    .into_iter()
                    .next()
                {
                    self.workspace
                        .did_change(&params.text_document.uri, change.text);
                }
            }
            "textDocument/didClose" => {
                let params: DidCloseTextDocumentParams = from_value(notification.params)?;
                self.handle_did_close(params);
            }
            "workspace/didChangeConfiguration" => {
                let params: DidChangeConfigurationParams = from_value(notification.params)?;
                let config = Config::from_value(params.settings)?;
                self.output
                    .set_config(config);
            }
            "responseView/show" => {
                let exchange: Exchange = from_value(notification.params)?;
                if let Err(error) = self
                    .output
                    .show(&mut self.workspace, exchange)
                {
                    // whatever was asked of the editor before the failure still goes
                    self.flush(sender)?;
                    return Err(error.into());
                }
            }
            "responseView/didChangeActiveEditor" => {
                let params: ActiveEditorParams = from_value(notification.params)?;
                self.handle_active_editor(params);
            }
            _ => {
                debug!("Unhandled notification method: {}", notification.method);
            }
        }

        self.flush(sender)
    }

    fn handle_did_close(&mut self, params: DidCloseTextDocumentParams) {
        let uri = params
            .text_document
            .uri;
        debug!("Document closed: {:?}", uri);

        let document = match self
            .workspace
            .lookup(&uri)
        {
            Some(document) => document,
            None => return,
        };

        if self
            .workspace
            .wants_close()
        {
            self.output
                .notify(&mut self.workspace, HostEvent::DocumentClosed(document));
        }

        self.workspace
            .forget(document);
    }

    fn handle_active_editor(&mut self, params: ActiveEditorParams) {
        let uri = match params.uri {
            Some(uri) => uri,
            None => {
                self.workspace
                    .deactivate();
                return;
            }
        };

        if let Some(event) = self
            .workspace
            .activate(&uri)
        {
            if self
                .workspace
                .wants_focus()
            {
                self.output
                    .notify(&mut self.workspace, event);
            }
        }
    }

    fn handle_code_lens(&self, params: CodeLensParams) -> Option<Vec<CodeLens>> {
        let document = self
            .workspace
            .lookup(&params.text_document.uri)?;

        if !self
            .workspace
            .annotates(document, false)
        {
            return None;
        }

        Some(
            self.output
                .summaries(document),
        )
    }

    fn handle_hover(&self, params: HoverParams) -> Option<Hover> {
        let position = params.text_document_position_params;
        let document = self
            .workspace
            .lookup(&position.text_document.uri)?;

        if !self
            .workspace
            .annotates(document, true)
        {
            return None;
        }

        self.output
            .hover(
                document,
                position.position,
                self.workspace
                    .first_line(document),
            )
    }
}
