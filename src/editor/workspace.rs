//! The editor on the other end of the connection, as seen by output
//! management. Requests to the editor are queued as messages for the
//! server loop to send; none of them wait for an answer.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use lsp_server::{Message, Request, RequestId};
use lsp_types::{
    ApplyWorkspaceEditParams, Position, Range, ShowDocumentParams, TextEdit, Uri, WorkspaceEdit,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use response_view::host::{
    DocumentId, DocumentInfo, Documents, Host, HostError, HostEvent, Interest, Location,
    Subscription, ViewerId, TEMP_FOLDER,
};

pub struct Workspace {
    documents: Documents,
    uris: HashMap<Uri, DocumentId>,
    text: HashMap<DocumentId, String>,
    /// Content for untitled documents not yet shown in the editor.
    pending: HashMap<DocumentId, String>,
    viewers: HashMap<DocumentId, ViewerId>,
    active: Option<ViewerId>,
    subscriptions: BTreeMap<Subscription, Interest>,
    temp_dir: PathBuf,
    outgoing: Vec<Message>,
    counter: u64,
}

impl Workspace {
    pub fn new(temp_dir: PathBuf) -> Self {
        Workspace {
            documents: Documents::new(),
            uris: HashMap::new(),
            text: HashMap::new(),
            pending: HashMap::new(),
            viewers: HashMap::new(),
            active: None,
            subscriptions: BTreeMap::new(),
            temp_dir,
            outgoing: Vec::new(),
            counter: 0,
        }
    }

    fn next(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    /// Messages for the editor queued since the last call.
    pub fn take_outgoing(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outgoing)
    }

    fn send_request(&mut self, method: &str, params: impl Serialize) {
        let id = RequestId::from(self.next() as i32);
        self.outgoing
            .push(Message::Request(Request::new(id, method.to_string(), params)));
    }

    pub fn lookup(&self, uri: &Uri) -> Option<DocumentId> {
        self.uris
            .get(uri)
            .copied()
    }

    fn uri_of(&self, document: DocumentId) -> Option<Uri> {
        self.uris
            .iter()
            .find(|(_, id)| **id == document)
            .map(|(uri, _)| uri.clone())
    }

    fn viewer_of(&mut self, document: DocumentId) -> ViewerId {
        if let Some(viewer) = self
            .viewers
            .get(&document)
        {
            return *viewer;
        }
        let viewer = ViewerId::new(self.next());
        self.viewers
            .insert(document, viewer);
        viewer
    }

    fn document_of(&self, viewer: ViewerId) -> Option<DocumentId> {
        self.viewers
            .iter()
            .find(|(_, id)| **id == viewer)
            .map(|(document, _)| *document)
    }

    /// The editor opened a document, possibly one we asked it to open.
    pub fn did_open(&mut self, uri: Uri, text: String) -> DocumentId {
        let document = match self.lookup(&uri) {
            Some(document) => document,
            None => {
                let info = match file_path(&uri) {
                    Some(path) => DocumentInfo::file(path),
                    None => DocumentInfo::untitled(uri.as_str()),
                };
                let document = self
                    .documents
                    .insert(info);
                self.uris
                    .insert(uri, document);
                document
            }
        };

        self.text
            .insert(document, text);
        document
    }

    pub fn did_change(&mut self, uri: &Uri, text: String) {
        if let Some(document) = self.lookup(uri) {
            self.text
                .insert(document, text);
        }
    }

    /// Drop everything known about a closed document.
    pub fn forget(&mut self, document: DocumentId) {
        self.documents
            .remove(document);
        self.uris
            .retain(|_, id| *id != document);
        self.text
            .remove(&document);
        self.pending
            .remove(&document);
        if let Some(viewer) = self
            .viewers
            .remove(&document)
        {
            if self.active == Some(viewer) {
                self.active = None;
            }
        }
    }

    /// The editor reports that the given document now has focus.
    pub fn activate(&mut self, uri: &Uri) -> Option<HostEvent> {
        let document = match self.lookup(uri) {
            Some(document) => document,
            None => {
                self.active = None;
                return None;
            }
        };

        let viewer = self.viewer_of(document);
        self.active = Some(viewer);

        Some(HostEvent::ActiveViewerChanged { viewer, document })
    }

    /// The editor reports that no document has focus.
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    pub fn first_line(&self, document: DocumentId) -> Option<&str> {
        self.text
            .get(&document)
            .and_then(|text| {
                text.lines()
                    .next()
            })
    }

    /// Whether anything registered for close notifications.
    pub fn wants_close(&self) -> bool {
        self.subscriptions
            .values()
            .any(|interest| matches!(interest, Interest::DocumentClosed))
    }

    pub fn wants_focus(&self) -> bool {
        self.subscriptions
            .values()
            .any(|interest| matches!(interest, Interest::ActiveViewerChanged))
    }

    /// Whether summaries (or, if `hover`, hovers) were registered for
    /// documents like this one.
    pub fn annotates(&self, document: DocumentId, hover: bool) -> bool {
        let info = match self
            .documents
            .get(document)
        {
            Some(info) => info,
            None => return false,
        };

        self.subscriptions
            .values()
            .any(|interest| match interest {
                Interest::Summaries(filter) if !hover => filter.matches(info),
                Interest::Hovers(filter) if hover => filter.matches(info),
                _ => false,
            })
    }

    fn show(&mut self, uri: Uri, take_focus: bool, selection: Option<Range>) {
        let params = ShowDocumentParams {
            uri,
            external: None,
            take_focus: Some(take_focus),
            selection,
        };
        self.send_request("window/showDocument", params);
    }

    fn replace_all(&mut self, uri: Uri, content: &str) {
        let edit = TextEdit {
            range: Range {
                start: Position {
                    line: 0,
                    character: 0,
                },
                end: Position {
                    line: u32::MAX,
                    character: 0,
                },
            },
            new_text: content.to_string(),
        };

        let mut changes = HashMap::new();
        changes.insert(uri, vec![edit]);

        let params = ApplyWorkspaceEditParams {
            label: Some("Response".to_string()),
            edit: WorkspaceEdit {
                changes: Some(changes),
                ..Default::default()
            },
        };
        self.send_request("workspace/applyEdit", params);
    }
}

fn file_uri(path: &Path) -> Result<Uri, HostError> {
    let url = Url::from_file_path(path).map_err(|()| {
        HostError::Protocol(format!("Not an absolute path: {}", path.display()))
    })?;
    url.as_str()
        .parse::<Uri>()
        .map_err(|error| HostError::Protocol(format!("Invalid uri {}: {:?}", url, error)))
}

/// The local path a `file:` URI names, percent-decoded.
fn file_path(uri: &Uri) -> Option<PathBuf> {
    let url = Url::parse(uri.as_str()).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path()
        .ok()
}

impl Host for Workspace {
    fn subscribe(&mut self, interest: Interest) -> Subscription {
        let subscription = Subscription::new(self.next());
        self.subscriptions
            .insert(subscription, interest);
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscriptions
            .remove(&subscription);
    }

    fn document(&self, document: DocumentId) -> Option<&DocumentInfo> {
        self.documents
            .get(document)
    }

    fn write_temp_file(
        &mut self,
        content: &[u8],
        name: &str,
        extension: Option<&str>,
    ) -> Result<PathBuf, HostError> {
        let folder = self
            .temp_dir
            .join(TEMP_FOLDER);
        fs::create_dir_all(&folder).map_err(|error| HostError::io(&folder, error))?;

        let mut filename = format!("{}-{}", name, self.next());
        if let Some(extension) = extension {
            filename.push('.');
            filename.push_str(extension);
        }

        let path = folder.join(filename);
        fs::write(&path, content).map_err(|error| HostError::io(&path, error))?;

        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<(), HostError> {
        fs::write(path, content).map_err(|error| HostError::io(path, error))
    }

    fn delete_file(&mut self, path: &Path) -> Result<(), HostError> {
        fs::remove_file(path).map_err(|error| HostError::io(path, error))
    }

    fn open_file(&mut self, path: &Path) -> Result<DocumentId, HostError> {
        if let Some(document) = self
            .documents
            .find_file(path)
        {
            return Ok(document);
        }

        let uri = file_uri(path)?;
        let document = self
            .documents
            .insert(DocumentInfo::file(path));
        self.uris
            .insert(uri, document);
        Ok(document)
    }

    fn open_untitled(
        &mut self,
        content: &str,
        language: Option<&str>,
    ) -> Result<DocumentId, HostError> {
        let name = format!("untitled:Response-{}", self.next());
        let uri = name
            .parse::<Uri>()
            .map_err(|error| HostError::Protocol(format!("Invalid uri {}: {:?}", name, error)))?;

        let document = self
            .documents
            .insert(DocumentInfo {
                location: Location::Untitled(name),
                language: language.map(str::to_string),
            });
        self.uris
            .insert(uri, document);
        self.pending
            .insert(document, content.to_string());

        Ok(document)
    }

    fn replace_content(
        &mut self,
        document: DocumentId,
        content: &str,
        language: Option<&str>,
    ) -> Result<(), HostError> {
        let uri = self
            .uri_of(document)
            .ok_or(HostError::DocumentNotFound(document))?;

        if let Some(info) = self
            .documents
            .get_mut(document)
        {
            info.language = language.map(str::to_string);
        }

        self.text
            .insert(document, content.to_string());
        self.replace_all(uri, content);
        Ok(())
    }

    fn show_document(
        &mut self,
        document: DocumentId,
        preview: bool,
    ) -> Result<ViewerId, HostError> {
        let uri = self
            .uri_of(document)
            .ok_or(HostError::DocumentNotFound(document))?;

        let viewer = self.viewer_of(document);
        self.show(uri.clone(), !preview, None);

        if let Some(content) = self
            .pending
            .remove(&document)
        {
            self.text
                .insert(document, content.clone());
            self.replace_all(uri, &content);
        }

        Ok(viewer)
    }

    fn open_external(&mut self, path: &Path, _viewer_type: Option<&str>) -> Result<(), HostError> {
        let params = ShowDocumentParams {
            uri: file_uri(path)?,
            external: Some(true),
            take_focus: None,
            selection: None,
        };
        self.send_request("window/showDocument", params);
        Ok(())
    }

    fn active_viewer(&self) -> Option<ViewerId> {
        self.active
    }

    fn format_document(&mut self, viewer: ViewerId) -> Result<Option<bool>, HostError> {
        let uri = self
            .document_of(viewer)
            .and_then(|document| self.uri_of(document))
            .ok_or(HostError::ViewerNotFound(viewer))?;

        self.send_request("responseView/formatDocument", json!({ "uri": uri }));

        // the answer arrives later, if at all
        Ok(None)
    }

    fn reveal_top(&mut self, viewer: ViewerId) {
        let uri = match self
            .document_of(viewer)
            .and_then(|document| self.uri_of(document))
        {
            Some(uri) => uri,
            None => return,
        };

        let top = Position {
            line: 0,
            character: 0,
        };
        self.show(
            uri,
            self.active == Some(viewer),
            Some(Range {
                start: top,
                end: top,
            }),
        );
    }
}
