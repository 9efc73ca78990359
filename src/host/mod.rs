//! The boundary between output management and the editing host. The host
//! owns documents and viewers; we only ever hold the opaque keys it hands
//! out, and ask it to do the I/O.

use std::fmt;
use std::path::{Path, PathBuf};

mod documents;
mod filter;

pub use documents::*;
pub use filter::*;

/// Name of the folder, somewhere under the host's temporary directory,
/// that holds the files backing preview documents.
pub const TEMP_FOLDER: &str = "response_view_tmp";

/// Key of an interactive surface showing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u64);

impl ViewerId {
    pub fn new(value: u64) -> Self {
        ViewerId(value)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

/// Notifications from the host that output management reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    DocumentClosed(DocumentId),
    ActiveViewerChanged {
        viewer: ViewerId,
        document: DocumentId,
    },
}

/// What a subscription registers for. The annotation interests carry the
/// filter deciding which documents the host should ask us about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interest {
    DocumentClosed,
    ActiveViewerChanged,
    Summaries(DocumentFilter),
    Hovers(DocumentFilter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

impl Subscription {
    pub fn new(value: u64) -> Self {
        Subscription(value)
    }
}

/// Facilities of the editing host. Every method is called from the host's
/// event thread; none of them are expected to be reentrant.
pub trait Host {
    fn subscribe(&mut self, interest: Interest) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);

    fn document(&self, document: DocumentId) -> Option<&DocumentInfo>;

    /// Write content to a new file in the temporary output folder, named
    /// after `name` and with the given extension, returning its path.
    fn write_temp_file(
        &mut self,
        content: &[u8],
        name: &str,
        extension: Option<&str>,
    ) -> Result<PathBuf, HostError>;

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<(), HostError>;

    fn delete_file(&mut self, path: &Path) -> Result<(), HostError>;

    /// Open (or find the already open) document for a file.
    fn open_file(&mut self, path: &Path) -> Result<DocumentId, HostError>;

    fn open_untitled(&mut self, content: &str, language: Option<&str>)
        -> Result<DocumentId, HostError>;

    fn replace_content(
        &mut self,
        document: DocumentId,
        content: &str,
        language: Option<&str>,
    ) -> Result<(), HostError>;

    /// Show a document, as a preview if requested, returning the viewer
    /// now displaying it.
    fn show_document(&mut self, document: DocumentId, preview: bool)
        -> Result<ViewerId, HostError>;

    /// Hand a file to a viewer outside the editor.
    fn open_external(&mut self, path: &Path, viewer_type: Option<&str>) -> Result<(), HostError>;

    /// The viewer that currently has focus, if any.
    fn active_viewer(&self) -> Option<ViewerId>;

    /// Run the host's generic format action on the viewer's document.
    /// `Ok(None)` means the host couldn't say whether anything changed.
    fn format_document(&mut self, viewer: ViewerId) -> Result<Option<bool>, HostError>;

    fn reveal_top(&mut self, viewer: ViewerId);
}

#[derive(Debug)]
pub enum HostError {
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    DocumentNotFound(DocumentId),
    ViewerNotFound(ViewerId),
    Unsupported(&'static str),
    Protocol(String),
}

impl HostError {
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        HostError::Io {
            path: path.to_path_buf(),
            error,
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Io { path, error } => write!(f, "{}: {}", path.display(), error),
            HostError::DocumentNotFound(document) => write!(f, "No such document: {}", document),
            HostError::ViewerNotFound(viewer) => write!(f, "No such viewer: {}", viewer),
            HostError::Unsupported(what) => write!(f, "Not supported by this host: {}", what),
            HostError::Protocol(details) => write!(f, "Host protocol failure: {}", details),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}
