use std::fmt;
use std::path::{Path, PathBuf};

/// Stable key of an open document. Keys are never reused within the
/// lifetime of an arena, so a stale key can't alias a newer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(usize);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document#{}", self.0)
    }
}

/// Where a document's content lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Not yet saved anywhere.
    Untitled(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub location: Location,
    pub language: Option<String>,
}

impl DocumentInfo {
    pub fn untitled(name: impl Into<String>) -> Self {
        DocumentInfo {
            location: Location::Untitled(name.into()),
            language: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        DocumentInfo {
            location: Location::File(path.into()),
            language: None,
        }
    }

    pub fn is_untitled(&self) -> bool {
        matches!(self.location, Location::Untitled(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Untitled(_) => None,
        }
    }
}

/// Arena of the documents a host has open. Removing a document leaves its
/// slot empty rather than reclaiming it, so keys stay unique and the arena
/// grows by one slot for every document ever opened.
#[derive(Debug, Default)]
pub struct Documents {
    slots: Vec<Option<DocumentInfo>>,
}

impl Documents {
    pub fn new() -> Self {
        Documents { slots: Vec::new() }
    }

    pub fn insert(&mut self, info: DocumentInfo) -> DocumentId {
        self.slots
            .push(Some(info));
        DocumentId(
            self.slots
                .len()
                - 1,
        )
    }

    pub fn get(&self, id: DocumentId) -> Option<&DocumentInfo> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut DocumentInfo> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: DocumentId) -> Option<DocumentInfo> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::take)
    }

    /// Find the open document backed by the given file.
    pub fn find_file(&self, path: &Path) -> Option<DocumentId> {
        self.iter()
            .find(|(_, info)| info.path() == Some(path))
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &DocumentInfo)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref()
                    .map(|info| (DocumentId(index), info))
            })
    }

    pub fn len(&self) -> usize {
        self.iter()
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
