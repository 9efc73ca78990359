use std::path::Component;

use super::{DocumentInfo, Location, TEMP_FOLDER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPattern {
    /// Any document not yet saved to disk.
    Untitled,
    /// Files with a directory of this name somewhere in their path.
    UnderFolder(String),
}

impl DocumentPattern {
    pub fn matches(&self, info: &DocumentInfo) -> bool {
        match (self, &info.location) {
            (DocumentPattern::Untitled, Location::Untitled(_)) => true,
            (DocumentPattern::UnderFolder(folder), Location::File(path)) => {
                let parent = match path.parent() {
                    Some(parent) => parent,
                    None => return false,
                };
                parent
                    .components()
                    .any(|component| match component {
                        Component::Normal(name) => name == folder.as_str(),
                        _ => false,
                    })
            }
            _ => false,
        }
    }
}

/// Selects the documents the host should consult us about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter(Vec<DocumentPattern>);

impl DocumentFilter {
    pub fn new(patterns: Vec<DocumentPattern>) -> Self {
        DocumentFilter(patterns)
    }

    /// Untitled documents, and files in the temporary output folder.
    pub fn result_documents() -> Self {
        DocumentFilter(vec![
            DocumentPattern::Untitled,
            DocumentPattern::UnderFolder(TEMP_FOLDER.to_string()),
        ])
    }

    pub fn matches(&self, info: &DocumentInfo) -> bool {
        self.0
            .iter()
            .any(|pattern| pattern.matches(info))
    }
}
