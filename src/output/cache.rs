use std::collections::BTreeMap;

use crate::exchange::Exchange;
use crate::host::DocumentId;

/// What we know about one open result document.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub document: DocumentId,
    pub exchange: Exchange,
    /// Formatting was deferred until the document next gains focus.
    pub pretty_print_needed: bool,
    delete_file: bool,
}

impl CacheEntry {
    /// Whether the file behind the document is ours to delete. Fixed when
    /// the entry is created.
    pub fn delete_file(&self) -> bool {
        self.delete_file
    }
}

/// Open result documents and the exchanges they show, at most one entry
/// per document.
#[derive(Debug, Default)]
pub struct OutputCache {
    entries: BTreeMap<DocumentId, CacheEntry>,
}

impl OutputCache {
    pub fn new() -> Self {
        OutputCache {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, document: DocumentId) -> Option<&CacheEntry> {
        self.entries
            .get(&document)
    }

    pub fn get_mut(&mut self, document: DocumentId) -> Option<&mut CacheEntry> {
        self.entries
            .get_mut(&document)
    }

    /// Bind the document to the exchange. An existing entry is updated in
    /// place and keeps its original `delete_file`; the prior state of the
    /// entry is returned so that a failed dispatch can put it back.
    pub fn upsert(
        &mut self,
        document: DocumentId,
        exchange: Exchange,
        delete_file: bool,
    ) -> Option<CacheEntry> {
        match self
            .entries
            .get_mut(&document)
        {
            Some(entry) => {
                let previous = entry.clone();
                entry.exchange = exchange;
                entry.pretty_print_needed = false;
                Some(previous)
            }
            None => {
                self.entries
                    .insert(
                        document,
                        CacheEntry {
                            document,
                            exchange,
                            pretty_print_needed: false,
                            delete_file,
                        },
                    );
                None
            }
        }
    }

    /// Undo an upsert: put back the previous entry, or drop the one that
    /// was inserted.
    pub fn restore(&mut self, document: DocumentId, previous: Option<CacheEntry>) {
        match previous {
            Some(entry) => {
                self.entries
                    .insert(document, entry);
            }
            None => {
                self.entries
                    .remove(&document);
            }
        }
    }

    pub fn remove(&mut self, document: DocumentId) -> Option<CacheEntry> {
        self.entries
            .remove(&document)
    }

    /// The documents currently showing results, oldest first.
    pub fn documents(&self) -> Vec<DocumentId> {
        self.entries
            .keys()
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .is_empty()
    }
}
