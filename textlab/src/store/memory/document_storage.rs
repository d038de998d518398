use std::collections::{HashMap, HashSet};

use crate::collection::Document;
use crate::common::stream::DocumentStream;
use crate::common::{atomic, Atomic};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};
use crate::index::PrefixMap;
use crate::store::{CompiledDocumentQuery, DocumentCollection, DocumentQuery};

/// In-memory [DocumentCollection].
///
/// Documents are kept by name, with a [PrefixMap] over the names answering prefix
/// queries. Iteration yields documents in ascending name order. Clones share the
/// same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStorage {
    inner: Atomic<DocumentMap>,
}

#[derive(Default)]
struct DocumentMap {
    documents: HashMap<String, Document>,
    names: PrefixMap<String>,
}

impl DocumentMap {
    fn insert(&mut self, document: Document) {
        let name = document.name().to_string();
        self.names.add(&name, name.clone());
        self.documents.insert(name, document);
    }

    fn remove(&mut self, name: &str) -> TextlabResult<()> {
        if self.documents.remove(name).is_none() {
            return Err(not_exists(name));
        }
        self.names.delete(name, &name.to_string())
    }
}

impl InMemoryDocumentStorage {
    pub fn new() -> Self {
        InMemoryDocumentStorage {
            inner: atomic(DocumentMap::default()),
        }
    }

    /// Number of stored documents.
    pub fn size(&self) -> usize {
        self.inner.read_with(|map| map.documents.len())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read_with(|map| map.documents.contains_key(name))
    }
}

impl DocumentCollection for InMemoryDocumentStorage {
    fn load(&self, name: &str) -> TextlabResult<Document> {
        self.inner
            .read_with(|map| map.documents.get(name).cloned())
            .ok_or_else(|| not_exists(name))
    }

    fn load_iterator(&self, query: &DocumentQuery) -> TextlabResult<DocumentStream<'_>> {
        let query = query.compile()?;
        let mut names: Vec<String> = self
            .inner
            .read_with(|map| map.names.values(&query.prefix).cloned().collect());
        names.sort();
        log::debug!(
            "Document cursor over {} candidates with prefix '{}'",
            names.len(),
            query.prefix
        );
        Ok(Box::new(DocumentCursor {
            storage: self,
            names: names.into_iter(),
            query,
            emitted: 0,
        }))
    }

    fn save(&self, document: Document) -> TextlabResult<()> {
        self.inner.write_with(|map| {
            if map.documents.contains_key(document.name()) {
                return Err(exists(document.name()));
            }
            map.insert(document);
            Ok(())
        })
    }

    fn save_all(&self, documents: Vec<Document>) -> TextlabResult<()> {
        self.inner.write_with(|map| {
            let mut batch = HashSet::with_capacity(documents.len());
            for document in documents.iter() {
                if map.documents.contains_key(document.name()) || !batch.insert(document.name()) {
                    return Err(exists(document.name()));
                }
            }
            for document in documents {
                map.insert(document);
            }
            Ok(())
        })
    }

    fn delete(&self, name: &str) -> TextlabResult<()> {
        self.inner.write_with(|map| map.remove(name))
    }

    fn delete_all(&self, prefix: &str) -> TextlabResult<usize> {
        self.inner.write_with(|map| {
            let names = map.names.get(prefix);
            for name in names.iter() {
                map.remove(name)?;
            }
            log::debug!("Deleted {} documents with prefix '{}'", names.len(), prefix);
            Ok(names.len())
        })
    }
}

/// Walks a snapshot of candidate names, loading each document only when it is
/// requested. The storage lock is never held between items.
struct DocumentCursor<'a> {
    storage: &'a InMemoryDocumentStorage,
    names: std::vec::IntoIter<String>,
    query: CompiledDocumentQuery,
    emitted: usize,
}

impl Iterator for DocumentCursor<'_> {
    type Item = TextlabResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(limit) = self.query.limit {
            if self.emitted >= limit {
                return None;
            }
        }
        for name in self.names.by_ref() {
            // documents deleted after the snapshot are skipped
            let document = self.storage.inner.read_with(|map| map.documents.get(&name).cloned());
            if let Some(document) = document {
                if self.query.accepts(&document) {
                    self.emitted += 1;
                    return Some(Ok(document));
                }
            }
        }
        None
    }
}

fn not_exists(name: &str) -> TextlabError {
    log::error!("Document `{}` does not exist", name);
    TextlabError::new(
        &format!("Document `{}` does not exist!", name),
        ErrorKind::NotFound,
    )
}

fn exists(name: &str) -> TextlabError {
    log::error!("Document `{}` already stored", name);
    TextlabError::new(
        &format!("Document `{}` already stored!", name),
        ErrorKind::AlreadyExists,
    )
}
