//! Storage capabilities consumed by the filter pipeline and their in-memory
//! implementations.
//!
//! The traits are the contract; any backend honoring them (including a durable one)
//! can drive the pipeline. The in-memory stores define the reference semantics.

use itertools::Itertools;
use std::collections::{HashMap, HashSet};

use crate::collection::{Document, Segment};
use crate::common::stream::{DocumentStream, SegmentStream};
use crate::common::Settings;
use crate::errors::TextlabResult;

pub mod memory;
mod query;

pub use memory::*;
pub use query::*;

/// A keyed store of [Document]s.
pub trait DocumentCollection: Send + Sync {
    /// Loads the document called `name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such document is stored.
    fn load(&self, name: &str) -> TextlabResult<Document>;

    /// Lazily yields the documents selected by `query`.
    fn load_iterator(&self, query: &DocumentQuery) -> TextlabResult<DocumentStream<'_>>;

    /// Eager variant of [DocumentCollection::load_iterator].
    fn load_all(&self, query: &DocumentQuery) -> TextlabResult<Vec<Document>> {
        self.load_iterator(query)?.collect()
    }

    /// Stores a new document.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a document with the same name is stored.
    fn save(&self, document: Document) -> TextlabResult<()>;

    /// Stores all documents or none of them.
    fn save_all(&self, documents: Vec<Document>) -> TextlabResult<()>;

    fn delete(&self, name: &str) -> TextlabResult<()>;

    /// Deletes every document whose name starts with `prefix` and returns how many
    /// were deleted.
    fn delete_all(&self, prefix: &str) -> TextlabResult<usize>;
}

/// A store of [Segment]s grouped by segment name.
pub trait SegmentCollection: Send + Sync {
    /// Lazily yields the segments selected by `query`. Implementations must honor
    /// `query.sort`; the segment matcher depends on doc_name order.
    fn load_iterator(&self, query: &SegmentQuery) -> TextlabResult<SegmentStream<'_>>;

    fn load(&self, query: &SegmentQuery) -> TextlabResult<HashSet<Segment>> {
        self.load_iterator(query)?.collect()
    }

    fn save(&self, segments: Vec<Segment>) -> TextlabResult<()>;

    /// Deletes every segment selected by `query` and returns how many were deleted.
    fn delete(&self, query: &SegmentQuery) -> TextlabResult<usize>;

    /// Number of selected segments per segment name.
    fn counts(&self, query: &SegmentQuery) -> TextlabResult<HashMap<String, usize>> {
        let segments = self.load(query)?;
        Ok(segments.iter().map(|s| s.name().to_string()).counts())
    }

    /// Number of selected segments per segment value.
    fn value_counts(&self, query: &SegmentQuery) -> TextlabResult<HashMap<String, usize>> {
        let segments = self.load(query)?;
        Ok(segments.iter().map(|s| s.value().to_string()).counts())
    }

    /// Number of stored segments called exactly `name`.
    fn count(&self, name: &str) -> TextlabResult<usize> {
        Ok(self.counts(&named(name))?.get(name).copied().unwrap_or(0))
    }
}

/// A store of named tool settings.
pub trait SettingsStorage: Send + Sync {
    /// Keys starting with `prefix`, in ascending order.
    fn list(&self, prefix: &str) -> TextlabResult<Vec<String>>;

    /// # Errors
    ///
    /// Returns `NotFound` if nothing is stored under `key`.
    fn load(&self, key: &str) -> TextlabResult<Settings>;

    /// Stores `settings` under `key`, replacing previous settings.
    fn save(&self, key: &str, settings: Settings) -> TextlabResult<()>;

    /// Removes the settings under `key`; removing a missing key is not an error.
    fn delete(&self, key: &str) -> TextlabResult<()>;
}
