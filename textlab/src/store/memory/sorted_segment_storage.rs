use std::ops::Bound::{Included, Unbounded};
use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use crate::collection::Segment;
use crate::common::stream::SegmentStream;
use crate::errors::TextlabResult;
use crate::store::{KeySelector, SegmentCollection, SegmentQuery};

/// `(doc_name, name, start, end, value)`
type SegmentKey = (String, String, usize, usize, String);

fn key_of(segment: &Segment) -> SegmentKey {
    (
        segment.doc_name().to_string(),
        segment.name().to_string(),
        segment.start(),
        segment.end(),
        segment.value().to_string(),
    )
}

/// [SegmentCollection] over a concurrent ordered skip list.
///
/// Entries are kept in segment order, so every cursor is pre-sorted and the
/// document selector turns into a range scan starting at the document prefix.
/// This mirrors what a durable ordered backend provides. Cursors are lazy and
/// lock-free; segments saved while a cursor is open may or may not be observed.
#[derive(Clone, Default)]
pub struct SortedSegmentStorage {
    entries: Arc<SkipMap<SegmentKey, Segment>>,
}

impl SortedSegmentStorage {
    pub fn new() -> Self {
        SortedSegmentStorage::default()
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    fn scan<'a>(&'a self, doc: &KeySelector) -> impl Iterator<Item = Segment> + 'a {
        let lower: SegmentKey = (doc.prefix().to_string(), String::new(), 0, 0, String::new());
        let doc = doc.clone();
        self.entries
            .range((Included(lower), Unbounded))
            .map(|entry| entry.value().clone())
            .take_while(move |segment| match &doc {
                KeySelector::Exact(name) => segment.doc_name() == name,
                KeySelector::Prefix(prefix) => segment.doc_name().starts_with(prefix.as_str()),
            })
    }
}

impl SegmentCollection for SortedSegmentStorage {
    fn load_iterator(&self, query: &SegmentQuery) -> TextlabResult<SegmentStream<'_>> {
        let query = query.compile()?;
        let limit = query.limit.unwrap_or(usize::MAX);
        log::debug!(
            "Range scan on {:?} for segments {:?}",
            query.doc,
            query.name
        );
        let stream = self
            .scan(&query.doc)
            .filter(move |segment| query.accepts(segment))
            .take(limit)
            .map(Ok);
        Ok(Box::new(stream))
    }

    fn save(&self, segments: Vec<Segment>) -> TextlabResult<()> {
        for segment in segments {
            self.entries.insert(key_of(&segment), segment);
        }
        Ok(())
    }

    fn delete(&self, query: &SegmentQuery) -> TextlabResult<usize> {
        let selected: Vec<Segment> = self.load_iterator(query)?.collect::<TextlabResult<_>>()?;
        let deleted = selected
            .iter()
            .filter(|segment| self.entries.remove(&key_of(segment)).is_some())
            .count();
        log::debug!("Deleted {} segments", deleted);
        Ok(deleted)
    }
}
