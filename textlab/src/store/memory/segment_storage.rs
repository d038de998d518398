use std::collections::{HashMap, HashSet};

use crate::collection::Segment;
use crate::common::stream::{SegmentStream, SortedStream};
use crate::common::{atomic, Atomic};
use crate::errors::TextlabResult;
use crate::index::PrefixMap;
use crate::store::{CompiledSegmentQuery, KeySelector, SegmentCollection, SegmentQuery};

/// In-memory [SegmentCollection] keeping one hash set per segment name.
///
/// A [PrefixMap] over segment names answers name-prefix queries. Candidates are
/// collected under a read lock, so the returned stream does not observe later
/// writes. Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemorySegmentStorage {
    inner: Atomic<SegmentMap>,
}

#[derive(Default)]
struct SegmentMap {
    segments: HashMap<String, HashSet<Segment>>,
    names: PrefixMap<String>,
}

impl SegmentMap {
    fn candidate_names(&self, selector: &KeySelector) -> Vec<String> {
        match selector {
            KeySelector::Exact(name) => {
                if self.segments.contains_key(name) {
                    vec![name.clone()]
                } else {
                    Vec::new()
                }
            }
            KeySelector::Prefix(prefix) => self.names.values(prefix).cloned().collect(),
        }
    }

    fn select(&self, query: &CompiledSegmentQuery) -> Vec<Segment> {
        let mut selected = Vec::new();
        for name in self.candidate_names(&query.name) {
            if let Some(set) = self.segments.get(&name) {
                selected.extend(
                    set.iter()
                        .filter(|segment| query.accepts_doc_and_value(segment))
                        .cloned(),
                );
            }
        }
        selected
    }
}

impl InMemorySegmentStorage {
    pub fn new() -> Self {
        InMemorySegmentStorage {
            inner: atomic(SegmentMap::default()),
        }
    }

    /// Total number of stored segments.
    pub fn size(&self) -> usize {
        self.inner
            .read_with(|map| map.segments.values().map(|set| set.len()).sum())
    }

    /// Segment names currently stored, in ascending order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read_with(|map| map.segments.keys().cloned().collect());
        names.sort();
        names
    }
}

impl SegmentCollection for InMemorySegmentStorage {
    fn load_iterator(&self, query: &SegmentQuery) -> TextlabResult<SegmentStream<'_>> {
        let query = query.compile()?;
        let selected = self.inner.read_with(|map| map.select(&query));
        log::debug!(
            "Segment query on {:?} / {:?} selected {} segments",
            query.name,
            query.doc,
            selected.len()
        );

        let stream: SegmentStream<'_> = if query.sort {
            Box::new(SortedStream::new(selected.into_iter().map(Ok)))
        } else {
            Box::new(selected.into_iter().map(Ok))
        };
        match query.limit {
            Some(limit) => Ok(Box::new(stream.take(limit))),
            None => Ok(stream),
        }
    }

    fn save(&self, segments: Vec<Segment>) -> TextlabResult<()> {
        if segments.is_empty() {
            return Ok(());
        }
        self.inner.write_with(|map| {
            for segment in segments {
                let name = segment.name().to_string();
                if !map.segments.contains_key(&name) {
                    map.names.add(&name, name.clone());
                }
                map.segments.entry(name).or_default().replace(segment);
            }
        });
        Ok(())
    }

    fn delete(&self, query: &SegmentQuery) -> TextlabResult<usize> {
        let query = query.compile()?;
        self.inner.write_with(|map| {
            let mut selected = map.select(&query);
            if query.sort {
                selected.sort();
            }
            if let Some(limit) = query.limit {
                selected.truncate(limit);
            }

            let mut deleted = 0;
            for segment in selected.iter() {
                let emptied = match map.segments.get_mut(segment.name()) {
                    Some(set) => {
                        if set.remove(segment) {
                            deleted += 1;
                        }
                        set.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    let name = segment.name().to_string();
                    map.segments.remove(&name);
                    map.names.delete(&name, &name)?;
                }
            }
            log::debug!("Deleted {} segments", deleted);
            Ok(deleted)
        })
    }
}
