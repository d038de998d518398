use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use super::Document;
use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// A named annotation over the half-open char range `[start, end)` of a document.
///
/// The segment refers to its document by name only and caches the document length,
/// so offsets can be checked without the document being loaded. The invariant
/// `start < end <= doc_len` holds for every constructed segment and is re-checked on
/// every mutation.
///
/// Segments compare, hash and order by `(doc_name, name, start, end, value)`; the
/// cached `doc_len` is not part of their identity. The segment matcher relies on
/// this ordering to group segments by document.
///
/// Names are hierarchical by convention (`ne:per`, `ne:loc`, ...) so that a name
/// prefix query such as `ne:` selects a whole family.
///
/// ```rust
/// use textlab::collection::{Document, Segment};
///
/// let doc = Document::new("DOCUMENT A", "Dude was sick!").unwrap();
/// let seg = Segment::new("lemma", "dude", &doc, 0, 4).unwrap();
/// assert_eq!(seg.doc_name(), "DOCUMENT A");
/// assert_eq!(seg.doc_len(), 14);
/// assert!(Segment::new("lemma", "dude", &doc, 4, 4).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Segment {
    doc_name: String,
    name: String,
    start: usize,
    end: usize,
    value: String,
    doc_len: usize,
}

impl Segment {
    /// Creates a segment on a resident document.
    pub fn new(
        name: &str,
        value: &str,
        document: &Document,
        start: usize,
        end: usize,
    ) -> TextlabResult<Segment> {
        Segment::with_doc_ref(name, value, document.name(), document.len(), start, end)
    }

    /// Creates a segment from an explicit document name and length, for when no
    /// [Document] instance is at hand (e.g. when decoding stored records).
    pub fn with_doc_ref(
        name: &str,
        value: &str,
        doc_name: &str,
        doc_len: usize,
        start: usize,
        end: usize,
    ) -> TextlabResult<Segment> {
        check_bounds(start, end, doc_len)?;
        Ok(Segment {
            doc_name: doc_name.to_string(),
            name: name.to_string(),
            start,
            end,
            value: value.to_string(),
            doc_len,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn doc_name(&self) -> &str {
        &self.doc_name
    }

    pub fn doc_len(&self) -> usize {
        self.doc_len
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of chars covered by the segment.
    pub fn span(&self) -> usize {
        self.end - self.start
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn set_start(&mut self, start: usize) -> TextlabResult<()> {
        check_bounds(start, self.end, self.doc_len)?;
        self.start = start;
        Ok(())
    }

    /// Moves the end of the segment, e.g. while extending a multi-token entity.
    pub fn set_end(&mut self, end: usize) -> TextlabResult<()> {
        check_bounds(self.start, end, self.doc_len)?;
        self.end = end;
        Ok(())
    }

    /// Returns the same segment under another name.
    pub fn with_name(mut self, name: &str) -> Segment {
        self.name = name.to_string();
        self
    }

    /// True if this segment lies within `other` (same document assumed).
    #[inline]
    pub fn is_within(&self, other: &Segment) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// True if this segment covers `other` (same document assumed).
    #[inline]
    pub fn covers(&self, other: &Segment) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn to_record(&self) -> SegmentRecord {
        SegmentRecord {
            name: self.name.clone(),
            value: self.value.clone(),
            start: self.start,
            end: self.end,
            doc_name: self.doc_name.clone(),
            doc_len: self.doc_len,
        }
    }

    pub fn from_record(record: SegmentRecord) -> TextlabResult<Segment> {
        check_bounds(record.start, record.end, record.doc_len)?;
        Ok(Segment {
            doc_name: record.doc_name,
            name: record.name,
            start: record.start,
            end: record.end,
            value: record.value,
            doc_len: record.doc_len,
        })
    }
}

impl Segment {
    fn identity(&self) -> (&str, &str, usize, usize, &str) {
        (&self.doc_name, &self.name, self.start, self.end, &self.value)
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}..{}]@{} {:?}",
            self.name, self.start, self.end, self.doc_name, self.value
        )
    }
}

fn check_bounds(start: usize, end: usize, doc_len: usize) -> TextlabResult<()> {
    if start >= end || end > doc_len {
        log::error!(
            "Invalid segment offsets start={}, end={}, doc_len={}",
            start,
            end,
            doc_len
        );
        return Err(TextlabError::new(
            &format!(
                "Segment offsets must satisfy 0 <= start < end <= doc_len, got start={}, end={}, doc_len={}",
                start, end, doc_len
            ),
            ErrorKind::InvariantViolation,
        ));
    }
    Ok(())
}

/// Persisted shape of a [Segment].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub name: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
    pub doc_name: String,
    pub doc_len: usize,
}
