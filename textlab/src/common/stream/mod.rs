use crate::collection::{Document, Segment};
use crate::errors::TextlabResult;

mod bucket_stream;
mod sorted_stream;
mod union_stream;

pub use bucket_stream::*;
pub use sorted_stream::*;
pub use union_stream::*;

/// Lazy, forward-only sequence of segments. It may borrow the store it reads from;
/// dropping it early releases that borrow.
pub type SegmentStream<'a> = Box<dyn Iterator<Item = TextlabResult<Segment>> + 'a>;

/// Lazy, forward-only sequence of documents.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = TextlabResult<Document>> + 'a>;
