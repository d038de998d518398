//! The segment filter pipeline.
//!
//! A [Filter] chains up to four lazy stages over a [crate::store::SegmentCollection]
//! and a [crate::store::DocumentCollection]. The building blocks are usable on their
//! own: [SegmentDocumentMatcher] joins two document-sorted streams, [ContainerFilter]
//! tests spatial containment on the joined buckets and [Splitter] cuts segments at
//! separator matches. [FilterRegistry] persists filters as settings.

mod container;
mod keys;
mod matcher;
mod registry;
mod segment_filter;
mod splitter;

pub use container::*;
pub use keys::*;
pub use matcher::*;
pub use registry::*;
pub use segment_filter::*;
pub use splitter::*;
