//! Documents and the segments annotating them.

mod document;
mod segment;

pub use document::*;
pub use segment::*;
