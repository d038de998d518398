//! # Textlab - Segment Store and Filter Pipeline
//!
//! Textlab keeps plain-text documents together with *segments*: named, value-bearing
//! char ranges of a document such as tokens, lemmas, sentences or named entities.
//! New segment sets are derived from existing ones with declarative filters.
//!
//! ## Key Features
//!
//! - **Documents and segments** with checked offsets (`0 <= start < end <= doc_len`)
//! - **Prefix-indexed stores** answering "all names starting with X" queries
//! - **Filter pipeline**: regex extraction, spatial containment, splitting and union
//! - **Lazy streams**: every stage pulls only what its consumer asks for
//! - **Pluggable storage** behind the [store::DocumentCollection] and
//!   [store::SegmentCollection] traits
//!
//! ## Quick Start
//!
//! ```rust
//! use textlab::filter::Filter;
//! use textlab::import::PlainTextImporter;
//! use textlab::store::{InMemoryDocumentStorage, InMemorySegmentStorage, SegmentCollection};
//!
//! # fn main() -> textlab::errors::TextlabResult<()> {
//! let documents = InMemoryDocumentStorage::new();
//! let segments = InMemorySegmentStorage::new();
//! PlainTextImporter::new("ut")?.import_lines(["Dude was sick!"], &segments, &documents)?;
//!
//! let filter = Filter::builder("short", "token", "short")
//!     .segment_value_regex("^.{1,3}$")
//!     .build()?;
//! assert_eq!(filter.apply(&segments, &documents)?, 1);
//! assert_eq!(segments.count("short")?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents and segments
//! - [`common`] - Values, streams and shared utilities
//! - [`config`] - Pipeline configuration
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - The filter pipeline and its building blocks
//! - [`import`] - Importers filling the stores
//! - [`index`] - The prefix index
//! - [`store`] - Storage traits, queries and in-memory stores

pub mod collection;
pub mod common;
pub mod config;
pub mod errors;
pub mod filter;
pub mod import;
pub mod index;
pub mod store;
