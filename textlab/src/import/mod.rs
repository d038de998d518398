//! Importers that fill the document and segment stores.

mod plaintext;

pub use plaintext::*;
