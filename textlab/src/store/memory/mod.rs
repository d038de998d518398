mod document_storage;
mod segment_storage;
mod settings_storage;
mod sorted_segment_storage;

pub use document_storage::*;
pub use segment_storage::*;
pub use settings_storage::*;
pub use sorted_segment_storage::*;
