use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::common::{char_len, Metadata};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// A named, immutable piece of text with metadata.
///
/// The name identifies the document inside a store. Two documents compare equal
/// only when name, text and metadata all match; stores key documents by name alone.
///
/// ```rust
/// use textlab::collection::Document;
///
/// let doc = Document::new("DOCUMENT A", "Dude was sick!").unwrap();
/// assert_eq!(doc.name(), "DOCUMENT A");
/// assert_eq!(doc.len(), 14);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    name: String,
    text: String,
    metadata: Metadata,
    len: usize,
}

impl Document {
    /// Creates a document with empty metadata.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `name` is empty.
    pub fn new(name: &str, text: &str) -> TextlabResult<Document> {
        Document::with_metadata(name, text, Metadata::new())
    }

    pub fn with_metadata(name: &str, text: &str, metadata: Metadata) -> TextlabResult<Document> {
        if name.is_empty() {
            log::error!("Document name cannot be empty");
            return Err(TextlabError::new(
                "Document name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        Ok(Document {
            name: name.to_string(),
            text: text.to_string(),
            metadata,
            len: char_len(text),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Length of the text in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            name: self.name.clone(),
            text: self.text.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn from_record(record: DocumentRecord) -> TextlabResult<Document> {
        Document::with_metadata(&record.name, &record.text, record.metadata)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Persisted shape of a [Document].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}
