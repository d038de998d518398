use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::collection::{Document, Segment};
use crate::common::{token_spans, DOCUMENT_NAME_SEPARATOR, TOKEN_SEGMENT};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};
use crate::store::{in_documents, DocumentCollection, SegmentCollection};

/// Counts reported by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub documents: usize,
    pub segments: usize,
}

/// Imports plain text, one document per line.
///
/// Line `n` (counting from 1) becomes the document `"{prefix}:{n}"` and each of its
/// whitespace separated tokens a `token` segment. Documents and segments previously
/// imported under the same prefix are replaced, so an import can be repeated.
///
/// ```rust
/// use textlab::import::PlainTextImporter;
/// use textlab::store::{DocumentCollection, InMemoryDocumentStorage, InMemorySegmentStorage};
///
/// let documents = InMemoryDocumentStorage::new();
/// let segments = InMemorySegmentStorage::new();
/// let summary = PlainTextImporter::new("corpus")
///     .unwrap()
///     .import_lines(["Dude was sick!", "The length is 100"], &segments, &documents)
///     .unwrap();
/// assert_eq!((summary.documents, summary.segments), (2, 7));
/// assert_eq!(documents.load("corpus:2").unwrap().text(), "The length is 100");
/// ```
#[derive(Debug, Clone)]
pub struct PlainTextImporter {
    prefix: String,
}

impl PlainTextImporter {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty prefix.
    pub fn new(prefix: &str) -> TextlabResult<Self> {
        if prefix.is_empty() {
            log::error!("Import prefix cannot be empty");
            return Err(TextlabError::new(
                "Import prefix cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(PlainTextImporter {
            prefix: prefix.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the document created for line `number`.
    pub fn document_name(&self, number: usize) -> String {
        format!("{}{}{}", self.prefix, DOCUMENT_NAME_SEPARATOR, number)
    }

    pub fn import_path<P: AsRef<Path>>(
        &self,
        path: P,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<ImportSummary> {
        let path = path.as_ref();
        log::info!("Importing {} as '{}'", path.display(), self.prefix);
        let file = File::open(path)?;
        self.import_reader(BufReader::new(file), segments, documents)
    }

    pub fn import_reader<R: BufRead>(
        &self,
        reader: R,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<ImportSummary> {
        let lines = reader.lines().map(|line| line.map_err(TextlabError::from));
        self.import(lines, segments, documents)
    }

    /// Imports `lines` as documents `<prefix>:1`, `<prefix>:2`, ... replacing any
    /// earlier import under the same prefix. Nothing is removed unless every line
    /// converts cleanly.
    pub fn import_lines<I, S>(
        &self,
        lines: I,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<ImportSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.import(lines.into_iter().map(Ok), segments, documents)
    }

    fn import<I, S>(
        &self,
        lines: I,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<ImportSummary>
    where
        I: Iterator<Item = TextlabResult<S>>,
        S: AsRef<str>,
    {
        let mut new_documents = Vec::new();
        let mut new_segments = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            let line = line.as_ref().trim_end_matches(['\r', '\n']);
            let document = Document::new(&self.document_name(idx + 1), line)?;
            for span in token_spans(document.text()) {
                new_segments.push(Segment::new(
                    TOKEN_SEGMENT,
                    span.token,
                    &document,
                    span.start,
                    span.end,
                )?);
            }
            new_documents.push(document);
        }

        let summary = ImportSummary {
            documents: new_documents.len(),
            segments: new_segments.len(),
        };
        self.clear(segments, documents)?;
        documents.save_all(new_documents)?;
        segments.save(new_segments)?;
        log::info!(
            "Imported {} documents with {} tokens as '{}'",
            summary.documents,
            summary.segments,
            self.prefix
        );
        Ok(summary)
    }

    fn clear(&self, segments: &dyn SegmentCollection, documents: &dyn DocumentCollection) -> TextlabResult<()> {
        let prefix = format!("{}{}", self.prefix, DOCUMENT_NAME_SEPARATOR);
        let removed_segments = segments.delete(&in_documents(&prefix))?;
        let removed_documents = documents.delete_all(&prefix)?;
        if removed_documents > 0 {
            log::warn!(
                "Replaced {} documents and {} segments under '{}'",
                removed_documents,
                removed_segments,
                prefix
            );
        }
        Ok(())
    }
}
