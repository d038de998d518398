use regex::Regex;

use crate::collection::{Document, Segment};
use crate::common::compile_optional;
use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// Selects keys either by exact value or by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySelector {
    Exact(String),
    Prefix(String),
}

impl KeySelector {
    #[inline]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeySelector::Exact(exact) => key == exact,
            KeySelector::Prefix(prefix) => key.starts_with(prefix.as_str()),
        }
    }

    /// The literal part every matching key starts with.
    pub fn prefix(&self) -> &str {
        match self {
            KeySelector::Exact(exact) => exact,
            KeySelector::Prefix(prefix) => prefix,
        }
    }

    fn resolve(exact: &Option<String>, prefix: &Option<String>) -> KeySelector {
        match (prefix, exact) {
            (Some(prefix), _) => KeySelector::Prefix(prefix.clone()),
            (None, Some(exact)) => KeySelector::Exact(exact.clone()),
            (None, None) => KeySelector::Prefix(String::new()),
        }
    }
}

/// Options for segment loading, deletion and counting.
///
/// Segments are selected by `name` or `name_prefix` and by `doc_name` or `doc_prefix`.
/// A prefix overrides the exact variant when both are given; when neither is given the
/// empty prefix applies and everything matches. Value filters, a limit and sorting
/// compose with the selectors.
///
/// ```rust
/// use textlab::store::SegmentQuery;
///
/// let query = SegmentQuery::new()
///     .name("lemma")
///     .doc_prefix("DOCUMENT ")
///     .neg_regex("^is$")
///     .limit(100)
///     .sort(true);
/// assert!(query.compile().is_ok());
/// assert!(SegmentQuery::new().limit(0).compile().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentQuery {
    pub(crate) name: Option<String>,
    pub(crate) name_prefix: Option<String>,
    pub(crate) doc_name: Option<String>,
    pub(crate) doc_prefix: Option<String>,
    pub(crate) value_regex: Option<String>,
    pub(crate) neg_regex: Option<String>,
    pub(crate) limit: Option<usize>,
    pub(crate) sort: bool,
}

/// Query for all segments with the given name.
pub fn named(name: &str) -> SegmentQuery {
    SegmentQuery::new().name(name)
}

/// Query for all segments whose name starts with `prefix`.
pub fn name_prefixed(prefix: &str) -> SegmentQuery {
    SegmentQuery::new().name_prefix(prefix)
}

/// Query for all segments of documents whose name starts with `prefix`.
pub fn in_documents(prefix: &str) -> SegmentQuery {
    SegmentQuery::new().doc_prefix(prefix)
}

impl SegmentQuery {
    pub fn new() -> SegmentQuery {
        SegmentQuery::default()
    }

    pub fn name(mut self, name: &str) -> SegmentQuery {
        self.name = Some(name.to_string());
        self
    }

    pub fn name_prefix(mut self, prefix: &str) -> SegmentQuery {
        self.name_prefix = Some(prefix.to_string());
        self
    }

    pub fn doc_name(mut self, doc_name: &str) -> SegmentQuery {
        self.doc_name = Some(doc_name.to_string());
        self
    }

    pub fn doc_prefix(mut self, prefix: &str) -> SegmentQuery {
        self.doc_prefix = Some(prefix.to_string());
        self
    }

    /// Keeps only segments whose value matches `regex`.
    pub fn value_regex(mut self, regex: &str) -> SegmentQuery {
        self.value_regex = Some(regex.to_string());
        self
    }

    /// Discards segments whose value matches `regex`.
    pub fn neg_regex(mut self, regex: &str) -> SegmentQuery {
        self.neg_regex = Some(regex.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> SegmentQuery {
        self.limit = Some(limit);
        self
    }

    /// Requests ascending `(doc_name, name, start, end, value)` order.
    pub fn sort(mut self, sort: bool) -> SegmentQuery {
        self.sort = sort;
        self
    }

    pub fn name_selector(&self) -> KeySelector {
        KeySelector::resolve(&self.name, &self.name_prefix)
    }

    pub fn doc_selector(&self) -> KeySelector {
        KeySelector::resolve(&self.doc_name, &self.doc_prefix)
    }

    pub fn is_sorted(&self) -> bool {
        self.sort
    }

    /// Validates the query and compiles its patterns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero limit or a pattern that does not compile.
    pub fn compile(&self) -> TextlabResult<CompiledSegmentQuery> {
        check_limit(self.limit)?;
        Ok(CompiledSegmentQuery {
            name: self.name_selector(),
            doc: self.doc_selector(),
            value_regex: compile_optional(self.value_regex.as_deref(), ErrorKind::InvalidArgument)?,
            neg_regex: compile_optional(self.neg_regex.as_deref(), ErrorKind::InvalidArgument)?,
            limit: self.limit,
            sort: self.sort,
        })
    }
}

/// A validated [SegmentQuery] with compiled patterns, owned so lazy streams can keep it.
#[derive(Debug, Clone)]
pub struct CompiledSegmentQuery {
    pub name: KeySelector,
    pub doc: KeySelector,
    pub value_regex: Option<Regex>,
    pub neg_regex: Option<Regex>,
    pub limit: Option<usize>,
    pub sort: bool,
}

impl CompiledSegmentQuery {
    /// Document and value filters; the name selector is usually resolved by the store.
    #[inline]
    pub fn accepts_doc_and_value(&self, segment: &Segment) -> bool {
        self.doc.matches(segment.doc_name()) && accepts_text(segment.value(), &self.value_regex, &self.neg_regex)
    }

    #[inline]
    pub fn accepts(&self, segment: &Segment) -> bool {
        self.name.matches(segment.name()) && self.accepts_doc_and_value(segment)
    }
}

/// Options for document loading.
///
/// ```rust
/// use textlab::store::DocumentQuery;
///
/// let query = DocumentQuery::new("ut:").regex("tere").limit(10);
/// assert!(query.compile().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub(crate) prefix: String,
    pub(crate) limit: Option<usize>,
    pub(crate) regex: Option<String>,
    pub(crate) neg_regex: Option<String>,
}

/// Query for every stored document.
pub fn all_documents() -> DocumentQuery {
    DocumentQuery::new("")
}

impl DocumentQuery {
    /// Selects documents whose name starts with `prefix`.
    pub fn new(prefix: &str) -> DocumentQuery {
        DocumentQuery {
            prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: usize) -> DocumentQuery {
        self.limit = Some(limit);
        self
    }

    /// Keeps only documents whose text matches `regex`.
    pub fn regex(mut self, regex: &str) -> DocumentQuery {
        self.regex = Some(regex.to_string());
        self
    }

    /// Discards documents whose text matches `regex`.
    pub fn neg_regex(mut self, regex: &str) -> DocumentQuery {
        self.neg_regex = Some(regex.to_string());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn compile(&self) -> TextlabResult<CompiledDocumentQuery> {
        check_limit(self.limit)?;
        Ok(CompiledDocumentQuery {
            prefix: self.prefix.clone(),
            limit: self.limit,
            regex: compile_optional(self.regex.as_deref(), ErrorKind::InvalidArgument)?,
            neg_regex: compile_optional(self.neg_regex.as_deref(), ErrorKind::InvalidArgument)?,
        })
    }
}

/// A validated [DocumentQuery].
#[derive(Debug, Clone)]
pub struct CompiledDocumentQuery {
    pub prefix: String,
    pub limit: Option<usize>,
    pub regex: Option<Regex>,
    pub neg_regex: Option<Regex>,
}

impl CompiledDocumentQuery {
    #[inline]
    pub fn accepts(&self, document: &Document) -> bool {
        document.name().starts_with(self.prefix.as_str())
            && accepts_text(document.text(), &self.regex, &self.neg_regex)
    }
}

#[inline]
fn accepts_text(text: &str, regex: &Option<Regex>, neg_regex: &Option<Regex>) -> bool {
    if let Some(regex) = regex {
        if !regex.is_match(text) {
            return false;
        }
    }
    if let Some(neg_regex) = neg_regex {
        if neg_regex.is_match(text) {
            return false;
        }
    }
    true
}

fn check_limit(limit: Option<usize>) -> TextlabResult<()> {
    if limit == Some(0) {
        log::error!("Query limit must be positive");
        return Err(TextlabError::new(
            "Query limit must be positive",
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}
