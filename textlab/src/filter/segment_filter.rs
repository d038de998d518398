use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter};

use regex::Regex;

use crate::collection::{Document, Segment};
use crate::common::stream::{SegmentStream, UnionStream};
use crate::common::{
    compile_multiline_pattern, compile_optional, compile_pattern, CharCursor, Settings, Value,
    DEFAULT_BATCH_SIZE,
};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};
use crate::filter::splitter::assemble_pattern;
use crate::filter::{ContainerFilter, FilterKey, KeyType, Splitter};
use crate::store::{named, DocumentCollection, DocumentQuery, SegmentCollection, SegmentQuery};

/// A validated segment filter.
///
/// A filter derives a new segment set from stored documents and segments in four
/// stages, each but the first optional:
///
/// 1. *basic* loads segments called `segment_name`, or with `creates_segment` extracts
///    new ones from document text with `segment_value_regex`,
/// 2. *container* keeps segments by their spatial relation with `container_name`
///    segments (see [ContainerFilter]),
/// 3. *splitter* cuts segments at `splitter_regex` matches (see [Splitter]),
/// 4. *mixin* adds the `mixin_name` segments unchanged.
///
/// Every emitted segment is renamed to `output_name`. The configuration is validated
/// on construction and on every change; a failed change leaves the filter untouched.
///
/// ```rust
/// use textlab::filter::Filter;
///
/// let filter = Filter::builder("numbers", "token", "number")
///     .segment_value_regex(r"^\d+$")
///     .build()
///     .unwrap();
/// assert_eq!(filter.output_name(), "number");
/// assert!(Filter::builder("", "token", "number").build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    values: BTreeMap<FilterKey, Value>,
}

impl Filter {
    /// Creates a filter that copies `segment_name` segments under `output_name`.
    pub fn new(filter_name: &str, segment_name: &str, output_name: &str) -> TextlabResult<Filter> {
        Filter::builder(filter_name, segment_name, output_name).build()
    }

    pub fn builder(filter_name: &str, segment_name: &str, output_name: &str) -> FilterBuilder {
        FilterBuilder::new(filter_name, segment_name, output_name)
    }

    /// Creates a filter from generic settings, e.g. as loaded from a settings store.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for unknown keys, wrongly typed values, missing
    /// mandatory keys and patterns that do not compile.
    pub fn from_settings(settings: &Settings) -> TextlabResult<Filter> {
        let mut values = BTreeMap::new();
        for (key, value) in settings {
            let key: FilterKey = key.parse()?;
            if !value.is_null() {
                values.insert(key, value.clone());
            }
        }
        let filter = Filter { values };
        filter.validate()?;
        Ok(filter)
    }

    pub fn to_settings(&self) -> Settings {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value.clone()))
            .collect()
    }

    /// Raw value of `key`, if set.
    pub fn get(&self, key: &str) -> TextlabResult<Option<&Value>> {
        let key: FilterKey = key.parse()?;
        Ok(self.values.get(&key))
    }

    /// Sets `key` to `value`; a null value unsets an optional key.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> TextlabResult<()> {
        let mut settings = Settings::new();
        settings.insert(key.to_string(), value.into());
        self.update(&settings)
    }

    /// Applies all `settings` at once, or none of them if the result is invalid.
    pub fn update(&mut self, settings: &Settings) -> TextlabResult<()> {
        let mut values = self.values.clone();
        for (key, value) in settings {
            let key: FilterKey = key.parse()?;
            if value.is_null() {
                values.remove(&key);
            } else {
                values.insert(key, value.clone());
            }
        }
        let candidate = Filter { values };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    pub fn filter_name(&self) -> &str {
        self.string(FilterKey::FilterName).unwrap_or_default()
    }

    pub fn segment_name(&self) -> &str {
        self.string(FilterKey::SegmentName).unwrap_or_default()
    }

    pub fn output_name(&self) -> &str {
        self.string(FilterKey::OutputName).unwrap_or_default()
    }

    pub fn creates_segment(&self) -> bool {
        self.flag(FilterKey::CreatesSegment, false)
    }

    pub fn container_includes(&self) -> bool {
        self.flag(FilterKey::ContainerIncludes, true)
    }

    pub fn container_keep_source(&self) -> bool {
        self.flag(FilterKey::ContainerKeepSource, true)
    }

    /// String value of an optional key; empty strings count as unset.
    pub fn string(&self, key: FilterKey) -> Option<&str> {
        self.values
            .get(&key)
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
    }

    fn flag(&self, key: FilterKey, default: bool) -> bool {
        self.values
            .get(&key)
            .and_then(|value| value.as_bool())
            .unwrap_or(default)
    }

    fn validate(&self) -> TextlabResult<()> {
        for (key, value) in self.values.iter() {
            let type_ok = match key.key_type() {
                KeyType::String => value.is_string(),
                KeyType::Bool => value.is_bool(),
            };
            if !type_ok {
                return Err(invalid(&format!(
                    "Filter key '{}' expects a {:?} value, got {}",
                    key,
                    key.key_type(),
                    value.type_name()
                )));
            }
        }

        for key in FilterKey::MANDATORY {
            if self.string(key).is_none() {
                return Err(invalid(&format!("Filter key '{}' is mandatory", key)));
            }
        }

        for key in FilterKey::ALL.iter().filter(|key| key.is_regex()) {
            if let Some(pattern) = self.string(*key) {
                compile_pattern(pattern, ErrorKind::ValidationError)?;
            }
        }
        if let Some(regex) = self.string(FilterKey::SplitterRegex) {
            let pattern = assemble_pattern(
                self.string(FilterKey::SplitterLeft).unwrap_or_default(),
                regex,
                self.string(FilterKey::SplitterRight).unwrap_or_default(),
            );
            compile_multiline_pattern(&pattern, ErrorKind::ValidationError)?;
        }

        if self.creates_segment() && self.string(FilterKey::SegmentValueRegex).is_none() {
            return Err(invalid("A segment creating filter needs 'segment_value_regex'"));
        }
        Ok(())
    }

    /// Stage 1: loads or extracts the starting segments, sorted.
    pub fn filter_basic<'a>(
        &self,
        segments: &'a dyn SegmentCollection,
        documents: &'a dyn DocumentCollection,
    ) -> TextlabResult<SegmentStream<'a>> {
        if self.creates_segment() {
            return self.extract_segments(documents);
        }

        let mut query = named(self.segment_name()).sort(true);
        if let Some(prefix) = self.string(FilterKey::DocumentPrefix) {
            query = query.doc_prefix(prefix);
        }
        if let Some(regex) = self.string(FilterKey::SegmentValueRegex) {
            query = query.value_regex(regex);
        }
        if let Some(regex) = self.string(FilterKey::SegmentNegRegex) {
            query = query.neg_regex(regex);
        }
        let stream = segments.load_iterator(&query)?;

        if self.string(FilterKey::DocumentRegex).is_none()
            && self.string(FilterKey::DocumentNegRegex).is_none()
        {
            return Ok(stream);
        }
        let doc_names = documents
            .load_iterator(&self.document_query())?
            .map(|document| document.map(|d| d.name().to_string()))
            .collect::<TextlabResult<HashSet<String>>>()?;
        log::debug!(
            "Filter '{}' restricted to {} documents",
            self.filter_name(),
            doc_names.len()
        );
        Ok(Box::new(stream.filter(move |item| match item {
            Ok(segment) => doc_names.contains(segment.doc_name()),
            Err(_) => true,
        })))
    }

    /// Stage 2: keeps segments by their relation with the container segments.
    pub fn filter_container<'a>(
        &self,
        input: SegmentStream<'a>,
        segments: &'a dyn SegmentCollection,
    ) -> TextlabResult<SegmentStream<'a>> {
        let Some(container_name) = self.string(FilterKey::ContainerName) else {
            return Ok(input);
        };
        let query = self.stage_query(
            container_name,
            FilterKey::ContainerValueRegex,
            FilterKey::ContainerNegRegex,
        );
        let containers = segments.load_iterator(&query)?;
        log::debug!(
            "Filter '{}' container stage on '{}' (includes={}, keep_source={})",
            self.filter_name(),
            container_name,
            self.container_includes(),
            self.container_keep_source()
        );
        Ok(Box::new(ContainerFilter::new(
            input,
            containers,
            self.container_includes(),
            self.container_keep_source(),
        )))
    }

    /// Stage 3: splits segments at separator matches.
    pub fn filter_splitter<'a>(&self, input: SegmentStream<'a>) -> TextlabResult<SegmentStream<'a>> {
        let Some(regex) = self.string(FilterKey::SplitterRegex) else {
            return Ok(input);
        };
        let splitter = Splitter::new(
            self.string(FilterKey::SplitterLeft).unwrap_or_default(),
            regex,
            self.string(FilterKey::SplitterRight).unwrap_or_default(),
            self.string(FilterKey::SplitterNegRegex),
        )?;
        Ok(splitter.split_stream(input))
    }

    /// Stage 4: appends the mixin segments.
    pub fn filter_mixin<'a>(
        &self,
        input: SegmentStream<'a>,
        segments: &'a dyn SegmentCollection,
    ) -> TextlabResult<SegmentStream<'a>> {
        let Some(mixin_name) = self.string(FilterKey::MixinName) else {
            return Ok(input);
        };
        let query = self.stage_query(mixin_name, FilterKey::MixinValueRegex, FilterKey::MixinNegRegex);
        let mixin = segments.load_iterator(&query)?;
        Ok(Box::new(UnionStream::new(vec![input, mixin])))
    }

    /// Runs all configured stages and renames the result to `output_name`.
    pub fn filter<'a>(
        &self,
        segments: &'a dyn SegmentCollection,
        documents: &'a dyn DocumentCollection,
    ) -> TextlabResult<SegmentStream<'a>> {
        log::debug!("Running filter {}", self);
        let stream = self.filter_basic(segments, documents)?;
        let stream = self.filter_container(stream, segments)?;
        let stream = self.filter_splitter(stream)?;
        let stream = self.filter_mixin(stream, segments)?;

        let output_name = self.output_name().to_string();
        Ok(Box::new(
            stream.map(move |item| item.map(|segment| segment.with_name(&output_name))),
        ))
    }

    /// Runs the filter and saves its output, returning the number of saved segments.
    ///
    /// Output segments already stored under `output_name` are left in place; use
    /// [Filter::clear_output] first to make a re-run reproduce the same set.
    pub fn apply(
        &self,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<usize> {
        self.apply_in_batches(segments, documents, DEFAULT_BATCH_SIZE)
    }

    pub fn apply_in_batches(
        &self,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
        batch_size: usize,
    ) -> TextlabResult<usize> {
        if batch_size == 0 {
            log::error!("Batch size must be positive");
            return Err(TextlabError::new(
                "Batch size must be positive",
                ErrorKind::InvalidArgument,
            ));
        }

        let mut saved = 0;
        let mut batch = Vec::with_capacity(batch_size);
        for item in self.filter(segments, documents)? {
            batch.push(item?);
            if batch.len() == batch_size {
                saved += batch.len();
                segments.save(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)))?;
            }
        }
        if !batch.is_empty() {
            saved += batch.len();
            segments.save(batch)?;
        }
        log::info!(
            "Filter '{}' saved {} segments as '{}'",
            self.filter_name(),
            saved,
            self.output_name()
        );
        Ok(saved)
    }

    /// Deletes all segments stored under `output_name`.
    pub fn clear_output(&self, segments: &dyn SegmentCollection) -> TextlabResult<usize> {
        segments.delete(&named(self.output_name()))
    }

    fn document_query(&self) -> DocumentQuery {
        let mut query = DocumentQuery::new(self.string(FilterKey::DocumentPrefix).unwrap_or_default());
        if let Some(regex) = self.string(FilterKey::DocumentRegex) {
            query = query.regex(regex);
        }
        if let Some(regex) = self.string(FilterKey::DocumentNegRegex) {
            query = query.neg_regex(regex);
        }
        query
    }

    fn stage_query(&self, name: &str, value_key: FilterKey, neg_key: FilterKey) -> SegmentQuery {
        let mut query = named(name).sort(true);
        if let Some(prefix) = self.string(FilterKey::DocumentPrefix) {
            query = query.doc_prefix(prefix);
        }
        if let Some(regex) = self.string(value_key) {
            query = query.value_regex(regex);
        }
        if let Some(regex) = self.string(neg_key) {
            query = query.neg_regex(regex);
        }
        query
    }

    fn extract_segments<'a>(&self, documents: &'a dyn DocumentCollection) -> TextlabResult<SegmentStream<'a>> {
        let extractor = Extractor {
            name: self.segment_name().to_string(),
            pattern: compile_pattern(
                self.string(FilterKey::SegmentValueRegex).unwrap_or_default(),
                ErrorKind::ValidationError,
            )?,
            neg_pattern: compile_optional(
                self.string(FilterKey::SegmentNegRegex),
                ErrorKind::ValidationError,
            )?,
        };
        let stream = documents.load_iterator(&self.document_query())?;
        Ok(Box::new(stream.flat_map(move |item| {
            match item.and_then(|document| extractor.extract(&document)) {
                Ok(segments) => segments.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(error) => vec![Err(error)],
            }
        })))
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' ({} -> {})",
            self.filter_name(),
            self.segment_name(),
            self.output_name()
        )
    }
}

struct Extractor {
    name: String,
    pattern: Regex,
    neg_pattern: Option<Regex>,
}

impl Extractor {
    fn extract(&self, document: &Document) -> TextlabResult<Vec<Segment>> {
        let mut cursor = CharCursor::new(document.text());
        let mut segments = Vec::new();
        for found in self.pattern.find_iter(document.text()) {
            if found.is_empty() {
                continue;
            }
            if let Some(neg) = &self.neg_pattern {
                if neg.is_match(found.as_str()) {
                    continue;
                }
            }
            let start = cursor.char_offset(found.start());
            let end = cursor.char_offset(found.end());
            segments.push(Segment::new(&self.name, found.as_str(), document, start, end)?);
        }
        Ok(segments)
    }
}

fn invalid(message: &str) -> TextlabError {
    log::error!("{}", message);
    TextlabError::new(message, ErrorKind::ValidationError)
}

/// Typed builder for [Filter]. The filter is validated by [FilterBuilder::build].
pub struct FilterBuilder {
    values: BTreeMap<FilterKey, Value>,
}

macro_rules! string_setters {
    ($($(#[$doc:meta])* $method:ident => $key:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method(self, value: &str) -> Self {
                self.with(FilterKey::$key, Value::from(value))
            }
        )+
    };
}

impl FilterBuilder {
    fn new(filter_name: &str, segment_name: &str, output_name: &str) -> Self {
        FilterBuilder {
            values: BTreeMap::new(),
        }
        .with(FilterKey::FilterName, Value::from(filter_name))
        .with(FilterKey::SegmentName, Value::from(segment_name))
        .with(FilterKey::OutputName, Value::from(output_name))
    }

    fn with(mut self, key: FilterKey, value: Value) -> Self {
        self.values.insert(key, value);
        self
    }

    string_setters! {
        segment_value_regex => SegmentValueRegex,
        segment_neg_regex => SegmentNegRegex,
        document_prefix => DocumentPrefix,
        document_regex => DocumentRegex,
        document_neg_regex => DocumentNegRegex,
        /// Enables the container stage.
        container_name => ContainerName,
        container_value_regex => ContainerValueRegex,
        container_neg_regex => ContainerNegRegex,
        splitter_left => SplitterLeft,
        /// Enables the splitter stage.
        splitter_regex => SplitterRegex,
        splitter_right => SplitterRight,
        splitter_neg_regex => SplitterNegRegex,
        /// Enables the mixin stage.
        mixin_name => MixinName,
        mixin_value_regex => MixinValueRegex,
        mixin_neg_regex => MixinNegRegex,
    }

    pub fn creates_segment(self, creates: bool) -> Self {
        self.with(FilterKey::CreatesSegment, Value::from(creates))
    }

    pub fn container_includes(self, includes: bool) -> Self {
        self.with(FilterKey::ContainerIncludes, Value::from(includes))
    }

    pub fn container_keep_source(self, keep_source: bool) -> Self {
        self.with(FilterKey::ContainerKeepSource, Value::from(keep_source))
    }

    pub fn build(self) -> TextlabResult<Filter> {
        let filter = Filter { values: self.values };
        filter.validate()?;
        Ok(filter)
    }
}
