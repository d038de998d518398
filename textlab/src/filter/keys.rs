use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// The closed vocabulary of filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    FilterName,
    SegmentName,
    OutputName,
    SegmentValueRegex,
    SegmentNegRegex,
    CreatesSegment,
    DocumentPrefix,
    DocumentRegex,
    DocumentNegRegex,
    ContainerName,
    ContainerValueRegex,
    ContainerNegRegex,
    ContainerIncludes,
    ContainerKeepSource,
    SplitterLeft,
    SplitterRegex,
    SplitterRight,
    SplitterNegRegex,
    MixinName,
    MixinValueRegex,
    MixinNegRegex,
}

/// Type of the value a [FilterKey] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    String,
    Bool,
}

impl FilterKey {
    pub const ALL: [FilterKey; 21] = [
        FilterKey::FilterName,
        FilterKey::SegmentName,
        FilterKey::OutputName,
        FilterKey::SegmentValueRegex,
        FilterKey::SegmentNegRegex,
        FilterKey::CreatesSegment,
        FilterKey::DocumentPrefix,
        FilterKey::DocumentRegex,
        FilterKey::DocumentNegRegex,
        FilterKey::ContainerName,
        FilterKey::ContainerValueRegex,
        FilterKey::ContainerNegRegex,
        FilterKey::ContainerIncludes,
        FilterKey::ContainerKeepSource,
        FilterKey::SplitterLeft,
        FilterKey::SplitterRegex,
        FilterKey::SplitterRight,
        FilterKey::SplitterNegRegex,
        FilterKey::MixinName,
        FilterKey::MixinValueRegex,
        FilterKey::MixinNegRegex,
    ];

    pub const MANDATORY: [FilterKey; 3] = [
        FilterKey::FilterName,
        FilterKey::SegmentName,
        FilterKey::OutputName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::FilterName => "filter_name",
            FilterKey::SegmentName => "segment_name",
            FilterKey::OutputName => "output_name",
            FilterKey::SegmentValueRegex => "segment_value_regex",
            FilterKey::SegmentNegRegex => "segment_neg_regex",
            FilterKey::CreatesSegment => "creates_segment",
            FilterKey::DocumentPrefix => "document_prefix",
            FilterKey::DocumentRegex => "document_regex",
            FilterKey::DocumentNegRegex => "document_neg_regex",
            FilterKey::ContainerName => "container_name",
            FilterKey::ContainerValueRegex => "container_value_regex",
            FilterKey::ContainerNegRegex => "container_neg_regex",
            FilterKey::ContainerIncludes => "container_includes",
            FilterKey::ContainerKeepSource => "container_keep_source",
            FilterKey::SplitterLeft => "splitter_left",
            FilterKey::SplitterRegex => "splitter_regex",
            FilterKey::SplitterRight => "splitter_right",
            FilterKey::SplitterNegRegex => "splitter_neg_regex",
            FilterKey::MixinName => "mixin_name",
            FilterKey::MixinValueRegex => "mixin_value_regex",
            FilterKey::MixinNegRegex => "mixin_neg_regex",
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            FilterKey::CreatesSegment | FilterKey::ContainerIncludes | FilterKey::ContainerKeepSource => {
                KeyType::Bool
            }
            _ => KeyType::String,
        }
    }

    pub fn is_mandatory(&self) -> bool {
        FilterKey::MANDATORY.contains(self)
    }

    /// Keys holding a regular expression that must compile.
    pub fn is_regex(&self) -> bool {
        matches!(
            self,
            FilterKey::SegmentValueRegex
                | FilterKey::SegmentNegRegex
                | FilterKey::DocumentRegex
                | FilterKey::DocumentNegRegex
                | FilterKey::ContainerValueRegex
                | FilterKey::ContainerNegRegex
                | FilterKey::SplitterNegRegex
                | FilterKey::MixinValueRegex
                | FilterKey::MixinNegRegex
        )
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = TextlabError;

    fn from_str(s: &str) -> TextlabResult<Self> {
        FilterKey::ALL
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| {
                log::error!("Unknown filter key '{}'", s);
                TextlabError::new(&format!("Unknown filter key '{}'", s), ErrorKind::ValidationError)
            })
    }
}
