use crate::common::{DEFAULT_BATCH_SIZE, DEFAULT_PREVIEW_LIMIT, FILTER_SETTINGS_PREFIX};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// Settings shared by the filter pipeline and the filter registry.
///
/// ```rust
/// use textlab::config::PipelineConfig;
///
/// let config = PipelineConfig::builder().batch_size(500).build().unwrap();
/// assert_eq!(config.batch_size(), 500);
/// assert_eq!(config.settings_prefix(), "filtertool:");
/// assert!(PipelineConfig::builder().batch_size(0).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    batch_size: usize,
    settings_prefix: String,
    preview_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            settings_prefix: FILTER_SETTINGS_PREFIX.to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        PipelineConfig::default()
    }

    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Number of output segments saved per storage call by `apply`.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Key prefix under which filter settings are stored.
    pub fn settings_prefix(&self) -> &str {
        &self.settings_prefix
    }

    /// Maximum number of segments returned by a preview.
    pub fn preview_limit(&self) -> usize {
        self.preview_limit
    }

    pub(crate) fn set_batch_size(&mut self, batch_size: usize) -> TextlabResult<()> {
        self.batch_size = positive("batch_size", batch_size)?;
        Ok(())
    }

    pub(crate) fn set_settings_prefix(&mut self, prefix: &str) -> TextlabResult<()> {
        if prefix.is_empty() {
            log::error!("Settings prefix cannot be empty");
            return Err(TextlabError::new(
                "Settings prefix cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        self.settings_prefix = prefix.to_string();
        Ok(())
    }

    pub(crate) fn set_preview_limit(&mut self, limit: usize) -> TextlabResult<()> {
        self.preview_limit = positive("preview_limit", limit)?;
        Ok(())
    }
}

fn positive(name: &str, value: usize) -> TextlabResult<usize> {
    if value == 0 {
        log::error!("{} must be positive", name);
        return Err(TextlabError::new(
            &format!("{} must be positive", name),
            ErrorKind::ValidationError,
        ));
    }
    Ok(value)
}

/// Builder for [PipelineConfig]. The first invalid setting is reported by
/// [PipelineConfigBuilder::build].
#[derive(Default)]
pub struct PipelineConfigBuilder {
    error: Option<TextlabError>,
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_batch_size(batch_size) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn settings_prefix(mut self, prefix: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_settings_prefix(prefix) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn preview_limit(mut self, limit: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_preview_limit(limit) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn build(self) -> TextlabResult<PipelineConfig> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.config),
        }
    }
}
