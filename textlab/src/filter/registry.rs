use std::sync::Arc;

use crate::collection::Segment;
use crate::config::PipelineConfig;
use crate::errors::TextlabResult;
use crate::filter::Filter;
use crate::store::{DocumentCollection, SegmentCollection, SettingsStorage};

/// Named filters kept in a [SettingsStorage].
///
/// Every filter is stored under the configured settings prefix followed by its
/// `filter_name`.
#[derive(Clone)]
pub struct FilterRegistry {
    storage: Arc<dyn SettingsStorage>,
    config: PipelineConfig,
}

impl FilterRegistry {
    pub fn new(storage: Arc<dyn SettingsStorage>, config: PipelineConfig) -> Self {
        FilterRegistry { storage, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn key(&self, filter_name: &str) -> String {
        format!("{}{}", self.config.settings_prefix(), filter_name)
    }

    /// Stores `filter`, replacing a stored filter of the same name.
    pub fn save_filter(&self, filter: &Filter) -> TextlabResult<()> {
        self.storage.save(&self.key(filter.filter_name()), filter.to_settings())?;
        log::info!("Saved filter {}", filter);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown filter and `ValidationError` if the stored
    /// settings no longer form a valid filter.
    pub fn load_filter(&self, filter_name: &str) -> TextlabResult<Filter> {
        let settings = self.storage.load(&self.key(filter_name))?;
        Filter::from_settings(&settings)
    }

    /// Names of all stored filters, sorted.
    pub fn available_filters(&self) -> TextlabResult<Vec<String>> {
        let prefix = self.config.settings_prefix();
        Ok(self
            .storage
            .list(prefix)?
            .into_iter()
            .filter_map(|key| key.strip_prefix(prefix).map(str::to_string))
            .collect())
    }

    pub fn remove_filter(&self, filter_name: &str) -> TextlabResult<()> {
        self.storage.delete(&self.key(filter_name))
    }

    /// The first output segments of a stored filter, without saving them.
    pub fn preview(
        &self,
        filter_name: &str,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<Vec<Segment>> {
        let filter = self.load_filter(filter_name)?;
        filter
            .filter(segments, documents)?
            .take(self.config.preview_limit())
            .collect()
    }

    /// Applies a stored filter with the configured batch size.
    pub fn apply_filter(
        &self,
        filter_name: &str,
        segments: &dyn SegmentCollection,
        documents: &dyn DocumentCollection,
    ) -> TextlabResult<usize> {
        let filter = self.load_filter(filter_name)?;
        filter.apply_in_batches(segments, documents, self.config.batch_size())
    }
}
