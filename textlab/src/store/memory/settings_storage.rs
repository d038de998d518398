use std::collections::BTreeMap;

use crate::common::{atomic, Atomic, Settings};
use crate::errors::{ErrorKind, TextlabError, TextlabResult};
use crate::store::SettingsStorage;

/// In-memory [SettingsStorage].
#[derive(Clone, Default)]
pub struct InMemorySettingsStorage {
    inner: Atomic<BTreeMap<String, Settings>>,
}

impl InMemorySettingsStorage {
    pub fn new() -> Self {
        InMemorySettingsStorage {
            inner: atomic(BTreeMap::new()),
        }
    }
}

impl SettingsStorage for InMemorySettingsStorage {
    fn list(&self, prefix: &str) -> TextlabResult<Vec<String>> {
        Ok(self.inner.read_with(|map| {
            map.range(prefix.to_string()..)
                .map(|(key, _)| key)
                .take_while(|key| key.starts_with(prefix))
                .cloned()
                .collect()
        }))
    }

    fn load(&self, key: &str) -> TextlabResult<Settings> {
        self.inner
            .read_with(|map| map.get(key).cloned())
            .ok_or_else(|| {
                log::error!("No settings stored under '{}'", key);
                TextlabError::new(
                    &format!("No settings stored under '{}'", key),
                    ErrorKind::NotFound,
                )
            })
    }

    fn save(&self, key: &str, settings: Settings) -> TextlabResult<()> {
        self.inner.write_with(|map| map.insert(key.to_string(), settings));
        Ok(())
    }

    fn delete(&self, key: &str) -> TextlabResult<()> {
        if self.inner.write_with(|map| map.remove(key)).is_none() {
            log::warn!("Settings '{}' were not stored", key);
        }
        Ok(())
    }
}
