use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// Index from every prefix of a key to the set of values registered under that key.
///
/// `add("lemma", v)` registers `v` under `""`, `"l"`, `"le"`, ... `"lemma"`, so that
/// `get("le")` answers "all values whose key starts with `le`" with a single lookup.
/// Adding and deleting cost O(key length); lookups cost one hash probe. Prefixes are
/// cut at char boundaries.
///
/// ```rust
/// use textlab::index::PrefixMap;
///
/// let mut map = PrefixMap::new();
/// map.add("ne:per", "ne:per".to_string());
/// map.add("ne:loc", "ne:loc".to_string());
/// assert_eq!(map.get("ne:").len(), 2);
/// assert_eq!(map.get("ne:p").len(), 1);
/// assert!(map.get("x").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PrefixMap<V> {
    entries: HashMap<String, HashSet<V>>,
}

impl<V> Default for PrefixMap<V> {
    fn default() -> Self {
        PrefixMap {
            entries: HashMap::new(),
        }
    }
}

impl<V> PrefixMap<V>
where
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        PrefixMap::default()
    }

    /// Registers `value` under every prefix of `key`. Adding the same pair twice is a no-op.
    pub fn add(&mut self, key: &str, value: V) {
        for prefix in prefixes(key) {
            self.entries
                .entry(prefix.to_string())
                .or_default()
                .insert(value.clone());
        }
    }

    /// Values registered under keys that start with `prefix`.
    pub fn get(&self, prefix: &str) -> HashSet<V> {
        self.entries.get(prefix).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [PrefixMap::get].
    pub fn values<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a V> + 'a {
        self.entries.get(prefix).into_iter().flat_map(|set| set.iter())
    }

    pub fn contains(&self, prefix: &str, value: &V) -> bool {
        self.entries
            .get(prefix)
            .map(|set| set.contains(value))
            .unwrap_or(false)
    }

    /// Removes `value` from every prefix of `key`, dropping prefixes left empty.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` without modifying the map if `value` is missing from any
    /// prefix of `key`, i.e. it was never added under `key`.
    pub fn delete(&mut self, key: &str, value: &V) -> TextlabResult<()> {
        if let Some(missing) = prefixes(key).find(|prefix| !self.contains(prefix, value)) {
            log::error!("Prefix map has no value for prefix '{}' of '{}'", missing, key);
            return Err(TextlabError::new(
                &format!("No value registered under prefix '{}' of key '{}'", missing, key),
                ErrorKind::NotFound,
            ));
        }

        for prefix in prefixes(key) {
            if let Some(set) = self.entries.get_mut(prefix) {
                set.remove(value);
                if set.is_empty() {
                    self.entries.remove(prefix);
                }
            }
        }
        Ok(())
    }

    /// Number of distinct prefixes currently indexed.
    pub fn prefix_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All prefixes of `key`, from the empty string to `key` itself.
pub fn prefixes<'a>(key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    key.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(key.len()))
        .map(move |idx| &key[..idx])
}
