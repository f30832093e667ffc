use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

/// Builds the cache key for one `(workbook file name, class pattern)`
/// query: the file name keeps only what precedes its first `.`, and spaces
/// are removed from the pattern.
pub fn cache_key(filename: &str, class_pattern: &str) -> String {
    let stem = filename.split('.').next().unwrap_or(filename);
    format!("{stem}-{}", class_pattern.replace(' ', ""))
}

/// Key-value collaborator storing serialized tables.
///
/// The cache is a pure accelerator: a miss is always answered by
/// recomputing, and no consistency beyond eventual overwrite is assumed of
/// implementations.
pub trait TableCache {
    /// Returns the cached payload for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `payload` under `key`, replacing any previous value.
    fn put(&self, key: &str, payload: &str);
}

/// In-process cache for tests and embedders without an external store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, payload: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), payload.to_string());
        }
    }
}

/// Answers from the cache when `key` is present, recomputing and
/// overwriting on a miss.
pub fn get_or_compute<F>(cache: &dyn TableCache, key: &str, compute: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    if let Some(hit) = cache.get(key) {
        return Ok(hit);
    }
    let payload = compute()?;
    cache.put(key, &payload);
    Ok(payload)
}
