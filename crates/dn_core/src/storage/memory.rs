use std::collections::HashMap;

use super::{StateStore, StoreError};
use crate::save::{current_timestamp, GameSave, LegacySnapshot};

/// In-process store. Used as the fallback when no durable location is
/// available, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, GameSave>,
    /// Legacy JSON exports by key
    legacy: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a legacy JSON export for `key`.
    pub fn with_legacy(mut self, key: &str, json: impl Into<String>) -> Self {
        self.legacy.insert(key.to_string(), json.into());
        self
    }

    /// Makes every `set`/`delete` fail, to exercise storage error paths.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn has_legacy(&self, key: &str) -> bool {
        self.legacy.contains_key(key)
    }

    fn check_writable(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteRejected { key: key.to_string() });
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<GameSave>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &GameSave) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.entries.remove(key);
        Ok(())
    }

    fn migrate_from_legacy(&mut self, key: &str) -> Result<bool, StoreError> {
        if self.entries.contains_key(key) {
            return Ok(false);
        }
        let Some(json) = self.legacy.get(key) else {
            return Ok(false);
        };

        let save = match LegacySnapshot::from_json(json) {
            Ok(snapshot) => snapshot.into_save(current_timestamp()),
            Err(e) => {
                log::error!("Legacy import of '{}' failed: {}", key, e);
                return Ok(false);
            }
        };
        self.set(key, &save)?;
        log::info!("Imported legacy state for '{}'", key);
        Ok(true)
    }

    fn clear_legacy(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.legacy.remove(key);
        Ok(())
    }
}
