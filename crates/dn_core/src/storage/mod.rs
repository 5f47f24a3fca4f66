//! Persistence collaborators
//!
//! The game persists its whole state as one [`GameSave`] snapshot under a
//! single key. A store may also know about a legacy location for the same
//! key (the older JSON export) and import from it once at startup.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::config::GameConfig;
use crate::save::{GameSave, SaveError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save format error: {0}")]
    Save(#[from] SaveError),

    #[error("Legacy data error: {0}")]
    Legacy(#[from] serde_json::Error),

    #[error("Write rejected for key '{key}'")]
    WriteRejected { key: String },
}

impl StoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::WriteRejected { .. } => true,
            StoreError::Save(e) => e.is_recoverable(),
            StoreError::Legacy(_) => false,
        }
    }
}

/// Key-value snapshot store
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<GameSave>, StoreError>;

    fn set(&mut self, key: &str, value: &GameSave) -> Result<(), StoreError>;

    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// One-shot import from the legacy location. Returns true when a legacy
    /// snapshot was copied into this store. Calling it again once the key
    /// exists is a no-op.
    fn migrate_from_legacy(&mut self, key: &str) -> Result<bool, StoreError>;

    /// Removes the legacy copy of `key`, if the store has one.
    fn clear_legacy(&mut self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<GameSave>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &GameSave) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn migrate_from_legacy(&mut self, key: &str) -> Result<bool, StoreError> {
        (**self).migrate_from_legacy(key)
    }

    fn clear_legacy(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).clear_legacy(key)
    }
}

/// Durable store when `save_dir` is configured and usable, in-memory
/// otherwise.
pub fn open_store(config: &GameConfig) -> Box<dyn StateStore> {
    let Some(dir) = &config.save_dir else {
        log::info!("No save directory configured, state will not survive restarts");
        return Box::new(MemoryStore::new());
    };

    match FileStore::open(dir, config.legacy_dir.as_deref()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("File store unavailable at {:?} ({}), falling back to memory", dir, e);
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_store_without_dir_is_memory() {
        let mut store = open_store(&GameConfig::default());
        store.set("k", &GameSave::new()).unwrap();
        assert!(store.get("k").unwrap().is_some());
    }

    #[test]
    fn test_open_store_with_dir_is_durable() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            GameConfig { save_dir: Some(temp_dir.path().join("saves")), ..GameConfig::default() };

        let mut store = open_store(&config);
        store.set("k", &GameSave::new()).unwrap();

        let reopened = open_store(&config);
        assert!(reopened.get("k").unwrap().is_some());
    }

    #[test]
    fn test_open_store_falls_back_when_dir_unusable() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let config = GameConfig { save_dir: Some(blocker.join("saves")), ..GameConfig::default() };
        let mut store = open_store(&config);
        assert!(store.set("k", &GameSave::new()).is_ok());
    }

    #[test]
    fn test_recoverable() {
        assert!(StoreError::WriteRejected { key: "k".to_string() }.is_recoverable());
        assert!(!StoreError::Save(SaveError::ChecksumMismatch).is_recoverable());
    }
}
