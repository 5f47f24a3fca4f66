use super::error::SaveError;
use super::SAVE_VERSION;
use crate::cards::RegimePool;
use crate::history::History;
use crate::ledger::WeekLedger;
use crate::regime::DEFAULT_REGIME_ID;
use crate::schedule::ScheduleBook;
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Persisted snapshot of the whole game state (single key, written wholesale)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSave {
    /// Save format version for migration
    pub version: u32,

    /// Save timestamp (unix milliseconds)
    pub timestamp: u64,

    /// Regime used to seed weeks that have not been touched yet
    pub active_regime_id: String,

    /// Deck of the custom regime, if the user ever defined one
    #[serde(default)]
    pub custom_pool: Option<RegimePool>,

    /// Remaining tokens per week anchor
    #[serde(default)]
    pub weeks: WeekLedger,

    /// Played cards per date
    #[serde(default)]
    pub days: ScheduleBook,

    /// Archived day records
    #[serde(default)]
    pub history: History,
}

impl Default for GameSave {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSave {
    pub fn new() -> Self {
        Self {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            active_regime_id: DEFAULT_REGIME_ID.to_string(),
            custom_pool: None,
            weeks: WeekLedger::new(),
            days: ScheduleBook::new(),
            history: History::default(),
        }
    }

    pub fn update_timestamp(&mut self) {
        self.timestamp = current_timestamp();
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.active_regime_id.trim().is_empty() && self.version >= SAVE_VERSION {
            return Err(SaveError::Corrupted { reason: "empty active regime id".to_string() });
        }

        Ok(())
    }
}

/// Serialize and compress game save data
pub fn serialize_and_compress(save: &GameSave) -> Result<Vec<u8>, SaveError> {
    save.validate()?;

    // 1. MessagePack with field names
    let msgpack = to_vec_named(save).map_err(SaveError::Serialization)?;

    // 2. LZ4 (size prepended)
    let compressed = compress_prepend_size(&msgpack);

    // 3. SHA256 checksum at the end
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize game save data
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<GameSave, SaveError> {
    // header + checksum
    if bytes.len() < 4 + 32 {
        return Err(SaveError::Corrupted { reason: format!("only {} bytes", bytes.len()) });
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;

    // Newer versions pass through; `migrate_save` decides what to do with them
    from_slice(&msgpack).map_err(SaveError::Deserialization)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
