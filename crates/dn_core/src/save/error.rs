use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data: {reason}")]
    Corrupted { reason: String },

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,
}

impl SaveError {
    /// A snapshot written by a newer build may load after an upgrade; a
    /// damaged one never will.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SaveError::VersionMismatch { .. })
    }
}
