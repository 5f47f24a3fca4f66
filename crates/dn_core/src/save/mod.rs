// Save/Load for the game snapshot
// MessagePack + LZ4 compression with versioning, integrity checks and
// import of the older browser JSON export

pub mod error;
pub mod format;
pub mod legacy;
pub mod migration;

pub use error::SaveError;
pub use format::{current_timestamp, decompress_and_deserialize, serialize_and_compress, GameSave};
pub use legacy::LegacySnapshot;
pub use migration::{get_migration_description, migrate_save, needs_migration};

pub const SAVE_VERSION: u32 = 1;
