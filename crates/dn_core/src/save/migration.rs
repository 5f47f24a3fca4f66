use super::error::SaveError;
use super::format::GameSave;
use super::SAVE_VERSION;
use crate::regime::DEFAULT_REGIME_ID;

/// Migrate save data from older versions to current version
pub fn migrate_save(mut save: GameSave) -> Result<GameSave, SaveError> {
    let original_version = save.version;

    save = match save.version {
        0 => migrate_v0_to_v1(save)?,
        1 => save, // Current version, no migration needed
        v if v > SAVE_VERSION => {
            // Future version - might be compatible
            log::warn!("Loading save from future version {} (current: {})", v, SAVE_VERSION);
            save
        }
        _ => {
            return Err(SaveError::VersionMismatch { found: save.version, expected: SAVE_VERSION });
        }
    };

    if original_version < SAVE_VERSION {
        save.version = SAVE_VERSION;
        save.update_timestamp();
        log::info!("Migrated save from version {} to {}", original_version, SAVE_VERSION);
    }

    Ok(save)
}

/// Version 0 is what the legacy importer produces: ids as typed by the old
/// front end and days that were opened but never played.
fn migrate_v0_to_v1(mut save: GameSave) -> Result<GameSave, SaveError> {
    log::info!("Migrating save from version 0 to 1");

    // 1. Normalise the regime id
    let normalized = save.active_regime_id.trim().to_ascii_lowercase();
    save.active_regime_id =
        if normalized.is_empty() { DEFAULT_REGIME_ID.to_string() } else { normalized };

    // 2. Drop days that hold no card
    let pruned = save.days.prune_empty_days();
    if pruned > 0 {
        log::debug!("Dropped {} empty day schedules", pruned);
    }

    Ok(save)
}

/// Check if a save needs migration
pub fn needs_migration(save: &GameSave) -> bool {
    save.version < SAVE_VERSION
}

/// Get migration description for UI display
pub fn get_migration_description(from_version: u32, to_version: u32) -> String {
    match (from_version, to_version) {
        (0, 1) => "Importing data from the previous version of the app".to_string(),
        _ => format!("Updating save format from version {} to {}", from_version, to_version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, MealSlot, PlayedCard};
    use chrono::NaiveDate;

    #[test]
    fn test_migrate_v0_to_v1() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut save = GameSave::new();
        save.version = 0;
        save.active_regime_id = " LowCarb ".to_string();
        save.days.set_slot(date, MealSlot::Lunch, PlayedCard::new(CardKind::Flex, 0)).unwrap();
        save.days.clear_slot(date, MealSlot::Lunch);

        assert!(needs_migration(&save));
        let migrated = migrate_save(save).unwrap();

        assert_eq!(migrated.version, 1);
        assert_eq!(migrated.active_regime_id, "lowcarb");
        assert!(migrated.days.is_empty());
    }

    #[test]
    fn test_empty_regime_becomes_default() {
        let mut save = GameSave::new();
        save.version = 0;
        save.active_regime_id = String::new();

        let migrated = migrate_save(save).unwrap();
        assert_eq!(migrated.active_regime_id, DEFAULT_REGIME_ID);
    }

    #[test]
    fn test_no_migration_needed() {
        let save = GameSave::new();

        let result = migrate_save(save.clone()).unwrap();

        assert_eq!(result, save);
        assert!(!needs_migration(&result));
    }

    #[test]
    fn test_future_version_warning() {
        let mut save = GameSave::new();
        save.version = 999;

        let result = migrate_save(save).unwrap();
        assert_eq!(result.version, 999);
    }

    #[test]
    fn test_migration_description() {
        assert!(get_migration_description(0, 1).contains("previous version"));
        assert!(get_migration_description(3, 4).contains("3 to 4"));
    }
}
