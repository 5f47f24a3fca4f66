//! # dn_core - Discipline Nutrition game core
//!
//! Weekly card deck and meal-slot state machine behind the Discipline
//! Nutrition habit game.
//!
//! ## Features
//! - Per-week token pools seeded lazily from the active regime
//! - One card per meal slot, with cancel returning the token
//! - Fasting cards that never touch the pool
//! - Single-key snapshot persistence (binary save format, legacy JSON import)
//! - JSON API for the UI layer

pub mod api;
pub mod calendar;
pub mod cards;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod ledger;
pub mod regime;
pub mod save;
pub mod schedule;
pub mod state;
pub mod storage;

pub use api::{handle_request_json, GameRequest, GameResponse};
pub use calendar::{week_anchor_of, WeekAnchor};
pub use cards::{CardKind, MealSlot, PlayedCard, RegimePool};
pub use config::{ConfigError, GameConfig};
pub use error::{GameError, ParseError, Result};
pub use game::{Clock, DaySummary, FixedClock, Game, PlayReceipt, SystemClock, WeekDay, WeekState};
pub use history::{DayRecord, History};
pub use ledger::{WeekLedger, WeekLedgerEntry};
pub use regime::{RegimeCatalog, RegimeDefinition};
pub use save::{GameSave, SaveError};
pub use schedule::{DaySchedule, ScheduleBook};
pub use state::GameState;
pub use storage::{open_store, FileStore, MemoryStore, StateStore, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_boxed_store_end_to_end() {
        let config = GameConfig::default();
        let store = open_store(&config);
        let mut game = Game::load(store, RegimeCatalog::new(), config).unwrap();

        let today = game.today();
        game.play_card(today, MealSlot::Lunch, CardKind::Flex).unwrap();
        assert_eq!(game.peek_pool(week_anchor_of(today)).map(|p| p.flex), Some(3));
    }
}
