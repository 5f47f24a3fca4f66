//! Game state aggregate
//!
//! Owned by exactly one [`crate::game::Game`]. Converted to/from
//! [`GameSave`] for persistence.

use crate::cards::RegimePool;
use crate::history::History;
use crate::ledger::WeekLedger;
use crate::save::{GameSave, SAVE_VERSION};
use crate::schedule::ScheduleBook;

/// Runtime game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Regime used to seed weeks that have not been touched yet
    pub active_regime_id: String,

    /// Deck of the custom regime, once the user defined one
    pub custom_pool: Option<RegimePool>,

    /// Remaining tokens per week
    pub weeks: WeekLedger,

    /// Played cards per date
    pub days: ScheduleBook,

    /// Archived day records
    pub history: History,
}

impl GameState {
    /// First-run state
    pub fn new(active_regime_id: impl Into<String>, history_capacity: usize) -> Self {
        Self {
            active_regime_id: active_regime_id.into(),
            custom_pool: None,
            weeks: WeekLedger::new(),
            days: ScheduleBook::new(),
            history: History::with_capacity(history_capacity),
        }
    }

    /// Convert runtime state to save format
    pub fn to_save(&self) -> GameSave {
        GameSave {
            version: SAVE_VERSION,
            timestamp: crate::save::current_timestamp(),
            active_regime_id: self.active_regime_id.clone(),
            custom_pool: self.custom_pool,
            weeks: self.weeks.clone(),
            days: self.days.clone(),
            history: self.history.clone(),
        }
    }

    /// Restore runtime state from save data
    pub fn from_save(save: GameSave) -> Self {
        Self {
            active_regime_id: save.active_regime_id,
            custom_pool: save.custom_pool,
            weeks: save.weeks,
            days: save.days,
            history: save.history,
        }
    }
}
