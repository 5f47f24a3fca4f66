//! Game facade
//!
//! Single owner of [`GameState`]. Every mutating operation validates first,
//! mutates in memory, then writes the whole snapshot to the store. A failed
//! rule check leaves the pools and slots untouched. A storage failure is
//! reported after the in-memory change has happened; [`Game::flush`] retries
//! the write.

pub mod clock;
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use summary::{CardTally, DaySummary, WeekDay, WeekState};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{days_in_week, WeekAnchor};
use crate::cards::{CardKind, MealSlot, PlayedCard, RegimePool};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::history::{DayRecord, History};
use crate::regime::{RegimeCatalog, RegimeDefinition, CUSTOM_REGIME_ID, FALLBACK_POOL};
use crate::save::{get_migration_description, migrate_save, needs_migration, SAVE_VERSION};
use crate::schedule::DaySchedule;
use crate::state::GameState;
use crate::storage::{StateStore, StoreError};

/// Outcome of a successful play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayReceipt {
    pub date: NaiveDate,
    pub slot: MealSlot,
    pub kind: CardKind,
    /// Tokens of `kind` left in the week; `None` for fasting
    pub remaining: Option<u32>,
}

pub struct Game<S: StateStore> {
    store: S,
    catalog: RegimeCatalog,
    config: GameConfig,
    clock: Box<dyn Clock>,
    state: GameState,
}

impl<S: StateStore> Game<S> {
    /// Imports legacy data if needed, then restores the stored snapshot or
    /// starts from first-run defaults.
    pub fn load(store: S, catalog: RegimeCatalog, config: GameConfig) -> Result<Self> {
        Self::load_with_clock(store, catalog, config, Box::new(SystemClock))
    }

    pub fn load_with_clock(
        mut store: S,
        mut catalog: RegimeCatalog,
        config: GameConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let key = config.storage_key.as_str();

        if store.migrate_from_legacy(key)? {
            log::info!("Legacy state imported for '{}'", key);
        }

        let mut state = match store.get(key)? {
            Some(save) => {
                if needs_migration(&save) {
                    log::info!("{}", get_migration_description(save.version, SAVE_VERSION));
                }
                let save = migrate_save(save).map_err(StoreError::from)?;
                log::info!(
                    "Loaded state: {} weeks, {} days, regime '{}'",
                    save.weeks.len(),
                    save.days.len(),
                    save.active_regime_id
                );
                GameState::from_save(save)
            }
            None => {
                log::info!("No saved state under '{}', starting fresh", key);
                GameState::new(first_run_regime(&catalog, &config), config.history_capacity)
            }
        };

        state.history.set_capacity(config.history_capacity);
        if let Some(pool) = state.custom_pool {
            catalog.set_custom_pool_template(pool);
        }
        if !catalog.contains(&state.active_regime_id) {
            let fallback = first_run_regime(&catalog, &config);
            log::warn!(
                "Saved regime '{}' is not in the catalog, using '{}'",
                state.active_regime_id,
                fallback
            );
            state.active_regime_id = fallback;
        }

        Ok(Self { store, catalog, config, clock, state })
    }

    // ========================
    // Operations
    // ========================

    /// Places a card of `kind` on an empty slot. Non-fasting kinds spend one
    /// token from the week of `date`.
    pub fn play_card(&mut self, date: NaiveDate, slot: MealSlot, kind: CardKind) -> Result<PlayReceipt> {
        if !self.config.has_slot(slot) {
            return Err(GameError::SlotUnavailable { slot });
        }
        if self.state.days.is_occupied(date, slot) {
            return Err(GameError::SlotOccupied { date, slot });
        }

        let now = self.clock.now_millis();
        let remaining = if kind.is_spendable() {
            let regime = self.catalog.get(&self.state.active_regime_id)?;
            let entry = self.state.weeks.get_or_create(WeekAnchor::of(date), regime, now);
            if !entry.try_spend(kind) {
                return Err(GameError::DeckExhausted { kind });
            }
            Some(entry.remaining().count(kind))
        } else {
            None
        };

        self.state.days.set_slot(date, slot, PlayedCard::new(kind, now))?;
        log::debug!("Played {} on {} {} (remaining: {:?})", kind, date, slot, remaining);

        self.persist()?;
        Ok(PlayReceipt { date, slot, kind, remaining })
    }

    /// Frees the slot and returns its token to the week, unless it was fasting.
    pub fn cancel_card(&mut self, date: NaiveDate, slot: MealSlot) -> Result<PlayedCard> {
        let regime = self.catalog.get(&self.state.active_regime_id)?;
        let card = self
            .state
            .days
            .clear_slot(date, slot)
            .ok_or(GameError::NothingToCancel { date, slot })?;

        if card.kind.is_spendable() {
            let now = self.clock.now_millis();
            self.state.weeks.get_or_create(WeekAnchor::of(date), regime, now).credit(card.kind);
        }
        log::debug!("Cancelled {} on {} {}", card.kind, date, slot);

        self.persist()?;
        Ok(card)
    }

    /// Switches the regime used for weeks not provisioned yet. Existing weeks
    /// keep their pools.
    pub fn set_regime(&mut self, regime_id: &str, custom_pool: Option<RegimePool>) -> Result<()> {
        if !self.catalog.contains(regime_id) {
            return Err(GameError::UnknownRegime { id: regime_id.to_string() });
        }

        if regime_id == CUSTOM_REGIME_ID {
            if let Some(pool) = custom_pool {
                self.catalog.set_custom_pool_template(pool);
                self.state.custom_pool = Some(pool);
            }
        }
        self.state.active_regime_id = regime_id.to_string();
        log::info!("Regime set to '{}'", regime_id);

        self.persist()
    }

    /// Re-seeds the week from the active regime. Cards already played in
    /// that week stay on their slots.
    pub fn reset_week(&mut self, anchor: WeekAnchor) -> Result<RegimePool> {
        let now = self.clock.now_millis();
        let regime = self.catalog.get(&self.state.active_regime_id)?;
        let pool = self.state.weeks.reset_week(anchor, regime, now).remaining();
        log::info!("Week {} reset to regime '{}'", anchor, regime.id);

        self.persist()?;
        Ok(pool)
    }

    /// Wipes the snapshot and the legacy copy, back to first-run defaults.
    pub fn reset_all(&mut self) -> Result<()> {
        let key = self.config.storage_key.as_str();
        self.store.delete(key)?;
        self.store.clear_legacy(key)?;

        self.catalog.set_custom_pool_template(FALLBACK_POOL);
        self.state =
            GameState::new(first_run_regime(&self.catalog, &self.config), self.config.history_capacity);
        log::info!("All game data reset");
        Ok(())
    }

    /// Archives the day's summary in the bounded history.
    pub fn archive_day(&mut self, date: NaiveDate) -> Result<DayRecord> {
        let summary = self.day_summary(date);
        let record = DayRecord {
            date,
            summary,
            complete: summary.is_complete(),
            archived_at: self.clock.now_millis(),
        };
        self.state.history.archive(record.clone());

        self.persist()?;
        Ok(record)
    }

    /// Writes the current in-memory state again.
    pub fn flush(&mut self) -> Result<()> {
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let save = self.state.to_save();
        self.store.set(&self.config.storage_key, &save)?;
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    pub fn list_regimes(&self) -> Vec<&RegimeDefinition> {
        self.catalog.list_regimes()
    }

    pub fn active_regime(&self) -> Result<&RegimeDefinition> {
        self.catalog.get(&self.state.active_regime_id)
    }

    /// Copy of the day's slots
    pub fn slots(&self, date: NaiveDate) -> DaySchedule {
        self.state.days.slots(date)
    }

    /// Remaining pool if the week has been provisioned
    pub fn peek_pool(&self, anchor: WeekAnchor) -> Option<RegimePool> {
        self.state.weeks.pool(anchor)
    }

    /// Remaining pool of the week, provisioning it from the active regime on
    /// first access. A newly provisioned week is persisted.
    pub fn week_pool(&mut self, anchor: WeekAnchor) -> Result<RegimePool> {
        let created = !self.state.weeks.contains(anchor);
        let now = self.clock.now_millis();
        let regime = self.catalog.get(&self.state.active_regime_id)?;
        let pool = self.state.weeks.get_or_create(anchor, regime, now).remaining();

        if created {
            self.persist()?;
        }
        Ok(pool)
    }

    pub fn week_state(&mut self, anchor: WeekAnchor) -> Result<WeekState> {
        let remaining = self.week_pool(anchor)?;
        let week_regime_id = self
            .state
            .weeks
            .get(anchor)
            .map_or_else(|| self.state.active_regime_id.clone(), |e| e.regime_id().to_string());

        Ok(WeekState {
            week_start: anchor,
            active_regime: self.active_regime()?.clone(),
            week_regime_id,
            remaining,
            is_current_week: anchor == WeekAnchor::of(self.clock.today()),
        })
    }

    pub fn day_summary(&self, date: NaiveDate) -> DaySummary {
        let meals = self.config.meal_slots();
        match self.state.days.get(date) {
            Some(day) => DaySummary::of(day, &meals),
            None => DaySummary::of(&DaySchedule::new(), &meals),
        }
    }

    /// Monday..Sunday view of a week
    pub fn week_days(&self, anchor: WeekAnchor) -> Vec<WeekDay> {
        let today = self.clock.today();
        days_in_week(anchor)
            .into_iter()
            .map(|date| WeekDay {
                date,
                weekday: date.weekday(),
                is_today: date == today,
                slots: self.slots(date),
                summary: self.day_summary(date),
            })
            .collect()
    }

    pub fn is_day_complete(&self, date: NaiveDate) -> bool {
        let meals = self.config.meal_slots();
        self.state.days.get(date).is_some_and(|day| day.is_complete(&meals))
    }

    /// Consecutive complete days ending at `as_of`. An unfinished `as_of`
    /// does not break the streak; counting then starts the day before.
    pub fn streak(&self, as_of: NaiveDate) -> u32 {
        let mut cursor =
            if self.is_day_complete(as_of) { Some(as_of) } else { as_of.pred_opt() };
        let mut streak = 0;
        while let Some(day) = cursor {
            if !self.is_day_complete(day) {
                break;
            }
            streak += 1;
            cursor = day.pred_opt();
        }
        streak
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RegimeCatalog {
        &self.catalog
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn first_run_regime(catalog: &RegimeCatalog, config: &GameConfig) -> String {
    if catalog.contains(&config.default_regime) {
        config.default_regime.clone()
    } else {
        catalog.default_regime_id().to_string()
    }
}
