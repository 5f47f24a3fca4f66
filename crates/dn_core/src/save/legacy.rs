//! Import of the browser-era JSON state
//!
//! Shape:
//!
//! ```json
//! {
//!   "regimeMode": "lowcarb",
//!   "customDeck": { "discipline": 10, "flex": 8, "joker": 3 },
//!   "weeks": { "2024-06-03": { "remainingCards": { "discipline": 14, "flex": 4, "joker": 2 } } },
//!   "days": { "2024-06-03": { "meals": { "breakfast": { "type": "discipline", "timestamp": 1717400000000 }, "lunch": null } } }
//! }
//! ```
//!
//! Entries that cannot be mapped (unknown card types, meal names, dates) are
//! skipped with a warning rather than failing the whole import.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use super::format::GameSave;
use crate::calendar::{parse_date, WeekAnchor};
use crate::cards::{CardKind, MealSlot, PlayedCard, RegimePool};
use crate::history::History;
use crate::ledger::{WeekLedger, WeekLedgerEntry};
use crate::schedule::{DaySchedule, ScheduleBook};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySnapshot {
    #[serde(default)]
    pub regime_mode: Option<String>,
    #[serde(default)]
    pub custom_deck: Option<LegacyPool>,
    #[serde(default)]
    pub weeks: HashMap<String, LegacyWeek>,
    #[serde(default)]
    pub days: HashMap<String, LegacyDay>,
}

/// Counts were plain JS numbers
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LegacyPool {
    #[serde(default)]
    pub discipline: i64,
    #[serde(default)]
    pub flex: i64,
    #[serde(default)]
    pub joker: i64,
}

impl LegacyPool {
    fn to_pool(self) -> RegimePool {
        let clamp = |n: i64| u32::try_from(n.max(0)).unwrap_or(u32::MAX);
        if self.discipline < 0 || self.flex < 0 || self.joker < 0 {
            log::warn!("Legacy deck had negative counts, clamping to zero: {:?}", self);
        }
        RegimePool::new(clamp(self.discipline), clamp(self.flex), clamp(self.joker))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyWeek {
    #[serde(default)]
    pub remaining_cards: LegacyPool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyDay {
    #[serde(default)]
    pub meals: HashMap<String, Option<LegacyMeal>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyMeal {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: u64,
}

impl LegacySnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Version-0 save; `migrate_save` finishes the normalisation.
    ///
    /// The old format did not record which regime seeded a week, so every
    /// imported week is attributed to the regime that was active at export.
    pub fn into_save(self, now: u64) -> GameSave {
        let regime_id = self.regime_mode.unwrap_or_default();

        let mut weeks = WeekLedger::new();
        for (key, week) in self.weeks {
            let anchor = match parse_date(&key).and_then(WeekAnchor::try_from) {
                Ok(anchor) => anchor,
                Err(e) => {
                    log::warn!("Skipping legacy week '{}': {}", key, e);
                    continue;
                }
            };
            let entry = WeekLedgerEntry::from_parts(
                regime_id.trim().to_ascii_lowercase(),
                week.remaining_cards.to_pool(),
                now,
            );
            weeks.insert(anchor, entry);
        }

        let mut days = ScheduleBook::new();
        for (key, day) in self.days {
            let date = match parse_date(&key) {
                Ok(date) => date,
                Err(e) => {
                    log::warn!("Skipping legacy day '{}': {}", key, e);
                    continue;
                }
            };
            days.insert_day(date, convert_day(date, day));
        }

        GameSave {
            version: 0,
            timestamp: now,
            active_regime_id: regime_id,
            custom_pool: self.custom_deck.map(LegacyPool::to_pool),
            weeks,
            days,
            history: History::default(),
        }
    }
}

fn convert_day(date: NaiveDate, day: LegacyDay) -> DaySchedule {
    let mut schedule = DaySchedule::new();
    for (meal_name, meal) in day.meals {
        let Some(meal) = meal else {
            continue;
        };
        let slot = match meal_name.parse::<MealSlot>() {
            Ok(slot) => slot,
            Err(e) => {
                log::warn!("Skipping legacy meal on {}: {}", date, e);
                continue;
            }
        };
        let kind = match meal.kind.parse::<CardKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("Skipping legacy {} on {}: {}", slot, date, e);
                continue;
            }
        };
        schedule.insert(slot, PlayedCard::new(kind, meal.timestamp));
    }
    schedule
}
