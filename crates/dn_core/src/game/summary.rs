// Read-only views over a day and a week
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::WeekAnchor;
use crate::cards::{CardKind, MealSlot, RegimePool};
use crate::regime::RegimeDefinition;
use crate::schedule::DaySchedule;

/// Cards played per kind, fasting included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardTally {
    pub discipline: u32,
    pub flex: u32,
    pub joker: u32,
    pub fasting: u32,
}

impl CardTally {
    pub fn count(&self, kind: CardKind) -> u32 {
        match kind {
            CardKind::Discipline => self.discipline,
            CardKind::Flex => self.flex,
            CardKind::Joker => self.joker,
            CardKind::Fasting => self.fasting,
        }
    }

    fn add(&mut self, kind: CardKind) {
        match kind {
            CardKind::Discipline => self.discipline += 1,
            CardKind::Flex => self.flex += 1,
            CardKind::Joker => self.joker += 1,
            CardKind::Fasting => self.fasting += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySummary {
    /// Configured meal slots
    pub total: u32,
    /// Slots holding a card
    pub filled: u32,
    pub tally: CardTally,
}

impl DaySummary {
    /// Counts only the slots in `meals`.
    pub fn of(day: &DaySchedule, meals: &[MealSlot]) -> Self {
        let mut summary = DaySummary { total: meals.len() as u32, ..Default::default() };
        for slot in meals {
            if let Some(card) = day.get(*slot) {
                summary.filled += 1;
                summary.tally.add(card.kind);
            }
        }
        summary
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.filled == self.total
    }
}

/// One day of a week view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_today: bool,
    pub slots: DaySchedule,
    pub summary: DaySummary,
}

/// Deck status of a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekState {
    pub week_start: WeekAnchor,
    /// Regime new weeks will be seeded from
    pub active_regime: RegimeDefinition,
    /// Regime this week was seeded from
    pub week_regime_id: String,
    pub remaining: RegimePool,
    pub is_current_week: bool,
}
