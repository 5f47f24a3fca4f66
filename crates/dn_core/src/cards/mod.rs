// Card kinds, meal slots and weekly token pools
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Card kind played on a meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Discipline, // 💪 on-plan meal
    Flex,       // 🔄 small deviation
    Joker,      // 🃏 free meal
    Fasting,    // 🍃 skipped meal, consumes no token
}

impl CardKind {
    /// Kinds counted in a weekly pool, in display order
    pub const SPENDABLE: [CardKind; 3] = [CardKind::Discipline, CardKind::Flex, CardKind::Joker];

    pub const ALL: [CardKind; 4] =
        [CardKind::Discipline, CardKind::Flex, CardKind::Joker, CardKind::Fasting];

    pub fn is_spendable(self) -> bool {
        !matches!(self, CardKind::Fasting)
    }

    /// Stable lowercase id used in keys and JSON
    pub fn id(self) -> &'static str {
        match self {
            CardKind::Discipline => "discipline",
            CardKind::Flex => "flex",
            CardKind::Joker => "joker",
            CardKind::Fasting => "fasting",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CardKind::Discipline => "Discipline",
            CardKind::Flex => "Flex",
            CardKind::Joker => "Joker",
            CardKind::Fasting => "Fasting",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            CardKind::Discipline => "💪",
            CardKind::Flex => "🔄",
            CardKind::Joker => "🃏",
            CardKind::Fasting => "🍃",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CardKind::Discipline => "A meal that follows the plan",
            CardKind::Flex => "A meal with a small deviation",
            CardKind::Joker => "A free meal, no rules",
            CardKind::Fasting => "Meal skipped, no card spent",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CardKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discipline" => Ok(CardKind::Discipline),
            "flex" => Ok(CardKind::Flex),
            "joker" => Ok(CardKind::Joker),
            "fasting" => Ok(CardKind::Fasting),
            _ => Err(ParseError::UnknownCardKind(s.to_string())),
        }
    }
}

/// Meal slot of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] =
        [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner, MealSlot::Snack];

    /// The three main meals every configuration has
    pub const MAIN: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn id(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MealSlot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            // older exports used the plural
            "snack" | "snacks" => Ok(MealSlot::Snack),
            _ => Err(ParseError::UnknownMealSlot(s.to_string())),
        }
    }
}

/// A card sitting on a meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub kind: CardKind,
    /// Unix milliseconds
    pub timestamp: u64,
}

impl PlayedCard {
    pub fn new(kind: CardKind, timestamp: u64) -> Self {
        Self { kind, timestamp }
    }

    pub fn is_fasting(&self) -> bool {
        self.kind == CardKind::Fasting
    }
}

/// Token counts per spendable kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegimePool {
    pub discipline: u32,
    pub flex: u32,
    pub joker: u32,
}

impl RegimePool {
    pub const fn new(discipline: u32, flex: u32, joker: u32) -> Self {
        Self { discipline, flex, joker }
    }

    /// Remaining count for `kind`; always 0 for fasting
    pub fn count(&self, kind: CardKind) -> u32 {
        match kind {
            CardKind::Discipline => self.discipline,
            CardKind::Flex => self.flex,
            CardKind::Joker => self.joker,
            CardKind::Fasting => 0,
        }
    }

    // Only the ledger entry mutates counts through this.
    pub(crate) fn count_mut(&mut self, kind: CardKind) -> Option<&mut u32> {
        match kind {
            CardKind::Discipline => Some(&mut self.discipline),
            CardKind::Flex => Some(&mut self.flex),
            CardKind::Joker => Some(&mut self.joker),
            CardKind::Fasting => None,
        }
    }

    pub fn total(&self) -> u32 {
        self.discipline.saturating_add(self.flex).saturating_add(self.joker)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardKind, u32)> + '_ {
        CardKind::SPENDABLE.iter().map(move |kind| (*kind, self.count(*kind)))
    }
}
