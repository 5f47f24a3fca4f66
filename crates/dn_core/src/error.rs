use chrono::NaiveDate;
use thiserror::Error;

use crate::cards::{CardKind, MealSlot};
use crate::storage::StoreError;

/// Errors returned by the game facade.
///
/// Everything except [`GameError::Storage`] is an expected outcome of a user
/// action and carries a reason string that the UI can show verbatim.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("This meal already has a card ({slot} on {date})")]
    SlotOccupied { date: NaiveDate, slot: MealSlot },

    #[error("No {} cards left this week!", kind.name())]
    DeckExhausted { kind: CardKind },

    #[error("No card to cancel ({slot} on {date})")]
    NothingToCancel { date: NaiveDate, slot: MealSlot },

    #[error("Unknown regime: {id}")]
    UnknownRegime { id: String },

    #[error("{} is not one of the configured meals", slot.display_name())]
    SlotUnavailable { slot: MealSlot },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl GameError {
    /// True for rule rejections, false for persistence faults.
    pub fn is_expected(&self) -> bool {
        !matches!(self, GameError::Storage(_))
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Rejections raised while turning raw strings into domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown card kind: {0}")]
    UnknownCardKind(String),

    #[error("Unknown meal: {0}")]
    UnknownMealSlot(String),

    #[error("{0} is not a Monday")]
    NotAMonday(NaiveDate),
}

pub type Result<T> = std::result::Result<T, GameError>;
