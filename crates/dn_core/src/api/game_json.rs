//! JSON request/response surface for the UI layer
//!
//! Rule rejections come back as `success: false` with the reason string.
//! Malformed requests and storage faults are returned as `Err`.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{parse_date, WeekAnchor};
use crate::cards::{CardKind, MealSlot, PlayedCard, RegimePool};
use crate::error::GameError;
use crate::game::{DaySummary, Game, WeekDay, WeekState};
use crate::regime::RegimeDefinition;
use crate::schedule::DaySchedule;
use crate::storage::StateStore;

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub request: GameRequestType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum GameRequestType {
    PlayCard { date: String, meal: String, card: String },

    CancelCard { date: String, meal: String },

    SetRegime {
        regime: String,
        #[serde(default)]
        custom_deck: Option<RegimePool>,
    },

    /// Re-seeds the week from the active regime
    ResetWeek { week_start: String },

    /// Deck status plus the seven days; provisions the week
    GetWeek { week_start: String },

    GetDay { date: String },

    ListRegimes,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub success: bool,
    pub response_type: GameResponseType,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum GameResponseType {
    CardPlayed {
        date: NaiveDate,
        meal: MealSlot,
        card: CardKind,
        /// `None` for fasting
        remaining: Option<u32>,
    },

    CardCancelled { date: NaiveDate, meal: MealSlot, card: PlayedCard, pool: Option<RegimePool> },

    RegimeSet { regime: RegimeDefinition },

    WeekReset { week_start: WeekAnchor, remaining: RegimePool },

    Week { state: WeekState, days: Vec<WeekDay> },

    Day { date: NaiveDate, slots: DaySchedule, summary: DaySummary, complete: bool },

    Regimes { regimes: Vec<RegimeDefinition> },

    /// Rule rejection
    Rejected { reason: String },
}

fn parse_field<T: FromStr>(value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| e.to_string())
}

/// Handles one request against `game` and returns the serialized response.
pub fn handle_request_json<S: StateStore>(
    game: &mut Game<S>,
    request_json: &str,
) -> Result<String, String> {
    let request: GameRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let outcome = match request.request {
        GameRequestType::PlayCard { date, meal, card } => {
            let date = parse_date(&date).map_err(|e| e.to_string())?;
            let slot: MealSlot = parse_field(&meal)?;
            let kind: CardKind = parse_field(&card)?;

            game.play_card(date, slot, kind).map(|receipt| GameResponseType::CardPlayed {
                date: receipt.date,
                meal: receipt.slot,
                card: receipt.kind,
                remaining: receipt.remaining,
            })
        }

        GameRequestType::CancelCard { date, meal } => {
            let date = parse_date(&date).map_err(|e| e.to_string())?;
            let slot: MealSlot = parse_field(&meal)?;

            game.cancel_card(date, slot).map(|card| GameResponseType::CardCancelled {
                date,
                meal: slot,
                card,
                pool: game.peek_pool(WeekAnchor::of(date)),
            })
        }

        GameRequestType::SetRegime { regime, custom_deck } => game
            .set_regime(regime.trim(), custom_deck)
            .and_then(|()| game.active_regime().cloned())
            .map(|regime| GameResponseType::RegimeSet { regime }),

        GameRequestType::ResetWeek { week_start } => {
            let anchor: WeekAnchor = parse_field(&week_start)?;
            game.reset_week(anchor)
                .map(|remaining| GameResponseType::WeekReset { week_start: anchor, remaining })
        }

        GameRequestType::GetWeek { week_start } => {
            let anchor: WeekAnchor = parse_field(&week_start)?;
            game.week_state(anchor)
                .map(|state| GameResponseType::Week { state, days: game.week_days(anchor) })
        }

        GameRequestType::GetDay { date } => {
            let date = parse_date(&date).map_err(|e| e.to_string())?;
            Ok(GameResponseType::Day {
                date,
                slots: game.slots(date),
                summary: game.day_summary(date),
                complete: game.is_day_complete(date),
            })
        }

        GameRequestType::ListRegimes => Ok(GameResponseType::Regimes {
            regimes: game.list_regimes().into_iter().cloned().collect(),
        }),
    };

    let response = match outcome {
        Ok(response_type) => GameResponse {
            schema_version: SCHEMA_VERSION,
            success: true,
            response_type,
            error_message: None,
        },
        Err(e) if e.is_expected() => rejected(&e),
        Err(e) => {
            log::error!("Request failed: {}", e);
            return Err(e.to_string());
        }
    };

    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {}", e))
}

fn rejected(error: &GameError) -> GameResponse {
    let reason = error.reason();
    GameResponse {
        schema_version: SCHEMA_VERSION,
        success: false,
        response_type: GameResponseType::Rejected { reason: reason.clone() },
        error_message: Some(reason),
    }
}
