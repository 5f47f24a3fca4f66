// Day schedules: which card sits on which meal slot, per date
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cards::{MealSlot, PlayedCard};
use crate::error::GameError;

/// Slots of one day. A missing slot is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule {
    slots: BTreeMap<MealSlot, PlayedCard>,
}

impl DaySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: MealSlot) -> Option<&PlayedCard> {
        self.slots.get(&slot)
    }

    pub fn is_occupied(&self, slot: MealSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Occupied slots in slot order
    pub fn occupied(&self) -> impl Iterator<Item = (MealSlot, &PlayedCard)> {
        self.slots.iter().map(|(slot, card)| (*slot, card))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every slot of `meals` holds a card
    pub fn is_complete(&self, meals: &[MealSlot]) -> bool {
        !meals.is_empty() && meals.iter().all(|slot| self.is_occupied(*slot))
    }

    pub(crate) fn insert(&mut self, slot: MealSlot, card: PlayedCard) {
        self.slots.insert(slot, card);
    }
}

/// All day schedules, keyed by date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleBook {
    days: BTreeMap<NaiveDate, DaySchedule>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.get(&date)
    }

    /// Copy of the day's slots; an unseen date yields an empty schedule
    /// without being stored.
    pub fn slots(&self, date: NaiveDate) -> DaySchedule {
        self.days.get(&date).cloned().unwrap_or_default()
    }

    pub fn slot(&self, date: NaiveDate, slot: MealSlot) -> Option<&PlayedCard> {
        self.days.get(&date).and_then(|day| day.get(slot))
    }

    pub fn is_occupied(&self, date: NaiveDate, slot: MealSlot) -> bool {
        self.slot(date, slot).is_some()
    }

    /// Stores `card` on an empty slot. Never overwrites.
    pub fn set_slot(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
        card: PlayedCard,
    ) -> Result<(), GameError> {
        let day = self.days.entry(date).or_default();
        if day.is_occupied(slot) {
            return Err(GameError::SlotOccupied { date, slot });
        }
        day.insert(slot, card);
        Ok(())
    }

    /// Frees the slot and hands back what was on it.
    pub fn clear_slot(&mut self, date: NaiveDate, slot: MealSlot) -> Option<PlayedCard> {
        self.days.get_mut(&date).and_then(|day| day.slots.remove(&slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DaySchedule)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Drops days without any card; returns how many were removed.
    pub(crate) fn prune_empty_days(&mut self) -> usize {
        let before = self.days.len();
        self.days.retain(|_, day| !day.is_empty());
        before - self.days.len()
    }

    pub(crate) fn insert_day(&mut self, date: NaiveDate, day: DaySchedule) {
        self.days.insert(date, day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_unseen_date_is_empty_and_not_stored() {
        let book = ScheduleBook::new();
        assert!(book.slots(date(3)).is_empty());
        assert!(book.is_empty());
    }

    #[test]
    fn test_set_slot_never_overwrites() {
        let mut book = ScheduleBook::new();
        book.set_slot(date(3), MealSlot::Breakfast, PlayedCard::new(CardKind::Discipline, 1))
            .unwrap();

        let err = book
            .set_slot(date(3), MealSlot::Breakfast, PlayedCard::new(CardKind::Joker, 2))
            .unwrap_err();
        assert!(matches!(err, GameError::SlotOccupied { slot: MealSlot::Breakfast, .. }));
        assert_eq!(book.slot(date(3), MealSlot::Breakfast).unwrap().kind, CardKind::Discipline);
    }

    #[test]
    fn test_clear_slot_returns_card() {
        let mut book = ScheduleBook::new();
        book.set_slot(date(4), MealSlot::Dinner, PlayedCard::new(CardKind::Fasting, 7)).unwrap();

        let card = book.clear_slot(date(4), MealSlot::Dinner).unwrap();
        assert!(card.is_fasting());
        assert_eq!(card.timestamp, 7);
        assert!(book.clear_slot(date(4), MealSlot::Dinner).is_none());
        assert!(book.clear_slot(date(5), MealSlot::Dinner).is_none());
    }

    #[test]
    fn test_day_complete() {
        let mut day = DaySchedule::new();
        for slot in MealSlot::MAIN {
            assert!(!day.is_complete(&MealSlot::MAIN));
            day.insert(slot, PlayedCard::new(CardKind::Flex, 0));
        }
        assert!(day.is_complete(&MealSlot::MAIN));
        assert!(!day.is_complete(&MealSlot::ALL));
        assert!(!day.is_complete(&[]));
    }

    #[test]
    fn test_prune_empty_days() {
        let mut book = ScheduleBook::new();
        book.set_slot(date(3), MealSlot::Lunch, PlayedCard::new(CardKind::Flex, 0)).unwrap();
        book.set_slot(date(4), MealSlot::Lunch, PlayedCard::new(CardKind::Flex, 0)).unwrap();
        book.clear_slot(date(4), MealSlot::Lunch);

        assert_eq!(book.prune_empty_days(), 1);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut book = ScheduleBook::new();
        book.set_slot(date(3), MealSlot::Lunch, PlayedCard::new(CardKind::Joker, 42)).unwrap();

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["2024-06-03"]["lunch"]["kind"], "joker");
        assert_eq!(json["2024-06-03"]["lunch"]["timestamp"], 42);
    }
}
