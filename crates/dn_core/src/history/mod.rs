//! Archived day records
//!
//! Bounded, append-only: once full, archiving a new date evicts the oldest
//! record. Archiving a date that is already present replaces that record.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::game::DaySummary;

pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub summary: DaySummary,
    /// Every configured meal held a card
    pub complete: bool,
    /// Unix milliseconds
    pub archived_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    records: VecDeque<DayRecord>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), records: VecDeque::new() }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the bound, evicting the oldest records that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict();
    }

    pub fn archive(&mut self, record: DayRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.date == record.date) {
            *existing = record;
            return;
        }
        self.records.push_back(record);
        self.evict();
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn evict(&mut self) {
        while self.records.len() > self.capacity {
            if let Some(dropped) = self.records.pop_front() {
                log::debug!("History full, evicting {}", dropped.date);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, filled: u32) -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            summary: DaySummary { total: 3, filled, ..Default::default() },
            complete: filled == 3,
            archived_at: u64::from(day),
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let mut history = History::with_capacity(2);
        history.archive(record(1, 3));
        history.archive(record(2, 3));
        history.archive(record(3, 1));

        let dates: Vec<u32> = history.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(dates, vec![2, 3]);
    }

    #[test]
    fn test_rearchive_replaces() {
        let mut history = History::with_capacity(5);
        history.archive(record(1, 1));
        history.archive(record(1, 3));

        assert_eq!(history.len(), 1);
        assert!(history.get(record(1, 0).date).unwrap().complete);
    }

    #[test]
    fn test_shrinking_capacity() {
        let mut history = History::with_capacity(5);
        for day in 1..=5 {
            history.archive(record(day, 3));
        }
        history.set_capacity(3);
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().next().unwrap().archived_at, 3);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let history = History::with_capacity(0);
        assert_eq!(history.capacity(), 1);
    }
}
