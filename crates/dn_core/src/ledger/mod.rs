//! Week ledger
//!
//! One entry per week anchor holding the tokens *remaining* for that week.
//! An entry is seeded from the regime active when the week is first touched
//! and is never re-seeded implicitly afterwards; only [`WeekLedger::reset_week`]
//! does that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::WeekAnchor;
use crate::cards::{CardKind, RegimePool};
use crate::regime::RegimeDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLedgerEntry {
    /// Regime the week was seeded from
    regime_id: String,
    remaining: RegimePool,
    /// Unix milliseconds
    created_at: u64,
}

impl WeekLedgerEntry {
    pub fn seeded(regime: &RegimeDefinition, created_at: u64) -> Self {
        Self { regime_id: regime.id.clone(), remaining: regime.pool, created_at }
    }

    /// Rebuilds an entry from stored parts (legacy import).
    pub(crate) fn from_parts(regime_id: String, remaining: RegimePool, created_at: u64) -> Self {
        Self { regime_id, remaining, created_at }
    }

    pub fn regime_id(&self) -> &str {
        &self.regime_id
    }

    pub fn remaining(&self) -> RegimePool {
        self.remaining
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Takes one token of `kind` if any is left. The only way a count goes down.
    pub fn try_spend(&mut self, kind: CardKind) -> bool {
        match self.remaining.count_mut(kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Gives one token of `kind` back. Fasting is ignored.
    pub fn credit(&mut self, kind: CardKind) {
        if let Some(count) = self.remaining.count_mut(kind) {
            *count = count.saturating_add(1);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekLedger {
    weeks: BTreeMap<WeekAnchor, WeekLedgerEntry>,
}

impl WeekLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, anchor: WeekAnchor) -> Option<&WeekLedgerEntry> {
        self.weeks.get(&anchor)
    }

    /// Remaining pool without provisioning
    pub fn pool(&self, anchor: WeekAnchor) -> Option<RegimePool> {
        self.weeks.get(&anchor).map(WeekLedgerEntry::remaining)
    }

    pub fn contains(&self, anchor: WeekAnchor) -> bool {
        self.weeks.contains_key(&anchor)
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekAnchor, &WeekLedgerEntry)> {
        self.weeks.iter()
    }

    /// Live entry for `anchor`, seeded from `regime` when the week is unseen.
    /// An existing entry is returned as is.
    pub fn get_or_create(
        &mut self,
        anchor: WeekAnchor,
        regime: &RegimeDefinition,
        now: u64,
    ) -> &mut WeekLedgerEntry {
        self.weeks.entry(anchor).or_insert_with(|| {
            log::debug!("Provisioning week {} from regime '{}'", anchor, regime.id);
            WeekLedgerEntry::seeded(regime, now)
        })
    }

    /// Drops the entry for `anchor` and seeds it again from `regime`.
    pub fn reset_week(
        &mut self,
        anchor: WeekAnchor,
        regime: &RegimeDefinition,
        now: u64,
    ) -> &mut WeekLedgerEntry {
        self.weeks.remove(&anchor);
        self.get_or_create(anchor, regime, now)
    }

    pub(crate) fn insert(&mut self, anchor: WeekAnchor, entry: WeekLedgerEntry) {
        self.weeks.insert(anchor, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn regime(id: &str, pool: RegimePool) -> RegimeDefinition {
        RegimeDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            pool,
        }
    }

    fn anchor(y: i32, m: u32, d: u32) -> WeekAnchor {
        WeekAnchor::of(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_lazy_seed() {
        let mut ledger = WeekLedger::new();
        let lowcarb = regime("lowcarb", RegimePool::new(15, 4, 2));
        let week = anchor(2024, 6, 3);

        assert!(ledger.pool(week).is_none());
        let entry = ledger.get_or_create(week, &lowcarb, 1);
        assert_eq!(entry.remaining(), RegimePool::new(15, 4, 2));
        assert_eq!(entry.regime_id(), "lowcarb");
        assert!(ledger.contains(week));
    }

    #[test]
    fn test_get_or_create_does_not_reseed() {
        let mut ledger = WeekLedger::new();
        let lowcarb = regime("lowcarb", RegimePool::new(15, 4, 2));
        let strict = regime("strict", RegimePool::new(18, 2, 1));
        let week = anchor(2024, 6, 3);

        assert!(ledger.get_or_create(week, &lowcarb, 1).try_spend(CardKind::Discipline));

        // A later regime never re-seeds an existing week
        let entry = ledger.get_or_create(week, &strict, 2);
        assert_eq!(entry.remaining(), RegimePool::new(14, 4, 2));
        assert_eq!(entry.regime_id(), "lowcarb");
        assert_eq!(entry.created_at(), 1);
    }

    #[test]
    fn test_try_spend_stops_at_zero() {
        let mut ledger = WeekLedger::new();
        let tiny = regime("tiny", RegimePool::new(0, 0, 1));
        let entry = ledger.get_or_create(anchor(2024, 6, 3), &tiny, 0);

        assert!(entry.try_spend(CardKind::Joker));
        assert!(!entry.try_spend(CardKind::Joker));
        assert!(!entry.try_spend(CardKind::Discipline));
        assert!(!entry.try_spend(CardKind::Fasting));
        assert_eq!(entry.remaining(), RegimePool::new(0, 0, 0));
    }

    #[test]
    fn test_credit_ignores_fasting() {
        let mut entry = WeekLedgerEntry::seeded(&regime("r", RegimePool::new(1, 1, 1)), 0);
        entry.credit(CardKind::Fasting);
        assert_eq!(entry.remaining(), RegimePool::new(1, 1, 1));

        entry.credit(CardKind::Flex);
        assert_eq!(entry.remaining(), RegimePool::new(1, 2, 1));
    }

    #[test]
    fn test_reset_week_reseeds_from_given_regime() {
        let mut ledger = WeekLedger::new();
        let lowcarb = regime("lowcarb", RegimePool::new(15, 4, 2));
        let strict = regime("strict", RegimePool::new(18, 2, 1));
        let week = anchor(2024, 6, 3);

        ledger.get_or_create(week, &lowcarb, 0).try_spend(CardKind::Joker);
        let entry = ledger.reset_week(week, &strict, 5);

        assert_eq!(entry.remaining(), RegimePool::new(18, 2, 1));
        assert_eq!(entry.regime_id(), "strict");
        assert_eq!(entry.created_at(), 5);
    }

    #[test]
    fn test_weeks_are_isolated() {
        let mut ledger = WeekLedger::new();
        let lowcarb = regime("lowcarb", RegimePool::new(15, 4, 2));
        let a = anchor(2024, 6, 3);
        let b = anchor(2024, 6, 10);

        ledger.get_or_create(b, &lowcarb, 0);
        ledger.get_or_create(a, &lowcarb, 0).try_spend(CardKind::Flex);

        assert_eq!(ledger.pool(a), Some(RegimePool::new(15, 3, 2)));
        assert_eq!(ledger.pool(b), Some(RegimePool::new(15, 4, 2)));
        assert_eq!(ledger.len(), 2);
    }
}
