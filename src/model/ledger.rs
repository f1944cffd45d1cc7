use crate::model::{Amount, DayKey, WeekKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sparse map from a composite key to an amount. A key that is not present reads as zero, and
/// writing zero removes the key, so only meaningful cells are ever stored or sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger<K: Ord> {
    cells: BTreeMap<K, Amount>,
}

/// Expense cells keyed by (month, day, category).
pub type DailyExpenses = Ledger<DayKey>;

/// Income cells keyed by (month, week).
pub type WeeklyIncomes = Ledger<WeekKey>;

impl<K: Ord> Default for Ledger<K> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Ledger<K> {
    /// Point read. Missing cells are zero.
    pub fn get(&self, key: &K) -> Amount {
        self.cells.get(key).copied().unwrap_or_default()
    }

    /// Point write, overwriting whatever was there.
    pub fn set(&mut self, key: K, amount: Amount) {
        if amount.is_zero() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, amount);
        }
    }

    /// Point increment. Returns the new value of the cell.
    pub fn add(&mut self, key: K, amount: Amount) -> Amount {
        let total = self.cells.get(&key).copied().unwrap_or_default() + amount;
        self.set(key, total);
        total
    }

    /// Stored cells in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Amount)> {
        self.cells.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reads_zero() {
        let ledger = DailyExpenses::default();
        assert_eq!(ledger.get(&DayKey::new(0, 1, "Rent")), Amount::ZERO);
    }

    #[test]
    fn test_add_accumulates() {
        let mut ledger = WeeklyIncomes::default();
        let key = WeekKey::new(2, 0);
        ledger.add(key, Amount::from(100));
        let total = ledger.add(key, Amount::from(50));
        assert_eq!(total, Amount::from(150));
        assert_eq!(ledger.get(&key), Amount::from(150));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_saturates() {
        let mut ledger = WeeklyIncomes::default();
        let key = WeekKey::new(0, 0);
        let big: Amount = "79000000000000000000000000000".parse().unwrap();
        ledger.add(key, big);
        let total = ledger.add(key, big);
        assert_eq!(total, Amount::new(rust_decimal::Decimal::MAX));
    }

    #[test]
    fn test_set_zero_removes() {
        let mut ledger = DailyExpenses::default();
        let key = DayKey::new(5, 20, "Food");
        ledger.set(key.clone(), Amount::from(12));
        assert_eq!(ledger.len(), 1);
        ledger.set(key.clone(), Amount::ZERO);
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(&key), Amount::ZERO);
    }

    #[test]
    fn test_serializes_as_string_keyed_object() {
        let mut ledger = DailyExpenses::default();
        ledger.set(DayKey::new(2, 5, "Rent"), Amount::from(100));
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"2-5-Rent":100}"#);
        let back: DailyExpenses = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
