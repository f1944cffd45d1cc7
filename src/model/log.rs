//! The append-only transaction logs.

use crate::model::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    timestamp: DateTime<Utc>,
    date: NaiveDate,
    amount: Amount,
    #[serde(default)]
    item: String,
    category: String,
}

impl ExpenseEntry {
    /// Creates an entry with a fresh id, stamped with the current time.
    pub fn new(
        date: NaiveDate,
        amount: Amount,
        item: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            date,
            amount,
            item: item.into(),
            category: category.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// One recorded income payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    timestamp: DateTime<Utc>,
    date: NaiveDate,
    amount: Amount,
    source: String,
    #[serde(default, deserialize_with = "string_or_null")]
    invoice: String,
}

impl IncomeEntry {
    pub fn new(
        date: NaiveDate,
        amount: Amount,
        source: impl Into<String>,
        invoice: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            date,
            amount,
            source: source.into(),
            invoice: invoice.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The invoice reference, empty when none was given.
    pub fn invoice(&self) -> &str {
        &self.invoice
    }
}

/// An ordered, append-only sequence of entries. Entries are stored oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Log<E> {
    entries: Vec<E>,
}

impl<E> Default for Log<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Log<E> {
    /// Appends at the end and returns the stored entry.
    pub(crate) fn append(&mut self, entry: E) -> &E {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in the order they were appended.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &E> {
        self.entries.iter()
    }

    /// Entries for display, newest first.
    pub fn recent_first(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Older trackers used millisecond timestamps as entry ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_recent_first() {
        let mut log = Log::default();
        log.append(ExpenseEntry::new(date("2025-01-01"), Amount::from(1), "a", "Food"));
        log.append(ExpenseEntry::new(date("2025-01-02"), Amount::from(2), "b", "Food"));
        log.append(ExpenseEntry::new(date("2025-01-03"), Amount::from(3), "c", "Food"));
        let items: Vec<&str> = log.recent_first().map(|e| e.item()).collect();
        assert_eq!(items, vec!["c", "b", "a"]);
        let items: Vec<&str> = log.iter().map(|e| e.item()).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = IncomeEntry::new(date("2025-01-01"), Amount::from(1), "Salary", "");
        let b = IncomeEntry::new(date("2025-01-01"), Amount::from(1), "Salary", "");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_deserialize_backend_entry() {
        let json = r#"{
            "amount": 25.5,
            "category": "Food",
            "date": "2025-03-05",
            "item": "Lunch",
            "id": 1741176000000,
            "timestamp": "2025-03-05T12:00:00.000Z"
        }"#;
        let entry: ExpenseEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id(), "1741176000000");
        assert_eq!(entry.date(), date("2025-03-05"));
        assert_eq!(entry.amount().to_string(), "$25.50");
    }

    #[test]
    fn test_deserialize_income_without_invoice() {
        let json = r#"{
            "amount": "1500",
            "source": "Salary",
            "date": "2025-03-05",
            "id": "abc",
            "timestamp": "2025-03-05T12:00:00Z",
            "invoice": null
        }"#;
        let entry: IncomeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.invoice(), "");
        assert_eq!(entry.amount(), Amount::from(1500));
    }
}
