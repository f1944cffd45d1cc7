//! Composite keys for the ledger cells.
//!
//! Keys are ordinary ordered structs in memory. They are only turned into strings at the JSON
//! boundary, using the encoding the tracker backend stores: `"{month}-{day}-{category}"` for daily
//! expense cells and `"{month}-{week}"` for weekly income cells. Months and weeks are zero-based,
//! days are one-based.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifies one daily expense cell: a category on a day of a month.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DayKey {
    month: u32,
    day: u32,
    category: String,
}

impl DayKey {
    pub fn new(month: u32, day: u32, category: impl Into<String>) -> Self {
        Self {
            month,
            day,
            category: category.into(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.month, self.day, self.category)
    }
}

impl FromStr for DayKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Category names may contain dashes, so only the first two separate fields.
        let mut parts = s.splitn(3, '-');
        let (Some(month), Some(day), Some(category)) = (parts.next(), parts.next(), parts.next())
        else {
            anyhow::bail!("DayKey must be in format 'month-day-category', got: {s}");
        };
        let month = month
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid month index in '{s}': {e}"))?;
        let day = day
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid day in '{s}': {e}"))?;
        Ok(DayKey::new(month, day, category))
    }
}

/// Identifies one weekly income cell: a week of a month.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WeekKey {
    month: u32,
    week: u32,
}

impl WeekKey {
    pub fn new(month: u32, week: u32) -> Self {
        Self { month, week }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.month, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((month, week)) = s.split_once('-') else {
            anyhow::bail!("WeekKey must be in format 'month-week', got: {s}");
        };
        let month = month
            .trim()
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid month index in '{s}': {e}"))?;
        let week = week
            .trim()
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid week index in '{s}': {e}"))?;
        Ok(WeekKey::new(month, week))
    }
}

macro_rules! string_serde {
    ($t:ty) => {
        impl Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                <$t>::from_str(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(DayKey);
string_serde!(WeekKey);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key_display() {
        assert_eq!(DayKey::new(2, 5, "Rent").to_string(), "2-5-Rent");
        assert_eq!(DayKey::new(11, 31, "Food & Drink").to_string(), "11-31-Food & Drink");
    }

    #[test]
    fn test_day_key_from_str_with_dashes_in_category() {
        let key: DayKey = "0-15-Take-out".parse().unwrap();
        assert_eq!(key, DayKey::new(0, 15, "Take-out"));
    }

    #[test]
    fn test_day_key_from_str_invalid() {
        assert!("0-15".parse::<DayKey>().is_err());
        assert!("x-15-Rent".parse::<DayKey>().is_err());
        assert!("0-y-Rent".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_week_key_from_str() {
        assert_eq!("3-4".parse::<WeekKey>().unwrap(), WeekKey::new(3, 4));
        assert!("3".parse::<WeekKey>().is_err());
        assert!("3-a".parse::<WeekKey>().is_err());
    }

    #[test]
    fn test_keys_as_json_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(WeekKey::new(1, 0), 5);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1-0":5}"#);
        let back: std::collections::BTreeMap<WeekKey, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_day_keys_order_by_month_then_day() {
        let mut keys = vec![
            DayKey::new(1, 2, "A"),
            DayKey::new(0, 10, "B"),
            DayKey::new(0, 9, "Z"),
        ];
        keys.sort();
        assert_eq!(keys[0], DayKey::new(0, 9, "Z"));
        assert_eq!(keys[2], DayKey::new(1, 2, "A"));
    }
}
