//! Pure rollups of a `YearRecord` into monthly and yearly totals.
//!
//! Nothing here fails or mutates. Cells that fall outside the record's domain (a category that is
//! not in the category list, a day that does not exist in its month, a week index above 4) are
//! not part of any sum.

use crate::error::LedgerError;
use crate::model::calendar::{days_in_month, days_of_week, LAST_WEEK};
use crate::model::{Amount, YearRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Totals for a single month. `category_totals` follows the order of the record's categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub category_totals: Vec<Amount>,
    pub total_expenditure: Amount,
    pub income: Amount,
    pub gross_savings: Amount,
}

impl MonthTotals {
    fn zero(categories: usize) -> Self {
        Self {
            category_totals: vec![Amount::ZERO; categories],
            total_expenditure: Amount::ZERO,
            income: Amount::ZERO,
            gross_savings: Amount::ZERO,
        }
    }
}

/// Everything derived from a year record. `monthly` always has 12 entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedTotals {
    pub monthly: Vec<MonthTotals>,
    pub category_totals: Vec<Amount>,
    pub total_expenditure: Amount,
    pub total_income: Amount,
    pub gross_savings: Amount,
}

/// Computes monthly and yearly totals. The cost is proportional to the number of stored cells.
pub fn aggregate(record: &YearRecord) -> DerivedTotals {
    let categories = record.categories();
    let index: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut monthly = vec![MonthTotals::zero(categories.len()); 12];

    for (key, amount) in record.daily_expenses().iter() {
        let Some(month) = monthly.get_mut(key.month() as usize) else {
            continue;
        };
        if key.day() == 0 || key.day() > days_in_month(record.year(), key.month()) {
            continue;
        }
        if let Some(&c) = index.get(key.category()) {
            month.category_totals[c] += amount;
        }
    }

    for (key, amount) in record.weekly_incomes().iter() {
        if key.week() > LAST_WEEK {
            continue;
        }
        if let Some(month) = monthly.get_mut(key.month() as usize) {
            month.income += amount;
        }
    }

    for month in monthly.iter_mut() {
        month.total_expenditure = month.category_totals.iter().sum();
        month.gross_savings = month.income - month.total_expenditure;
    }

    let category_totals: Vec<Amount> = (0..categories.len())
        .map(|c| monthly.iter().map(|m| m.category_totals[c]).sum())
        .collect();
    let total_expenditure: Amount = category_totals.iter().sum();
    let total_income: Amount = monthly.iter().map(|m| m.income).sum();

    DerivedTotals {
        monthly,
        category_totals,
        total_expenditure,
        total_income,
        gross_savings: total_income - total_expenditure,
    }
}

impl DerivedTotals {
    /// Categories with a positive yearly total, paired with that total, in category order.
    pub fn category_breakdown<'a>(&self, record: &'a YearRecord) -> Vec<(&'a str, Amount)> {
        record
            .categories()
            .iter()
            .zip(self.category_totals.iter())
            .filter(|(_, total)| total.is_positive())
            .map(|(c, total)| (c.as_str(), *total))
            .collect()
    }
}

/// Average income of each week index across the twelve months.
pub fn weekly_average_income(record: &YearRecord) -> [Amount; 5] {
    let mut sums = [Amount::ZERO; 5];
    for (key, amount) in record.weekly_incomes().iter() {
        if key.month() < 12 {
            if let Some(sum) = sums.get_mut(key.week() as usize) {
                *sum += amount;
            }
        }
    }
    sums.map(|s| s.share(12))
}

/// Daily detail for one week of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub month: u32,
    pub week: u32,
    /// Day of month and the total spent that day across all categories.
    pub days: Vec<(u32, Amount)>,
    /// Per-category totals for the week, in category order.
    pub category_totals: Vec<Amount>,
    pub total: Amount,
    pub income: Amount,
}

pub fn week_view(record: &YearRecord, month: u32, week: u32) -> Result<WeekView, LedgerError> {
    if month > 11 {
        return Err(LedgerError::InvalidMonth(month));
    }
    if week > LAST_WEEK {
        return Err(LedgerError::InvalidWeek(week));
    }

    let categories = record.categories();
    let mut category_totals = vec![Amount::ZERO; categories.len()];
    let mut days = Vec::new();
    for day in days_of_week(record.year(), month, week) {
        let mut day_total = Amount::ZERO;
        for (c, category) in categories.iter().enumerate() {
            let amount = record.daily_expense(month, day, category);
            category_totals[c] += amount;
            day_total += amount;
        }
        days.push((day, day_total));
    }

    Ok(WeekView {
        month,
        week,
        total: days.iter().map(|(_, a)| *a).sum(),
        days,
        category_totals,
        income: record.weekly_income(month, week),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyExpenses, DayKey};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn populated() -> YearRecord {
        let mut record =
            YearRecord::new(2024, ["Rent", "Food", "Fun"], ["Salary", "Freelance"]).unwrap();
        record
            .apply_expense(date("2024-01-01"), Amount::from(1000), "rent", "Rent")
            .unwrap();
        record
            .apply_expense(date("2024-01-15"), Amount::from(45), "groceries", "Food")
            .unwrap();
        record
            .apply_expense(date("2024-02-29"), Amount::from(30), "party", "Fun")
            .unwrap();
        record
            .apply_expense(date("2024-12-31"), Amount::from(12), "snacks", "Food")
            .unwrap();
        record
            .apply_income(date("2024-01-05"), Amount::from(3000), "Salary", "")
            .unwrap();
        record
            .apply_income(date("2024-02-29"), Amount::from(200), "Freelance", "F-9")
            .unwrap();
        record.set_weekly_income(6, 2, Amount::from(700)).unwrap();
        record
    }

    #[test]
    fn test_empty_record_is_all_zero() {
        let record = YearRecord::new(2025, Vec::<String>::new(), Vec::<String>::new()).unwrap();
        let totals = aggregate(&record);
        assert_eq!(totals.monthly.len(), 12);
        assert!(totals.category_totals.is_empty());
        assert!(totals.total_expenditure.is_zero());
        assert!(totals.total_income.is_zero());
        assert!(totals.gross_savings.is_zero());
        for m in &totals.monthly {
            assert!(m.category_totals.is_empty());
            assert!(m.total_expenditure.is_zero());
            assert!(m.income.is_zero());
        }
    }

    #[test]
    fn test_cross_consistency() {
        let record = populated();
        let t = aggregate(&record);

        let by_category: Amount = t.category_totals.iter().sum();
        let by_month: Amount = t.monthly.iter().map(|m| m.total_expenditure).sum();
        assert_eq!(t.total_expenditure, by_category);
        assert_eq!(t.total_expenditure, by_month);
        assert_eq!(t.total_expenditure, Amount::from(1087));

        for m in &t.monthly {
            assert_eq!(m.gross_savings, m.income - m.total_expenditure);
            let sum: Amount = m.category_totals.iter().sum();
            assert_eq!(m.total_expenditure, sum);
        }
        assert_eq!(t.total_income, Amount::from(3900));
        assert_eq!(t.gross_savings, t.total_income - t.total_expenditure);
    }

    #[test]
    fn test_leap_day_counts_in_february() {
        let t = aggregate(&populated());
        assert_eq!(
            t.monthly[1].category_totals,
            vec![Amount::ZERO, Amount::ZERO, Amount::from(30)]
        );
        assert_eq!(t.monthly[1].income, Amount::from(200));
        assert_eq!(t.monthly[1].gross_savings, Amount::from(170));
    }

    #[test]
    fn test_rent_in_march_scenario() {
        let mut record = YearRecord::new(2025, ["Rent", "Food"], ["Salary"]).unwrap();
        record
            .apply_expense(date("2025-03-05"), Amount::from(100), "rent", "Rent")
            .unwrap();
        let t = aggregate(&record);
        assert_eq!(
            t.monthly[2].category_totals,
            vec![Amount::from(100), Amount::ZERO]
        );
        assert_eq!(t.monthly[2].total_expenditure, Amount::from(100));
        assert_eq!(t.total_expenditure, Amount::from(100));
        assert_eq!(t.gross_savings, Amount::from(-100));
    }

    #[test]
    fn test_cells_outside_the_domain_are_ignored() {
        let json = serde_json::json!({
            "year": 2025,
            "categories": ["Food"],
            "incomeSources": ["Salary"],
            "dailyExpenses": {
                "1-29-Food": 50,
                "0-3-Gone": 70,
                "12-1-Food": 80,
                "0-3-Food": 5
            },
            "weeklyIncomes": {"0-5": 10, "13-0": 10, "0-0": 1}
        });
        let record: YearRecord = serde_json::from_value(json).unwrap();
        let daily: &DailyExpenses = record.daily_expenses();
        assert_eq!(daily.get(&DayKey::new(1, 29, "Food")), Amount::from(50));

        let t = aggregate(&record);
        assert_eq!(t.total_expenditure, Amount::from(5));
        assert_eq!(t.total_income, Amount::from(1));
    }

    #[test]
    fn test_huge_cells_do_not_overflow() {
        let json = serde_json::json!({
            "year": 2025,
            "categories": ["Food"],
            "incomeSources": ["Salary"],
            "dailyExpenses": {
                "0-1-Food": "50000000000000000000000000000",
                "0-2-Food": "50000000000000000000000000000"
            },
            "weeklyIncomes": {"0-0": "-50000000000000000000000000000"}
        });
        let record: YearRecord = serde_json::from_value(json).unwrap();
        let t = aggregate(&record);
        let max = Amount::new(rust_decimal::Decimal::MAX);
        let min = Amount::new(rust_decimal::Decimal::MIN);
        assert_eq!(t.monthly[0].total_expenditure, max);
        assert_eq!(t.total_expenditure, max);
        assert_eq!(t.gross_savings, min);
    }

    #[test]
    fn test_category_breakdown_skips_zero_categories() {
        let record = populated();
        let t = aggregate(&record);
        let breakdown = t.category_breakdown(&record);
        assert_eq!(
            breakdown,
            vec![
                ("Rent", Amount::from(1000)),
                ("Food", Amount::from(57)),
                ("Fun", Amount::from(30)),
            ]
        );

        let mut sparse = YearRecord::new(2025, ["Rent", "Food"], ["Salary"]).unwrap();
        sparse
            .apply_expense(date("2025-06-01"), Amount::from(9), "x", "Food")
            .unwrap();
        let t = aggregate(&sparse);
        assert_eq!(t.category_breakdown(&sparse), vec![("Food", Amount::from(9))]);
    }

    #[test]
    fn test_weekly_average_income() {
        let record = populated();
        let avg = weekly_average_income(&record);
        assert_eq!(avg[0], Amount::from(250));
        assert_eq!(avg[4], Amount::from(200).share(12));
        assert_eq!(avg[2], Amount::from(700).share(12));
        assert!(avg[1].is_zero());
    }

    #[test]
    fn test_week_view() {
        let record = populated();
        let view = week_view(&record, 1, 4).unwrap();
        assert_eq!(view.days, vec![(29, Amount::from(30))]);
        assert_eq!(
            view.category_totals,
            vec![Amount::ZERO, Amount::ZERO, Amount::from(30)]
        );
        assert_eq!(view.total, Amount::from(30));
        assert_eq!(view.income, Amount::from(200));

        let view = week_view(&record, 0, 2).unwrap();
        let days: Vec<u32> = view.days.iter().map(|(d, _)| *d).collect();
        assert_eq!(days, (15..=21).collect::<Vec<u32>>());
        assert_eq!(view.days[0].1, Amount::from(45));
        assert_eq!(view.total, Amount::from(45));

        assert!(week_view(&record, 12, 0).is_err());
        assert!(week_view(&record, 0, 5).is_err());
    }
}
