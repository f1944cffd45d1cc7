use crate::error::LedgerError;
use crate::model::calendar::{days_in_month, month_and_day, week_of_month, LAST_WEEK};
use crate::model::{
    Amount, DailyExpenses, DayKey, ExpenseEntry, IncomeEntry, Log, WeekKey, WeeklyIncomes,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Everything tracked for one user in one calendar year. This is also the document exchanged with
/// the tracker backend, which is why the field names are camelCase.
///
/// All mutations validate first and only then write, so a failed mutation leaves the record as it
/// was. Recording a transaction writes both the log and the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    year: i32,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    income_sources: Vec<String>,
    #[serde(default)]
    daily_expenses: DailyExpenses,
    #[serde(default)]
    weekly_incomes: WeeklyIncomes,
    #[serde(default)]
    budgets: BTreeMap<String, Amount>,
    #[serde(default)]
    expense_log: Log<ExpenseEntry>,
    #[serde(default)]
    income_log: Log<IncomeEntry>,
}

impl YearRecord {
    /// Creates an empty record. Names are trimmed and must be non-empty and distinct.
    pub fn new<C, S>(year: i32, categories: C, income_sources: S) -> LedgerResult<Self>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Ok(Self {
            year,
            categories: distinct_names(categories)?,
            income_sources: distinct_names(income_sources)?,
            daily_expenses: DailyExpenses::default(),
            weekly_incomes: WeeklyIncomes::default(),
            budgets: BTreeMap::new(),
            expense_log: Log::default(),
            income_log: Log::default(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn income_sources(&self) -> &[String] {
        &self.income_sources
    }

    pub fn daily_expenses(&self) -> &DailyExpenses {
        &self.daily_expenses
    }

    pub fn weekly_incomes(&self) -> &WeeklyIncomes {
        &self.weekly_incomes
    }

    pub fn expense_log(&self) -> &Log<ExpenseEntry> {
        &self.expense_log
    }

    pub fn income_log(&self) -> &Log<IncomeEntry> {
        &self.income_log
    }

    pub fn daily_expense(&self, month: u32, day: u32, category: &str) -> Amount {
        self.daily_expenses.get(&DayKey::new(month, day, category))
    }

    pub fn weekly_income(&self, month: u32, week: u32) -> Amount {
        self.weekly_incomes.get(&WeekKey::new(month, week))
    }

    /// The planned monthly amount for `category`, zero when none was set.
    pub fn budget(&self, category: &str) -> Amount {
        self.budgets.get(category).copied().unwrap_or_default()
    }

    /// Budgets in category order.
    pub fn budgets(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.categories
            .iter()
            .map(|c| (c.as_str(), self.budget(c)))
    }

    pub fn total_budget(&self) -> Amount {
        self.budgets.values().sum()
    }

    /// Records an expense: appends it to the expense log and adds its amount to the matching
    /// daily cell.
    pub fn apply_expense(
        &mut self,
        date: NaiveDate,
        amount: Amount,
        item: impl Into<String>,
        category: &str,
    ) -> LedgerResult<&ExpenseEntry> {
        self.check_amount(amount)?;
        self.check_category(category)?;
        self.check_date(date)?;

        let (month, day) = month_and_day(date);
        self.daily_expenses
            .add(DayKey::new(month, day, category), amount);
        Ok(self
            .expense_log
            .append(ExpenseEntry::new(date, amount, item, category)))
    }

    /// Records an income payment: appends it to the income log and adds its amount to the week of
    /// the month the date falls in.
    pub fn apply_income(
        &mut self,
        date: NaiveDate,
        amount: Amount,
        source: &str,
        invoice: impl Into<String>,
    ) -> LedgerResult<&IncomeEntry> {
        self.check_amount(amount)?;
        if !self.income_sources.iter().any(|s| s == source) {
            return Err(LedgerError::UnknownIncomeSource(source.to_string()));
        }
        self.check_date(date)?;

        let (month, day) = month_and_day(date);
        self.weekly_incomes
            .add(WeekKey::new(month, week_of_month(day)), amount);
        Ok(self
            .income_log
            .append(IncomeEntry::new(date, amount, source, invoice)))
    }

    pub fn set_budget(&mut self, category: &str, amount: Amount) -> LedgerResult<()> {
        self.check_amount(amount)?;
        self.check_category(category)?;
        self.budgets.insert(category.to_string(), amount);
        Ok(())
    }

    /// Overwrites a daily expense cell. The expense log is not touched.
    pub fn set_daily_expense(
        &mut self,
        month: u32,
        day: u32,
        category: &str,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.check_amount(amount)?;
        self.check_category(category)?;
        self.check_month(month)?;
        if day == 0 || day > days_in_month(self.year, month) {
            return Err(LedgerError::InvalidDay {
                year: self.year,
                month,
                day,
            });
        }
        self.daily_expenses
            .set(DayKey::new(month, day, category), amount);
        Ok(())
    }

    /// Overwrites a weekly income cell. The income log is not touched.
    pub fn set_weekly_income(&mut self, month: u32, week: u32, amount: Amount) -> LedgerResult<()> {
        self.check_amount(amount)?;
        self.check_month(month)?;
        if week > LAST_WEEK {
            return Err(LedgerError::InvalidWeek(week));
        }
        self.weekly_incomes.set(WeekKey::new(month, week), amount);
        Ok(())
    }

    fn check_amount(&self, amount: Amount) -> LedgerResult<()> {
        if amount.is_negative() {
            return Err(LedgerError::NegativeAmount(amount.to_string()));
        }
        Ok(())
    }

    fn check_category(&self, category: &str) -> LedgerResult<()> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(LedgerError::UnknownCategory(category.to_string()));
        }
        Ok(())
    }

    fn check_month(&self, month: u32) -> LedgerResult<()> {
        if month > 11 {
            return Err(LedgerError::InvalidMonth(month));
        }
        Ok(())
    }

    fn check_date(&self, date: NaiveDate) -> LedgerResult<()> {
        if date.year() != self.year {
            return Err(LedgerError::DateOutsideYear {
                date: date.to_string(),
                year: self.year,
            });
        }
        Ok(())
    }
}

/// Splits a comma separated list of names, trimming each one and dropping empty items.
///
/// ```
/// # use finance_tracker::model::parse_names;
/// assert_eq!(parse_names(" Rent, ,Food "), vec!["Rent", "Food"]);
/// ```
pub fn parse_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn distinct_names<I>(names: I) -> LedgerResult<Vec<String>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let name: String = name.into();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if !seen.insert(name.clone()) {
            return Err(LedgerError::DuplicateName(name));
        }
        out.push(name);
    }
    Ok(out)
}
