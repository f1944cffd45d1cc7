//! Types that represent the core data model: the year record, its ledgers and its logs.
mod amount;
pub mod calendar;
mod keys;
mod ledger;
mod log;
mod record;

pub use amount::{Amount, AmountError};
pub use keys::{DayKey, WeekKey};
pub use ledger::{DailyExpenses, Ledger, WeeklyIncomes};
pub use log::{ExpenseEntry, IncomeEntry, Log};
pub use record::{parse_names, YearRecord};
