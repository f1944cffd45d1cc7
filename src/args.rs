//! These structs provide the CLI interface for the tracker CLI.

use crate::model::Amount;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// The categories a new tracker starts with unless others are given.
pub const DEFAULT_CATEGORIES: &str =
    "Rent, Subscriptions, Entertainment, Food & Drink, Groceries, Shopping, Transport, Travel";

/// The income sources a new tracker starts with unless others are given.
pub const DEFAULT_INCOME_SOURCES: &str = "Salary, Freelance, Business, Other";

/// tracker: A command-line tool for recording income and expenses.
///
/// Each calendar year has its own tracker holding daily expenses by category, weekly income,
/// monthly budgets and a log of every transaction you entered. Trackers are stored by a tracker
/// backend, so you need to run `tracker init` and `tracker login` before anything else.
///
/// Months and weeks are numbered from 1 on the command line.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the tracker home directory and its configuration file.
    ///
    /// This is the first command you should run. By default the home directory is $HOME/tracker,
    /// pass --tracker-home or set TRACKER_HOME to put it somewhere else.
    Init(InitArgs),
    /// Log in to the tracker backend and save the token.
    Login(CredentialArgs),
    /// Create an account on the tracker backend and save the token.
    Register(CredentialArgs),
    /// Start a tracker for a new year.
    Create(CreateArgs),
    /// Show the monthly overview and yearly totals of a tracker.
    Show(YearArgs),
    /// Show the daily breakdown of one week.
    Week(WeekArgs),
    /// Show weekly income for every month along with the weekly averages.
    Income(YearArgs),
    /// Record an expense.
    AddExpense(AddExpenseArgs),
    /// Record an income payment.
    AddIncome(AddIncomeArgs),
    /// Set the planned monthly budget of a category.
    Budget(BudgetArgs),
    /// Overwrite the expense amount of a category on one day.
    SetExpense(SetExpenseArgs),
    /// Overwrite the income amount of one week.
    SetIncome(SetIncomeArgs),
    /// List recorded transactions, most recent first.
    Log(LogArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where tracker configuration is held. Defaults to ~/tracker
    #[arg(long, env = "TRACKER_HOME", default_value_t = default_tracker_home())]
    tracker_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, tracker_home: PathBuf) -> Self {
        Self {
            log_level,
            tracker_home: tracker_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn tracker_home(&self) -> &DisplayPath {
        &self.tracker_home
    }
}

/// (Not shown): Args for the `tracker init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the tracker backend, e.g. http://localhost:5000
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// (Not shown): Args for the `tracker login` and `tracker register` commands.
#[derive(Debug, Parser, Clone)]
pub struct CredentialArgs {
    #[arg(long)]
    username: String,

    /// Taken from TRACKER_PASSWORD when not given.
    #[arg(long, env = "TRACKER_PASSWORD", hide_env_values = true)]
    password: String,
}

impl CredentialArgs {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// (Not shown): Args for the `tracker create` command.
#[derive(Debug, Parser, Clone)]
pub struct CreateArgs {
    year: i32,

    /// Comma separated expense categories.
    #[arg(long, default_value = DEFAULT_CATEGORIES)]
    categories: String,

    /// Comma separated income sources.
    #[arg(long, default_value = DEFAULT_INCOME_SOURCES)]
    income_sources: String,
}

impl CreateArgs {
    pub fn new(year: i32, categories: impl Into<String>, income_sources: impl Into<String>) -> Self {
        Self {
            year,
            categories: categories.into(),
            income_sources: income_sources.into(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn categories(&self) -> &str {
        &self.categories
    }

    pub fn income_sources(&self) -> &str {
        &self.income_sources
    }
}

/// (Not shown): Args for commands that only need a year.
#[derive(Debug, Parser, Clone)]
pub struct YearArgs {
    year: i32,
}

impl YearArgs {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// (Not shown): Args for the `tracker week` command.
#[derive(Debug, Parser, Clone)]
pub struct WeekArgs {
    year: i32,

    /// Month, 1 through 12.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Week of the month, 1 through 5.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=5))]
    week: u32,
}

impl WeekArgs {
    pub fn new(year: i32, month: u32, week: u32) -> Self {
        Self { year, month, week }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index.
    pub fn month(&self) -> u32 {
        self.month.saturating_sub(1)
    }

    /// Zero-based week index.
    pub fn week(&self) -> u32 {
        self.week.saturating_sub(1)
    }
}

/// (Not shown): Args for the `tracker add-expense` command.
#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    year: i32,

    #[arg(long)]
    amount: Amount,

    #[arg(long)]
    category: String,

    /// The day of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// What the money was spent on.
    #[arg(long, default_value = "")]
    item: String,
}

impl AddExpenseArgs {
    pub fn new(
        year: i32,
        amount: Amount,
        category: impl Into<String>,
        date: Option<NaiveDate>,
        item: impl Into<String>,
    ) -> Self {
        Self {
            year,
            amount,
            category: category.into(),
            date,
            item: item.into(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(today)
    }

    pub fn item(&self) -> &str {
        &self.item
    }
}

/// (Not shown): Args for the `tracker add-income` command.
#[derive(Debug, Parser, Clone)]
pub struct AddIncomeArgs {
    year: i32,

    #[arg(long)]
    amount: Amount,

    #[arg(long)]
    source: String,

    /// The day the payment arrived as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// An invoice number or other reference.
    #[arg(long, default_value = "")]
    invoice: String,
}

impl AddIncomeArgs {
    pub fn new(
        year: i32,
        amount: Amount,
        source: impl Into<String>,
        date: Option<NaiveDate>,
        invoice: impl Into<String>,
    ) -> Self {
        Self {
            year,
            amount,
            source: source.into(),
            date,
            invoice: invoice.into(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(today)
    }

    pub fn invoice(&self) -> &str {
        &self.invoice
    }
}

/// (Not shown): Args for the `tracker budget` command.
#[derive(Debug, Parser, Clone)]
pub struct BudgetArgs {
    year: i32,

    #[arg(long)]
    category: String,

    #[arg(long)]
    amount: Amount,
}

impl BudgetArgs {
    pub fn new(year: i32, category: impl Into<String>, amount: Amount) -> Self {
        Self {
            year,
            category: category.into(),
            amount,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// (Not shown): Args for the `tracker set-expense` command.
#[derive(Debug, Parser, Clone)]
pub struct SetExpenseArgs {
    year: i32,

    /// Month, 1 through 12.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Day of the month.
    #[arg(long)]
    day: u32,

    #[arg(long)]
    category: String,

    /// The new amount. Zero clears the cell.
    #[arg(long)]
    amount: Amount,
}

impl SetExpenseArgs {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        category: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            year,
            month,
            day,
            category: category.into(),
            amount,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index.
    pub fn month(&self) -> u32 {
        self.month.saturating_sub(1)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// (Not shown): Args for the `tracker set-income` command.
#[derive(Debug, Parser, Clone)]
pub struct SetIncomeArgs {
    year: i32,

    /// Month, 1 through 12.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Week of the month, 1 through 5.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=5))]
    week: u32,

    /// The new amount. Zero clears the cell.
    #[arg(long)]
    amount: Amount,
}

impl SetIncomeArgs {
    pub fn new(year: i32, month: u32, week: u32, amount: Amount) -> Self {
        Self {
            year,
            month,
            week,
            amount,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index.
    pub fn month(&self) -> u32 {
        self.month.saturating_sub(1)
    }

    /// Zero-based week index.
    pub fn week(&self) -> u32 {
        self.week.saturating_sub(1)
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Which transaction log to list.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    #[default]
    Expenses,
    Income,
}

serde_plain::derive_display_from_serialize!(LogKind);
serde_plain::derive_fromstr_from_deserialize!(LogKind);

/// (Not shown): Args for the `tracker log` command.
#[derive(Debug, Parser, Clone)]
pub struct LogArgs {
    year: i32,

    /// "expenses" or "income"
    #[arg(default_value_t = LogKind::Expenses)]
    kind: LogKind,

    /// Show at most this many entries.
    #[arg(long)]
    limit: Option<usize>,
}

impl LogArgs {
    pub fn new(year: i32, kind: LogKind, limit: Option<usize>) -> Self {
        Self { year, kind, limit }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn kind(&self) -> LogKind {
        self.kind
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn default_tracker_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("tracker"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --tracker-home or TRACKER_HOME instead of relying on the \
                default tracker home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("tracker")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
