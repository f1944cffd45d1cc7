//! Command handlers for the tracker CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod auth;
mod edit;
mod init;
mod report;

use crate::api::{self, Mode};
use crate::session::Session;
use crate::{Config, Result};
use anyhow::bail;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use auth::{login, register};
pub use edit::{add_expense, add_income, budget, create, set_expense, set_income};
pub use init::init;
pub use report::{income, log, show, week};

/// The output type for a command. This allows the command to return a consistent message,
/// optionally a rendered report, and optionally structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// A human readable report, printed to stdout.
    report: Option<String>,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            report: None,
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            report: None,
            structure: None,
        }
    }

    /// Attach a rendered report.
    pub fn with_report(mut self, report: String) -> Self {
        self.report = Some(report);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the report to stdout, the message to `info!` and the structured data (if it exists)
    /// as JSON to `debug!`.
    pub fn print(&self) {
        if let Some(report) = self.report() {
            println!("{report}");
        }
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the tracker for `year`, telling the user how to create it if it does not exist.
async fn open(config: &Config, mode: Mode, year: i32) -> Result<Session> {
    let remote = api::remote(config, mode).await?;
    match Session::load(remote, year, config.debounce()).await? {
        Some(session) => Ok(session),
        None => bail!("There is no tracker for {year}. Run 'tracker create {year}' to start one."),
    }
}
