//! The open year record and its mutation API.

use crate::aggregate::{aggregate, DerivedTotals};
use crate::api::Remote;
use crate::error::{remote_error_kind, ErrorKind, LedgerError};
use crate::model::{Amount, ExpenseEntry, IncomeEntry, YearRecord};
use crate::sync::{SyncState, Syncer};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Owns the year record that is currently being edited. Every successful mutation hands a
/// snapshot to the `Syncer`, which writes it to the backend once edits stop for the debounce
/// interval. Loading or creating a record never schedules a write.
pub struct Session {
    record: YearRecord,
    syncer: Syncer,
}

impl Session {
    /// Wraps a record that was just loaded or created.
    pub fn open(record: YearRecord, remote: Arc<dyn Remote>, debounce: Duration) -> Self {
        Self {
            record,
            syncer: Syncer::spawn(remote, debounce),
        }
    }

    /// Loads the tracker for `year`. Returns `None` if the backend has none, any other failure is
    /// an error.
    #[instrument(skip(remote))]
    pub async fn load(
        remote: Arc<dyn Remote>,
        year: i32,
        debounce: Duration,
    ) -> Result<Option<Self>> {
        match remote.fetch(year).await {
            Ok(record) => Ok(Some(Self::open(record, remote, debounce))),
            Err(e) if remote_error_kind(&e) == Some(ErrorKind::NotFound) => {
                debug!("There is no tracker for {year}");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Unable to load the tracker for {year}")),
        }
    }

    /// Stores a brand new tracker and opens it. Fails with `RemoteError::Conflict` in the chain if
    /// the year already exists.
    #[instrument(skip_all, fields(year = record.year()))]
    pub async fn create(
        remote: Arc<dyn Remote>,
        record: YearRecord,
        debounce: Duration,
    ) -> Result<Self> {
        let stored = remote
            .create(&record)
            .await
            .with_context(|| format!("Unable to create the tracker for {}", record.year()))?;
        Ok(Self::open(stored, remote, debounce))
    }

    pub fn record(&self) -> &YearRecord {
        &self.record
    }

    /// Recomputes the derived totals from the current state.
    pub fn totals(&self) -> DerivedTotals {
        aggregate(&self.record)
    }

    pub fn sync_state(&self) -> SyncState {
        self.syncer.state()
    }

    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        amount: Amount,
        item: &str,
        category: &str,
    ) -> LedgerResult<ExpenseEntry> {
        let entry = self
            .record
            .apply_expense(date, amount, item, category)?
            .clone();
        self.changed();
        Ok(entry)
    }

    pub fn add_income(
        &mut self,
        date: NaiveDate,
        amount: Amount,
        source: &str,
        invoice: &str,
    ) -> LedgerResult<IncomeEntry> {
        let entry = self
            .record
            .apply_income(date, amount, source, invoice)?
            .clone();
        self.changed();
        Ok(entry)
    }

    pub fn set_budget(&mut self, category: &str, amount: Amount) -> LedgerResult<()> {
        self.record.set_budget(category, amount)?;
        self.changed();
        Ok(())
    }

    pub fn set_daily_expense(
        &mut self,
        month: u32,
        day: u32,
        category: &str,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.record
            .set_daily_expense(month, day, category, amount)?;
        self.changed();
        Ok(())
    }

    pub fn set_weekly_income(&mut self, month: u32, week: u32, amount: Amount) -> LedgerResult<()> {
        self.record.set_weekly_income(month, week, amount)?;
        self.changed();
        Ok(())
    }

    /// Leaves the record. A write that is still waiting for its deadline is discarded.
    pub fn close(self) {
        self.syncer.cancel();
    }

    /// Writes any pending change immediately, then closes. A failed write is returned.
    pub async fn finish(self) -> Result<()> {
        self.syncer.finish().await
    }

    fn changed(&self) {
        self.syncer.schedule(self.record.clone());
    }
}
