//! Implements the `Remote` trait with trackers held in memory for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a tracker backend.

use crate::api::Remote;
use crate::error::RemoteError;
use crate::model::YearRecord;
use crate::{utils, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

const TEST_TOKEN: &str = "test-token";

/// The observable state of a `TestRemote`.
#[derive(Debug, Default, Clone)]
pub(crate) struct TestRemoteState {
    /// Stored trackers by year.
    pub(crate) years: BTreeMap<i32, YearRecord>,
    /// Every successful update, in the order received.
    pub(crate) updates: Vec<YearRecord>,
    /// Number of update calls, including failed ones.
    pub(crate) update_attempts: usize,
    /// The next this-many updates fail with a network error.
    pub(crate) fail_updates: usize,
}

/// An implementation of `Remote` that does not need a backend. When created with `load` it mirrors
/// its trackers to a JSON file after every change.
#[derive(Debug, Default)]
pub(crate) struct TestRemote {
    path: Option<PathBuf>,
    state: Mutex<TestRemoteState>,
}

impl TestRemote {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a `TestRemote` backed by `path`, reading trackers from it if it exists.
    pub(crate) async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let years = if path.is_file() {
            utils::deserialize(&path).await?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path),
            state: Mutex::new(TestRemoteState {
                years,
                ..TestRemoteState::default()
            }),
        })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> TestRemoteState {
        self.lock().clone()
    }

    #[cfg(test)]
    pub(crate) fn insert(&self, record: YearRecord) {
        self.lock().years.insert(record.year(), record);
    }

    #[cfg(test)]
    pub(crate) fn fail_next_updates(&self, n: usize) {
        self.lock().fail_updates = n;
    }

    fn lock(&self) -> MutexGuard<'_, TestRemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let years = self.lock().years.clone();
        let json = serde_json::to_string_pretty(&years)?;
        utils::write(path, json).await
    }
}

#[async_trait::async_trait]
impl Remote for TestRemote {
    async fn fetch(&self, year: i32) -> Result<YearRecord> {
        self.lock()
            .years
            .get(&year)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("No tracker for {year}")).into())
    }

    async fn create(&self, record: &YearRecord) -> Result<YearRecord> {
        {
            let mut state = self.lock();
            if state.years.contains_key(&record.year()) {
                return Err(RemoteError::Conflict(format!(
                    "Tracker for {} already exists",
                    record.year()
                ))
                .into());
            }
            state.years.insert(record.year(), record.clone());
        }
        self.persist().await?;
        Ok(record.clone())
    }

    async fn update(&self, record: &YearRecord) -> Result<YearRecord> {
        {
            let mut state = self.lock();
            state.update_attempts += 1;
            if state.fail_updates > 0 {
                state.fail_updates -= 1;
                debug!("Failing update for {} on request", record.year());
                return Err(RemoteError::Network(String::from("simulated failure")).into());
            }
            if !state.years.contains_key(&record.year()) {
                return Err(
                    RemoteError::NotFound(format!("No tracker for {}", record.year())).into(),
                );
            }
            state.years.insert(record.year(), record.clone());
            state.updates.push(record.clone());
        }
        self.persist().await?;
        Ok(record.clone())
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<String> {
        Ok(TEST_TOKEN.to_string())
    }

    async fn register(&self, _username: &str, _password: &str) -> Result<String> {
        Ok(TEST_TOKEN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{remote_error_kind, ErrorKind};
    use tempfile::TempDir;

    fn record(year: i32) -> YearRecord {
        YearRecord::new(year, ["Rent"], ["Salary"]).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let remote = TestRemote::new();
        let err = remote.fetch(2025).await.unwrap_err();
        assert_eq!(remote_error_kind(&err), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        let remote = TestRemote::new();
        remote.create(&record(2025)).await.unwrap();
        let err = remote.create(&record(2025)).await.unwrap_err();
        assert_eq!(remote_error_kind(&err), Some(ErrorKind::Conflict));
        assert_eq!(remote.fetch(2025).await.unwrap(), record(2025));
    }

    #[tokio::test]
    async fn test_update_replaces() {
        let remote = TestRemote::new();
        remote.insert(record(2025));
        let replacement = YearRecord::new(2025, ["Food"], ["Salary"]).unwrap();
        remote.update(&replacement).await.unwrap();
        assert_eq!(remote.fetch(2025).await.unwrap(), replacement);
        assert_eq!(remote.state().updates.len(), 1);

        let err = remote.update(&record(2030)).await.unwrap_err();
        assert_eq!(remote_error_kind(&err), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let remote = TestRemote::new();
        remote.insert(record(2025));
        remote.fail_next_updates(1);
        let err = remote.update(&record(2025)).await.unwrap_err();
        assert_eq!(remote_error_kind(&err), Some(ErrorKind::NetworkFailure));
        remote.update(&record(2025)).await.unwrap();
        let state = remote.state();
        assert_eq!(state.update_attempts, 2);
        assert_eq!(state.updates.len(), 1);
    }

    #[tokio::test]
    async fn test_file_backed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("remote.json");
        let remote = TestRemote::load(&path).await.unwrap();
        remote.create(&record(2024)).await.unwrap();
        drop(remote);

        let reloaded = TestRemote::load(&path).await.unwrap();
        assert_eq!(reloaded.fetch(2024).await.unwrap(), record(2024));
    }
}
