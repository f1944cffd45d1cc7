//! The boundary with the tracker backend.
//!
//! `Remote` is the seam: `HttpRemote` talks to the real REST backend while `TestRemote` keeps
//! trackers in memory (optionally mirrored to a JSON file) so that the whole program can be run
//! without a backend.

mod files;
mod http;
mod test_remote;

use crate::model::YearRecord;
use crate::{Config, Result};
use std::sync::Arc;
use tracing::debug;

pub(crate) use files::TokenFile;
pub(crate) use test_remote::TestRemote;

/// Setting this environment variable to a non-empty value selects `Mode::Test`.
pub const TEST_MODE_ENV: &str = "TRACKER_IN_TEST_MODE";

/// Name of the file in the tracker home where `TestRemote` keeps its trackers.
pub(crate) const TEST_REMOTE_JSON: &str = "test_remote.json";

/// Whether to talk to the real backend or to the built-in test remote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// The operations the tracker backend offers. Implementations report failures as
/// `crate::error::RemoteError` so callers can tell the kinds apart.
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    /// Fetches the tracker for `year`. A tracker that does not exist is `RemoteError::NotFound`.
    async fn fetch(&self, year: i32) -> Result<YearRecord>;

    /// Stores a new tracker. A tracker that already exists for the year is
    /// `RemoteError::Conflict`.
    async fn create(&self, record: &YearRecord) -> Result<YearRecord>;

    /// Replaces the stored tracker for `record.year()` with `record`.
    async fn update(&self, record: &YearRecord) -> Result<YearRecord>;

    /// Exchanges credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String>;

    /// Creates an account and returns a bearer token for it.
    async fn register(&self, username: &str, password: &str) -> Result<String>;
}

/// Builds the `Remote` for `mode`. In `Mode::Http` the saved token, if any, is attached to every
/// request.
pub async fn remote(config: &Config, mode: Mode) -> Result<Arc<dyn Remote>> {
    match mode {
        Mode::Http => {
            let token_path = config.token_path();
            let token = if token_path.is_file() {
                Some(TokenFile::load(&token_path).await?.token().to_string())
            } else {
                debug!(
                    "No token found at {}, requests will not be authenticated",
                    token_path.display()
                );
                None
            };
            Ok(Arc::new(http::HttpRemote::new(config.api_url(), token)?))
        }
        Mode::Test => {
            let path = config.root().join(TEST_REMOTE_JSON);
            Ok(Arc::new(TestRemote::load(path).await?))
        }
    }
}
