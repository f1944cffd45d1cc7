use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the tracker home directory, its secrets subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `tracker_home` - The directory that will be the root of the tracker home, e.g. `$HOME/tracker`
/// - `api_url` - The base URL of the tracker backend, e.g. `http://localhost:5000`
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(tracker_home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(tracker_home, api_url)
        .await
        .context("Unable to create the tracker home directory and config")?;
    Ok(format!(
        "Created the tracker home at {}. Run 'tracker login' or 'tracker register' next.",
        config.root().display()
    )
    .into())
}
