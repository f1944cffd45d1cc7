//! Files in the secrets directory.

use crate::{utils, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Represents a file that we want to `Serialize`, `Deserialize`, and read from memory in-between
/// serializations and deserialization. Basically we are just holding the `path` and the `data`
/// here.
#[derive(Default, Debug, Clone)]
pub(super) struct File<F>
where
    F: Serialize + DeserializeOwned + Clone + Debug,
{
    path: PathBuf,
    data: F,
}

impl<F> File<F>
where
    F: Serialize + DeserializeOwned + Clone + Debug,
{
    pub(super) async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data: F = utils::deserialize(&path).await?;
        Ok(Self { path, data })
    }

    pub(super) fn new(path: impl Into<PathBuf>, data: F) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Save the current data to the file, readable only by the owner.
    pub(super) async fn save(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize data to JSON")?;
        utils::write(&self.path, json).await?;

        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, Permissions::from_mode(0o600))
                .await
                .context("Failed to set file permissions")?;
        }

        Ok(())
    }

    pub(super) fn data(&self) -> &F {
        &self.data
    }
}

/// The bearer token issued by the backend at login or registration, saved as `token.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct TokenFile {
    username: String,
    token: String,
    issued_at: DateTime<Utc>,
}

impl TokenFile {
    pub(crate) fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            issued_at: Utc::now(),
        }
    }

    pub(crate) async fn load(p: impl AsRef<Path>) -> Result<Self> {
        let file = File::<TokenFile>::load(p.as_ref())
            .await
            .context("Unable to deserialize the token JSON file")?;
        let token_file = file.data().clone();
        anyhow::ensure!(
            !token_file.token.is_empty(),
            "The token file at {} has an empty token",
            p.as_ref().display()
        );
        Ok(token_file)
    }

    pub(crate) async fn save(&self, p: impl AsRef<Path>) -> Result<()> {
        File::new(p.as_ref(), self.clone()).save().await
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_token_file_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("token.json");
        let original = TokenFile::new("alice", "abc.def.ghi");
        original.save(&path).await.unwrap();

        let loaded = TokenFile::load(&path).await.unwrap();
        assert_eq!(original, loaded);
        assert_eq!(loaded.username(), "alice");
        assert_eq!(loaded.token(), "abc.def.ghi");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_token_file_empty_token() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("token.json");
        let json = r#"{"username":"bob","token":"","issued_at":"2025-01-01T00:00:00Z"}"#;
        utils::write(&path, json).await.unwrap();
        let err = TokenFile::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("empty token"));
    }
}
