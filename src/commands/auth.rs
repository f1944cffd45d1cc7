//! Authentication command handlers.
//!
//! - `tracker login` - exchange a username and password for a token
//! - `tracker register` - create an account and receive a token
//!
//! Either way the token is saved to the token file and attached to every later request.

use crate::api::{self, Mode, TokenFile};
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

pub async fn login(config: &Config, mode: Mode, username: &str, password: &str) -> Result<Out<()>> {
    let remote = api::remote(config, mode).await?;
    let token = remote
        .login(username, password)
        .await
        .with_context(|| format!("Unable to log in as '{username}'"))?;
    save_token(config, username, token).await?;
    Ok(format!("Logged in as {username}").into())
}

pub async fn register(
    config: &Config,
    mode: Mode,
    username: &str,
    password: &str,
) -> Result<Out<()>> {
    let remote = api::remote(config, mode).await?;
    let token = remote
        .register(username, password)
        .await
        .with_context(|| format!("Unable to register '{username}'"))?;
    save_token(config, username, token).await?;
    Ok(format!("Registered and logged in as {username}").into())
}

async fn save_token(config: &Config, username: &str, token: String) -> Result<()> {
    let path = config.token_path();
    TokenFile::new(username, token)
        .save(&path)
        .await
        .context("Unable to save the token")?;
    debug!("Saved the token to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_login_saves_token() {
        let env = TestEnv::new().await;
        let config = env.config();
        let out = login(&config, Mode::Test, "alice", "hunter2").await.unwrap();
        assert_eq!(out.message(), "Logged in as alice");

        let token = TokenFile::load(config.token_path()).await.unwrap();
        assert_eq!(token.username(), "alice");
        assert!(!token.token().is_empty());
    }

    #[tokio::test]
    async fn test_register_saves_token() {
        let env = TestEnv::new().await;
        let config = env.config();
        register(&config, Mode::Test, "bob", "pw").await.unwrap();
        let token = TokenFile::load(config.token_path()).await.unwrap();
        assert_eq!(token.username(), "bob");
    }
}
