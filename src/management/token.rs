use std::path::PathBuf;

use chrono::Utc;
use tracing::debug;

use crate::{
    config::{self, AuthSettings},
    error::{Error, Result},
    spotify::auth,
    types::Token,
};

/// Refresh this many seconds before Spotify would reject the token.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Keeps the OAuth token on disk and hands out a usable access token.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// # Errors
    ///
    /// Fails with [`Error::Auth`] when no token was saved yet.
    pub async fn load() -> Result<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            Error::Auth(format!(
                "no token at {} ({}); run `sporlcat auth` first",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    pub async fn valid_token(&mut self) -> Result<String> {
        if self.is_expired() {
            let settings = AuthSettings::from_env()?;
            let token = auth::refresh_token(&settings, &self.token.refresh_token)
                .await
                .map_err(|e| Error::Auth(format!("{e}; run `sporlcat auth` again")))?;
            self.token = token;
            self.persist().await?;
            debug!("token refreshed and saved");
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
