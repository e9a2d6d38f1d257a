//! Configuration management for sporlcat.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the local data directory. The process environment always wins
//! because `dotenv` never overrides variables that are already set.
//!
//! Storage naming and throttling knobs have defaults; only the OAuth flow
//! needs values without one, and those are looked up lazily through
//! [`AuthSettings::from_env`] so that the store can run with nothing but a
//! cached token.

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_DATA_NAME: &str = "sporlcat-data";
pub const DEFAULT_CATEGORY_PREFIX: &str = "🎸 Category: ";
pub const DEFAULT_LEGACY_PREFIX: &str = "🎸";
/// Spotify rejects playlist descriptions longer than 300 characters.
pub const DEFAULT_SLOT_CAPACITY: usize = 300;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 100;
pub const DEFAULT_WRITE_DELAY_MS: u64 = 250;

/// Loads environment variables from `<data_local_dir>/sporlcat/.env`.
///
/// The parent directory is created when missing. A missing `.env` file is
/// fine; a present but unreadable one is reported.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/sporlcat/.env`
/// - macOS: `~/Library/Application Support/sporlcat/.env`
/// - Windows: `%LOCALAPPDATA%/sporlcat/.env`
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))
}

/// Root of everything sporlcat keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlcat");
    path
}

/// Naming and throttling settings for the playlist-backed store.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Name of data slot 0; slot `i > 0` is `"{data_name}_{i + 1}"`.
    pub data_name: String,
    pub category_prefix: String,
    pub legacy_prefix: String,
    /// Maximum number of characters per playlist description.
    pub slot_capacity: usize,
    /// Pause between pages of a paginated listing.
    pub page_delay: Duration,
    /// Pause between successive playlist writes or deletes.
    pub write_delay: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_name: DEFAULT_DATA_NAME.to_string(),
            category_prefix: DEFAULT_CATEGORY_PREFIX.to_string(),
            legacy_prefix: DEFAULT_LEGACY_PREFIX.to_string(),
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            write_delay: Duration::from_millis(DEFAULT_WRITE_DELAY_MS),
        }
    }
}

impl StoreSettings {
    /// Same naming as the defaults but without any courtesy delays.
    pub fn without_delays() -> Self {
        Self {
            page_delay: Duration::ZERO,
            write_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Everything the non-interactive commands need.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    /// Owner id to use instead of asking `GET /me`.
    pub user_id: Option<String>,
    pub store: StoreSettings,
}

impl Settings {
    /// Reads the settings from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a numeric variable cannot be parsed or
    /// the slot capacity is zero.
    pub fn from_env() -> Result<Self> {
        let defaults = StoreSettings::default();

        let slot_capacity = parse_var("SPORLCAT_SLOT_CAPACITY", defaults.slot_capacity)?;
        if slot_capacity == 0 {
            return Err(Error::Config(
                "SPORLCAT_SLOT_CAPACITY must be greater than zero".to_string(),
            ));
        }

        let store = StoreSettings {
            data_name: optional_var("SPORLCAT_DATA_NAME").unwrap_or(defaults.data_name),
            category_prefix: optional_var("SPORLCAT_CATEGORY_PREFIX")
                .unwrap_or(defaults.category_prefix),
            legacy_prefix: optional_var("SPORLCAT_LEGACY_PREFIX")
                .unwrap_or(defaults.legacy_prefix),
            slot_capacity,
            page_delay: Duration::from_millis(parse_var(
                "SPORLCAT_PAGE_DELAY_MS",
                DEFAULT_PAGE_DELAY_MS,
            )?),
            write_delay: Duration::from_millis(parse_var(
                "SPORLCAT_WRITE_DELAY_MS",
                DEFAULT_WRITE_DELAY_MS,
            )?),
        };

        Ok(Self {
            api_url: optional_var("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            user_id: optional_var("SPOTIFY_USER_ID"),
            store,
        })
    }
}

/// Settings for the OAuth 2.0 PKCE flow and the local callback server.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Address the callback server binds to, e.g. `127.0.0.1:8888`.
    pub server_addr: String,
    pub client_id: String,
    pub redirect_uri: String,
    /// Space separated scopes, e.g. `playlist-modify-private user-follow-read`.
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
}

impl AuthSettings {
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_addr: required_var("SERVER_ADDRESS")?,
            client_id: required_var("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: required_var("SPOTIFY_API_REDIRECT_URI")?,
            scope: required_var("SPOTIFY_API_AUTH_SCOPE")?,
            auth_url: required_var("SPOTIFY_API_AUTH_URL")?,
            token_url: required_var("SPOTIFY_API_TOKEN_URL")?,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required_var(key: &str) -> Result<String> {
    optional_var(key).ok_or_else(|| Error::Config(format!("{key} must be set")))
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
