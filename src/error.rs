//! Error types shared by the transport, the playlist registry and the store.
//!
//! Throttling that outlasts the retry ceiling and non-success statuses are
//! kept apart so callers can tell "Spotify asked us to slow down" from
//! "Spotify refused the request". A corrupted category document is not an
//! error at all; see [`crate::store::LoadOutcome`].

use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Spotify kept answering 429 until the retry ceiling was reached.
    #[error("{method} {url} still throttled after {attempts} attempts")]
    TransportExhausted {
        method: String,
        url: String,
        attempts: u32,
    },

    /// Any non-success, non-throttling status.
    #[error("Spotify API returned {status} for {method} {url}: {body}")]
    Remote {
        status: u16,
        method: String,
        url: String,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token exchange or refresh failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A response had the right status but not the expected shape.
    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },
}

impl Error {
    /// HTTP status carried by a [`Error::Remote`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
