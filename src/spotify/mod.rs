//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API lives here. Higher layers
//! (the category store and the CLI) only ever see [`SpotifyClient`]; they never
//! build URLs or look at status codes themselves.
//!
//! ## Architecture
//!
//! ```text
//! Store / CLI
//!      ↓
//! SpotifyClient (playlists, artists, profile)
//!      ↓
//! Paginated collector (cursor following, courtesy delay)
//!      ↓
//! RateLimited transport (429 + Retry-After, 3 attempts)
//!      ↓
//! HttpTransport (reqwest, bearer token)
//! ```
//!
//! ## Modules
//!
//! - [`transport`] - request/response types, reqwest transport, 429 retries
//! - [`pagination`] - `next`-link following for root and nested envelopes
//! - [`playlists`] - listing, classifying, creating, updating and unfollowing playlists
//! - [`artists`] - followed artists and the current user's profile
//! - [`auth`] - OAuth 2.0 PKCE flow and token refresh
//!
//! ## API Coverage
//!
//! - `GET /me`, `GET /me/following?type=artist`, `GET /me/playlists`
//! - `GET /playlists/{id}`, `GET /playlists/{id}/tracks`
//! - `POST /users/{user_id}/playlists`, `PUT /playlists/{id}`
//! - `DELETE /playlists/{id}/followers`
//!
//! Calls are issued one at a time. Nothing in this module spawns concurrent
//! requests against the same account.

pub mod artists;
pub mod auth;
pub mod pagination;
pub mod playlists;
pub mod transport;

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{
    config::{Settings, StoreSettings},
    error::Result,
};

use transport::{ApiRequest, ApiResponse, HttpTransport, RateLimited, Transport};

/// Handle on the Spotify API for one authenticated user.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct SpotifyClient {
    transport: Arc<dyn Transport>,
    settings: Arc<StoreSettings>,
}

impl SpotifyClient {
    /// Wraps an already assembled transport. Callers that want 429 handling
    /// must pass a [`RateLimited`] transport.
    pub fn new(transport: Arc<dyn Transport>, settings: StoreSettings) -> Self {
        Self {
            transport,
            settings: Arc::new(settings),
        }
    }

    /// Builds the production stack: reqwest transport behind the rate limiter.
    pub fn connect(settings: &Settings, access_token: &str) -> Result<Self> {
        let http = HttpTransport::new(&settings.api_url, access_token)?;
        Ok(Self::new(
            Arc::new(RateLimited::new(http)),
            settings.store.clone(),
        ))
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Sends a request and fails on any non-success status.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.send(&request).await?.error_for_status(&request)
    }

    /// Sends a request and hands back whatever status came back.
    pub(crate) async fn send_raw(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request).await
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn page_delay(&self) -> Duration {
        self.settings.page_delay
    }

    /// Courtesy pause between successive writes.
    pub(crate) async fn pause_between_writes(&self) {
        if !self.settings.write_delay.is_zero() {
            sleep(self.settings.write_delay).await;
        }
    }
}
