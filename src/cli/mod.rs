//! # CLI Module
//!
//! The command-line front end of sporlcat. Every command opens a [`Session`]
//! (token, client, owner id), reads the category mapping from the store,
//! changes it and writes it back. Output goes through the crate's console
//! macros; fatal problems end the process through `error!`.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth 2.0 PKCE login, token saved locally
//! - [`list_categories`], [`create_category`], [`delete_category`] - category management
//! - [`assign`], [`unassign`] - filing followed artists
//! - [`list_artists`] - followed artists with their category
//! - [`migrate`] - one-time conversion of legacy category playlists
//! - [`reset`] - removal of every playlist sporlcat created
//!
//! ## Session start
//!
//! Opening a session checks once for legacy category playlists and points
//! the user at `sporlcat migrate` when some are found.

mod artists;
mod auth;
mod categories;
mod maintenance;

pub use artists::list_artists;
pub use auth::auth;
pub use categories::{assign, create_category, delete_category, list_categories, unassign};
pub use maintenance::{migrate, reset};

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Settings,
    error,
    management::TokenManager,
    spotify::SpotifyClient,
    store::{CategoryStore, ChunkedStore, LegacyMigrator, LoadOutcome},
    types::CategoryMap,
    warning,
};

/// An authenticated connection bound to one Spotify user.
pub struct Session {
    pub client: SpotifyClient,
    pub store: ChunkedStore,
    pub owner_id: String,
}

impl Session {
    /// Opens a session and, when `check_migration` is set, warns about
    /// pending legacy playlists.
    pub async fn open(check_migration: bool) -> Session {
        let settings = match Settings::from_env() {
            Ok(s) => s,
            Err(e) => error!("Invalid configuration. Err: {}", e),
        };

        let mut token_mgr = match TokenManager::load().await {
            Ok(t) => t,
            Err(e) => error!("Failed to load token. Please run sporlcat auth\n Error: {}", e),
        };
        let token = match token_mgr.valid_token().await {
            Ok(t) => t,
            Err(e) => error!("{}", e),
        };

        let client = match SpotifyClient::connect(&settings, &token) {
            Ok(c) => c,
            Err(e) => error!("Cannot set up the Spotify client. Err: {}", e),
        };

        let owner_id = match settings.user_id.clone() {
            Some(id) => id,
            None => match client.current_user().await {
                Ok(profile) => profile.id,
                Err(e) => error!("Cannot look up your Spotify profile. Err: {}", e),
            },
        };

        let session = Session {
            store: ChunkedStore::new(client.clone()),
            client,
            owner_id,
        };

        if check_migration {
            session.warn_about_legacy_playlists().await;
        }
        session
    }

    async fn warn_about_legacy_playlists(&self) {
        let pb = spinner("Checking for legacy category playlists...");
        let detected = LegacyMigrator::new(self.client.clone())
            .detect(&self.owner_id)
            .await;
        pb.finish_and_clear();

        match detected {
            Ok(Some(migration)) => warning!(
                "Found {} legacy category playlists. Run `sporlcat migrate` to convert them.",
                migration.legacy_playlists.len()
            ),
            Ok(None) => {}
            Err(e) => warning!("Could not check for legacy playlists. Err: {}", e),
        }
    }

    /// Loads the mapping, refusing to continue on a corrupted document.
    pub async fn load_categories(&self) -> CategoryMap {
        let pb = spinner("Loading categories...");
        let outcome = self.store.load(&self.owner_id).await;
        pb.finish_and_clear();

        match outcome {
            Ok(LoadOutcome::Loaded(map)) => map,
            Ok(LoadOutcome::Corrupted) => error!(
                "Stored categories are corrupted and could not be recovered. Run `sporlcat reset --yes` to start over."
            ),
            Err(e) => error!("Failed to load categories. Err: {}", e),
        }
    }

    pub async fn save_categories(&self, map: &CategoryMap) {
        let pb = spinner("Saving categories...");
        let saved = self.store.save(&self.owner_id, map).await;
        pb.finish_and_clear();

        if let Err(e) = saved {
            error!("Failed to save categories. Err: {}", e);
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
