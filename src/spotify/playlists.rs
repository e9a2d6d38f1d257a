//! Playlist registry.
//!
//! Playlists are the only storage Spotify gives us. This module lists them,
//! sorts them into category and data playlists by name prefix and owner, and
//! performs the handful of writes the store needs.

use tracing::debug;

use crate::{
    error::Result,
    spotify::{
        SpotifyClient,
        pagination::{self, PageLayout},
        transport::ApiRequest,
    },
    types::{CreatePlaylistRequest, Playlist, PlaylistItem, UpdatePlaylistRequest},
};

/// Description given to every category playlist.
pub const CATEGORY_DESCRIPTION: &str = "Artist category managed by sporlcat.";

const PLAYLIST_PAGE_LIMIT: u32 = 50;
const TRACK_PAGE_LIMIT: u32 = 100;

impl SpotifyClient {
    /// Every playlist in the current user's library, across all pages.
    pub async fn all_playlists(&self) -> Result<Vec<Playlist>> {
        pagination::collect_pages(
            self.transport(),
            ApiRequest::get(format!("/me/playlists?limit={PLAYLIST_PAGE_LIMIT}")),
            PageLayout::Root,
            self.page_delay(),
            pagination::items::<Playlist>,
        )
        .await
    }

    /// Playlists owned by `owner_id` whose name starts with `prefix`.
    pub async fn playlists_by_prefix(&self, prefix: &str, owner_id: &str) -> Result<Vec<Playlist>> {
        let playlists = self.all_playlists().await?;
        Ok(playlists
            .into_iter()
            .filter(|p| p.name.starts_with(prefix) && p.is_owned_by(owner_id))
            .collect())
    }

    /// Full playlist detail. Unlike listings, the description is never cut short.
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.send(ApiRequest::get(format!("/playlists/{playlist_id}")))
            .await?
            .json()
    }

    /// Creates a private, non-collaborative playlist.
    pub async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };
        let playlist: Playlist = self
            .send(ApiRequest::post(format!("/users/{owner_id}/playlists"), &body)?)
            .await?
            .json()?;
        debug!("created playlist {} ({})", playlist.name, playlist.id);
        Ok(playlist)
    }

    /// Replaces a playlist's description and nothing else.
    pub async fn update_description(&self, playlist_id: &str, description: &str) -> Result<()> {
        let body = UpdatePlaylistRequest {
            description: description.to_string(),
        };
        self.send(ApiRequest::put(format!("/playlists/{playlist_id}"), &body)?)
            .await?;
        debug!("updated description of playlist {}", playlist_id);
        Ok(())
    }

    /// Unfollows a playlist, which is how Spotify deletes one.
    ///
    /// A playlist that is gone already or not ours (404/403) counts as deleted.
    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        let request = ApiRequest::delete(format!("/playlists/{playlist_id}/followers"));
        let response = self.send_raw(&request).await?;
        if matches!(response.status, 403 | 404) {
            debug!(
                "playlist {} already absent (status {})",
                playlist_id, response.status
            );
            return Ok(());
        }
        response.error_for_status(&request)?;
        debug!("deleted playlist {}", playlist_id);
        Ok(())
    }

    /// Every entry of a playlist, across all pages.
    pub async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
        pagination::collect_pages(
            self.transport(),
            ApiRequest::get(format!(
                "/playlists/{playlist_id}/tracks?limit={TRACK_PAGE_LIMIT}"
            )),
            PageLayout::Root,
            self.page_delay(),
            pagination::items::<PlaylistItem>,
        )
        .await
    }

    /// Category playlists of `owner_id`, paired with their category name.
    pub async fn category_playlists(&self, owner_id: &str) -> Result<Vec<(String, Playlist)>> {
        let prefix = self.settings().category_prefix.clone();
        Ok(self
            .playlists_by_prefix(&prefix, owner_id)
            .await?
            .into_iter()
            .map(|p| (p.name[prefix.len()..].to_string(), p))
            .collect())
    }

    /// Creates the playlist named `category prefix + category`.
    pub async fn create_category_playlist(&self, owner_id: &str, category: &str) -> Result<Playlist> {
        let name = format!("{}{}", self.settings().category_prefix, category);
        self.create_playlist(owner_id, &name, CATEGORY_DESCRIPTION)
            .await
    }

    /// Returns the category's playlist, creating it when there is none.
    pub async fn ensure_category_playlist(&self, owner_id: &str, category: &str) -> Result<Playlist> {
        let existing = self
            .category_playlists(owner_id)
            .await?
            .into_iter()
            .find(|(name, _)| name == category);
        match existing {
            Some((_, playlist)) => Ok(playlist),
            None => self.create_category_playlist(owner_id, category).await,
        }
    }

    /// Deletes every playlist of this category. Returns how many were removed.
    pub async fn delete_category_playlist(&self, owner_id: &str, category: &str) -> Result<usize> {
        let matching: Vec<Playlist> = self
            .category_playlists(owner_id)
            .await?
            .into_iter()
            .filter(|(name, _)| name == category)
            .map(|(_, p)| p)
            .collect();

        for (i, playlist) in matching.iter().enumerate() {
            if i > 0 {
                self.pause_between_writes().await;
            }
            self.delete_playlist(&playlist.id).await?;
        }
        Ok(matching.len())
    }
}
