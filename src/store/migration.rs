//! Conversion from the legacy one-playlist-per-category format.
//!
//! Older versions kept each category as a playlist named with the bare
//! legacy emoji prefix and filled it with tracks; the category's artists were
//! the primary artists of those tracks. [`LegacyMigrator::detect`] derives a
//! mapping from such playlists without changing anything, and
//! [`LegacyMigrator::commit`] writes it to the store before removing them.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::{
    error::Result,
    spotify::SpotifyClient,
    store::{CategoryStore, LoadOutcome, slots::SlotNaming},
    types::{CategoryMap, Playlist},
};

/// A pending conversion: the derived mapping and the playlists it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub mapping: CategoryMap,
    pub legacy_playlists: Vec<Playlist>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSummary {
    pub categories: usize,
    pub artists: usize,
    pub deleted_playlists: usize,
}

pub struct LegacyMigrator {
    client: SpotifyClient,
}

impl LegacyMigrator {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    /// Category name carried by a legacy playlist name, if it has one.
    fn legacy_category<'n>(&self, name: &'n str) -> Option<&'n str> {
        let category = name
            .strip_prefix(self.client.settings().legacy_prefix.as_str())?
            .trim();
        (!category.is_empty()).then_some(category)
    }

    /// Playlists named only by the prefix carry no category and are never
    /// migrated or deleted.
    fn is_legacy(&self, playlist: &Playlist, owner_id: &str) -> bool {
        let settings = self.client.settings();
        if !playlist.is_owned_by(owner_id)
            || playlist.name.starts_with(&settings.category_prefix)
            || SlotNaming::new(&settings.data_name)
                .index_of(&playlist.name)
                .is_some()
        {
            return false;
        }
        match self.legacy_category(&playlist.name) {
            Some(_) => true,
            None => {
                if playlist.name.starts_with(&settings.legacy_prefix) {
                    warn!(
                        "skipping legacy playlist {} without a category name",
                        playlist.id
                    );
                }
                false
            }
        }
    }

    /// Looks for legacy playlists of `owner_id` and derives their mapping.
    ///
    /// Returns `None` when there are none. Track listings are fetched one
    /// playlist at a time. Categories whose tracks yield no artist are left
    /// out of the mapping, but their playlists are still listed for removal.
    pub async fn detect(&self, owner_id: &str) -> Result<Option<Migration>> {
        let legacy_playlists: Vec<Playlist> = self
            .client
            .all_playlists()
            .await?
            .into_iter()
            .filter(|p| self.is_legacy(p, owner_id))
            .collect();

        if legacy_playlists.is_empty() {
            return Ok(None);
        }

        let mut mapping = CategoryMap::new();
        for playlist in &legacy_playlists {
            let Some(category) = self.legacy_category(&playlist.name) else {
                continue;
            };

            let artists: BTreeSet<String> = self
                .client
                .playlist_items(&playlist.id)
                .await?
                .iter()
                .filter_map(|item| item.track.as_ref())
                .filter_map(|track| track.primary_artist_id())
                .map(str::to_string)
                .collect();

            debug!(
                "legacy playlist {} -> category {:?} with {} artists",
                playlist.id,
                category,
                artists.len()
            );
            if artists.is_empty() {
                continue;
            }

            let mut merged = mapping.artists(category).cloned().unwrap_or_default();
            merged.extend(artists);
            mapping.insert(category.to_string(), merged);
        }

        Ok(Some(Migration {
            mapping,
            legacy_playlists,
        }))
    }

    /// Persists a detected migration and removes the legacy playlists.
    ///
    /// The migrated categories are merged into whatever the store already
    /// holds; an artist that is already filed keeps its category. The legacy
    /// playlists are only deleted after the save went through, so a failure
    /// before that point leaves them intact for another attempt.
    pub async fn commit(
        &self,
        store: &dyn CategoryStore,
        owner_id: &str,
        migration: &Migration,
    ) -> Result<MigrationSummary> {
        let mut merged = match store.load(owner_id).await? {
            LoadOutcome::Loaded(map) => map,
            LoadOutcome::Corrupted => {
                warn!("stored categories are corrupted; migrating onto an empty mapping");
                CategoryMap::new()
            }
        };

        let mut artists = 0;
        for (category, ids) in migration.mapping.iter() {
            merged.add_category(category);
            for id in ids {
                if merged.category_of(id).is_none() {
                    merged.assign(category, id);
                    artists += 1;
                }
            }
        }

        store.save(owner_id, &merged).await?;

        let existing: BTreeSet<String> = self
            .client
            .category_playlists(owner_id)
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        for category in migration.mapping.categories() {
            if existing.contains(category) {
                continue;
            }
            self.client.pause_between_writes().await;
            self.client.create_category_playlist(owner_id, category).await?;
        }

        for playlist in &migration.legacy_playlists {
            self.client.pause_between_writes().await;
            self.client.delete_playlist(&playlist.id).await?;
        }

        Ok(MigrationSummary {
            categories: migration.mapping.len(),
            artists,
            deleted_playlists: migration.legacy_playlists.len(),
        })
    }
}
