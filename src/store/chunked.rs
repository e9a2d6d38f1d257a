use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    error::Result,
    spotify::SpotifyClient,
    store::{
        CategoryStore, LoadOutcome, codec,
        slots::{self, SlotNaming},
    },
    types::{CategoryMap, Playlist},
};

/// [`CategoryStore`] spreading the mapping over data playlist descriptions.
#[derive(Clone)]
pub struct ChunkedStore {
    client: SpotifyClient,
}

impl ChunkedStore {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    fn naming(&self) -> SlotNaming<'_> {
        SlotNaming::new(&self.client.settings().data_name)
    }

    /// Data playlists of `owner_id` with their slot index, ordered by index.
    ///
    /// Playlists that merely share the prefix are ignored. Ties keep the
    /// listing order.
    pub async fn data_slots(&self, owner_id: &str) -> Result<Vec<(usize, Playlist)>> {
        let naming = self.naming();
        let mut slots: Vec<(usize, Playlist)> = self
            .client
            .playlists_by_prefix(&self.client.settings().data_name, owner_id)
            .await?
            .into_iter()
            .filter_map(|p| naming.index_of(&p.name).map(|i| (i, p)))
            .collect();
        slots.sort_by_key(|(index, _)| *index);
        Ok(slots)
    }
}

#[async_trait]
impl CategoryStore for ChunkedStore {
    async fn load(&self, owner_id: &str) -> Result<LoadOutcome> {
        let slots = self.data_slots(owner_id).await?;
        if slots.is_empty() {
            debug!("no data playlists for {}, starting empty", owner_id);
            return Ok(LoadOutcome::Loaded(CategoryMap::new()));
        }

        let mut fragments: BTreeMap<usize, String> = BTreeMap::new();
        for (index, playlist) in slots {
            if fragments.contains_key(&index) {
                warn!("ignoring duplicate data slot {} ({})", index, playlist.id);
                continue;
            }
            // listings may cut the description short
            let detail = self.client.playlist(&playlist.id).await?;
            fragments.insert(index, detail.description.unwrap_or_default());
        }

        if let Some((&last, _)) = fragments.last_key_value() {
            if last + 1 != fragments.len() {
                warn!(
                    "data slots are not contiguous: {} slots up to index {}",
                    fragments.len(),
                    last
                );
            }
        }

        let document: String = fragments.into_values().collect();
        Ok(codec::decode(&document))
    }

    async fn save(&self, owner_id: &str, map: &CategoryMap) -> Result<()> {
        let naming = self.naming();
        let document = codec::encode(map)?;
        let fragments = slots::split_into_slots(&document, self.client.settings().slot_capacity);

        let mut reusable: BTreeMap<usize, Playlist> = BTreeMap::new();
        let mut surplus: Vec<Playlist> = Vec::new();
        for (index, playlist) in self.data_slots(owner_id).await? {
            if index < fragments.len() && !reusable.contains_key(&index) {
                reusable.insert(index, playlist);
            } else {
                surplus.push(playlist);
            }
        }

        debug!(
            "saving {} characters into {} slots ({} reused, {} to delete)",
            document.chars().count(),
            fragments.len(),
            reusable.len(),
            surplus.len()
        );

        let mut first = true;
        for (index, fragment) in fragments.iter().enumerate() {
            if !first {
                self.client.pause_between_writes().await;
            }
            first = false;

            match reusable.get(&index) {
                Some(playlist) => {
                    self.client
                        .update_description(&playlist.id, fragment)
                        .await?
                }
                None => {
                    self.client
                        .create_playlist(owner_id, &naming.name(index), fragment)
                        .await?;
                }
            }
        }

        for playlist in surplus {
            self.client.pause_between_writes().await;
            self.client.delete_playlist(&playlist.id).await?;
        }

        Ok(())
    }
}
