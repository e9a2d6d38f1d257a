//! Removal of every playlist the store owns.

use tracing::debug;

use crate::{error::Result, spotify::SpotifyClient, types::Playlist};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub deleted_data: usize,
    pub deleted_categories: usize,
}

/// Deletes every data and category playlist of `owner_id`, data first.
///
/// Matching is by prefix, so stray playlists sharing the data name prefix go
/// too. There is no undo; callers confirm with the user before calling this.
pub async fn reset_all(client: &SpotifyClient, owner_id: &str) -> Result<ResetSummary> {
    let settings = client.settings();
    let owned: Vec<Playlist> = client
        .all_playlists()
        .await?
        .into_iter()
        .filter(|p| p.is_owned_by(owner_id))
        .collect();

    let (data, rest): (Vec<Playlist>, Vec<Playlist>) = owned
        .into_iter()
        .partition(|p| p.name.starts_with(&settings.data_name));
    let categories: Vec<Playlist> = rest
        .into_iter()
        .filter(|p| p.name.starts_with(&settings.category_prefix))
        .collect();

    let mut first = true;
    for playlist in data.iter().chain(categories.iter()) {
        if !first {
            client.pause_between_writes().await;
        }
        first = false;
        debug!("reset: deleting {} ({})", playlist.name, playlist.id);
        client.delete_playlist(&playlist.id).await?;
    }

    Ok(ResetSummary {
        deleted_data: data.len(),
        deleted_categories: categories.len(),
    })
}
