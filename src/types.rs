use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub id: String,
    pub category: String,
}

#[derive(Tabled)]
pub struct CategoryTableRow {
    pub category: String,
    pub artists: usize,
    pub playlist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

/// A playlist as returned by the listing and detail endpoints.
///
/// Listings may truncate `description`; only the detail endpoint returns it
/// in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub public: Option<bool>,
}

impl Playlist {
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner.id == owner_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub description: String,
}

/// One entry of `GET /playlists/{id}/tracks`.
///
/// `track` is null for entries Spotify can no longer resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

impl Track {
    /// The first credited artist, if it has an id.
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Category name to the set of artist ids filed under it.
///
/// Serializes as a plain JSON object of string arrays, e.g.
/// `{"Rock":["artist1","artist2"]}`. The one-category-per-artist rule is kept
/// by [`CategoryMap::assign`]; deserialization does not enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<String, BTreeSet<String>>);

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Adds an empty category. Returns `false` if it already existed.
    pub fn add_category(&mut self, category: &str) -> bool {
        if self.0.contains_key(category) {
            return false;
        }
        self.0.insert(category.to_string(), BTreeSet::new());
        true
    }

    /// Drops a category and its artists. Returns the removed artists.
    pub fn remove_category(&mut self, category: &str) -> Option<BTreeSet<String>> {
        self.0.remove(category)
    }

    /// Files `artist_id` under `category`, taking it out of any other category.
    ///
    /// The category is created when missing.
    pub fn assign(&mut self, category: &str, artist_id: &str) {
        for (name, artists) in self.0.iter_mut() {
            if name != category {
                artists.remove(artist_id);
            }
        }
        self.0
            .entry(category.to_string())
            .or_default()
            .insert(artist_id.to_string());
    }

    /// Removes `artist_id` from whatever category holds it.
    pub fn unassign(&mut self, artist_id: &str) -> Option<String> {
        let category = self.category_of(artist_id)?.to_string();
        if let Some(artists) = self.0.get_mut(&category) {
            artists.remove(artist_id);
        }
        Some(category)
    }

    pub fn category_of(&self, artist_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, artists)| artists.contains(artist_id))
            .map(|(name, _)| name.as_str())
    }

    pub fn artists(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.0.get(category)
    }

    /// Replaces a category's artists wholesale, without touching other categories.
    pub fn insert(&mut self, category: String, artists: BTreeSet<String>) {
        self.0.insert(category, artists);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, BTreeSet<String>)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
