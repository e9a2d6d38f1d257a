//! # Category Store
//!
//! Spotify has no key-value storage, so the category mapping is kept in the
//! descriptions of private "data" playlists owned by the user. The JSON
//! document is cut into description-sized slots, one playlist per slot.
//!
//! ## Layout
//!
//! ```text
//! sporlcat-data      slot 0   {"Jazz":["4NHQ...","0Lyf...
//! sporlcat-data_2    slot 1   "],"Rock":["3WrF...
//! sporlcat-data_3    slot 2   ..."]}
//! ```
//!
//! ## Modules
//!
//! - [`slots`] - slot naming and chunking
//! - [`codec`] - JSON encoding, entity unescaping, corruption recovery
//! - [`chunked`] - the playlist-backed [`CategoryStore`]
//! - [`migration`] - conversion from the one-playlist-per-category format
//! - [`reset`] - removal of every playlist the store owns
//!
//! Writes span several playlists without any atomicity. A save that fails
//! halfway leaves a mix of old and new slots; the next successful save
//! rewrites all of them, and a load in between may report
//! [`LoadOutcome::Corrupted`].

pub mod chunked;
pub mod codec;
pub mod migration;
pub mod reset;
pub mod slots;

use async_trait::async_trait;

use crate::{error::Result, types::CategoryMap};

pub use chunked::ChunkedStore;
pub use migration::{LegacyMigrator, Migration, MigrationSummary};
pub use reset::{ResetSummary, reset_all};

/// What a load found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored mapping, possibly recovered from a damaged document.
    Loaded(CategoryMap),
    /// Slots exist but no mapping could be rebuilt from them.
    Corrupted,
}

impl LoadOutcome {
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::Corrupted)
    }

    /// The loaded mapping, or an empty one when the document was corrupted.
    pub fn unwrap_or_empty(self) -> CategoryMap {
        match self {
            Self::Loaded(map) => map,
            Self::Corrupted => CategoryMap::new(),
        }
    }
}

/// Durable home of the category mapping.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Reads the mapping of `owner_id`. A user without stored data gets an
    /// empty mapping.
    async fn load(&self, owner_id: &str) -> Result<LoadOutcome>;

    /// Replaces the stored mapping of `owner_id` with `map`.
    async fn save(&self, owner_id: &str, map: &CategoryMap) -> Result<()>;
}
