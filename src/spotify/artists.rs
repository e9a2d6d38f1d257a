use tracing::debug;

use crate::{
    error::Result,
    spotify::{
        SpotifyClient,
        pagination::{self, PageLayout},
        transport::ApiRequest,
    },
    types::{Artist, UserProfile},
};

const FOLLOWED_PAGE_LIMIT: u32 = 50;

impl SpotifyClient {
    /// Retrieves every artist the user follows.
    ///
    /// `/me/following` nests `items` and `next` under `artists`, so the
    /// collector is given the nested layout.
    pub async fn followed_artists(&self) -> Result<Vec<Artist>> {
        let artists = pagination::collect_pages(
            self.transport(),
            ApiRequest::get(format!(
                "/me/following?type=artist&limit={FOLLOWED_PAGE_LIMIT}"
            )),
            PageLayout::Nested("artists"),
            self.page_delay(),
            pagination::items::<Artist>,
        )
        .await?;
        debug!("fetched {} followed artists", artists.len());
        Ok(artists)
    }

    /// The profile behind the current token.
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.send(ApiRequest::get("/me")).await?.json()
    }
}
