use tabled::Table;

use crate::{
    cli::{Session, spinner},
    error, info,
    types::ArtistTableRow,
};

pub async fn list_artists(search: Option<String>, uncategorized: bool) {
    let session = Session::open(true).await;

    let pb = spinner("Fetching followed artists...");
    let artists = session.client.followed_artists().await;
    pb.finish_and_clear();

    let mut artists = match artists {
        Ok(a) => a,
        Err(e) => error!("Failed to fetch followed artists. Err: {}", e),
    };
    let categories = session.load_categories().await;

    // sort artists by name
    artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if let Some(artist_search) = search {
        let search_term = artist_search.to_lowercase();
        artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }
    if uncategorized {
        artists.retain(|a| categories.category_of(&a.id).is_none());
    }

    if artists.is_empty() {
        info!("No matching artists.");
        return;
    }

    let table_rows: Vec<ArtistTableRow> = artists
        .into_iter()
        .map(|a| ArtistTableRow {
            category: categories.category_of(&a.id).unwrap_or("-").to_string(),
            name: a.name,
            id: a.id,
        })
        .collect();

    println!("{}", Table::new(table_rows));
}
