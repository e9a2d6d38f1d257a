use std::collections::BTreeSet;

use tabled::Table;

use crate::{
    cli::{Session, spinner},
    error, info, success,
    types::CategoryTableRow,
    warning,
};

pub async fn list_categories() {
    let session = Session::open(true).await;
    let categories = session.load_categories().await;

    if categories.is_empty() {
        info!("No categories yet. Create one with `sporlcat categories create <NAME>`.");
        return;
    }

    let playlists: BTreeSet<String> = match session.client.category_playlists(&session.owner_id).await {
        Ok(p) => p.into_iter().map(|(name, _)| name).collect(),
        Err(e) => {
            warning!("Failed to list category playlists. Err: {}", e);
            BTreeSet::new()
        }
    };

    let rows: Vec<CategoryTableRow> = categories
        .iter()
        .map(|(name, artists)| CategoryTableRow {
            category: name.clone(),
            artists: artists.len(),
            playlist: if playlists.contains(name) { "yes" } else { "missing" }.to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub async fn create_category(name: String) {
    let name = name.trim().to_string();
    if name.is_empty() {
        error!("Category name must not be empty.");
    }

    let session = Session::open(true).await;
    let mut categories = session.load_categories().await;

    if !categories.add_category(&name) {
        warning!("Category {} already exists.", name);
    } else {
        session.save_categories(&categories).await;
    }

    let pb = spinner("Creating category playlist...");
    let created = session
        .client
        .ensure_category_playlist(&session.owner_id, &name)
        .await;
    pb.finish_and_clear();

    match created {
        Ok(_) => success!("Category {} is ready.", name),
        Err(e) => warning!("Category saved, but its playlist could not be created. Err: {}", e),
    }
}

pub async fn delete_category(name: String) {
    let session = Session::open(true).await;
    let mut categories = session.load_categories().await;

    match categories.remove_category(&name) {
        Some(artists) => {
            session.save_categories(&categories).await;
            info!("Removed category {} with {} artists.", name, artists.len());
        }
        None => warning!("Category {} does not exist.", name),
    }

    match session
        .client
        .delete_category_playlist(&session.owner_id, &name)
        .await
    {
        Ok(0) => {}
        Ok(n) => success!("Deleted {} category playlist(s) for {}.", n, name),
        Err(e) => warning!("Failed to delete the category playlist. Err: {}", e),
    }
}

pub async fn assign(category: String, artist_ids: Vec<String>) {
    let session = Session::open(true).await;
    let mut categories = session.load_categories().await;

    if !categories.contains_category(&category) {
        error!(
            "Unknown category {}. Create it with `sporlcat categories create`.",
            category
        );
    }

    for artist_id in &artist_ids {
        if let Some(previous) = categories.category_of(artist_id) {
            if previous != category {
                info!("Moving {} from {} to {}", artist_id, previous, category);
            }
        }
        categories.assign(&category, artist_id);
    }

    session.save_categories(&categories).await;
    success!("Filed {} artist(s) under {}.", artist_ids.len(), category);
}

pub async fn unassign(artist_ids: Vec<String>) {
    let session = Session::open(true).await;
    let mut categories = session.load_categories().await;

    let mut removed = 0;
    for artist_id in &artist_ids {
        match categories.unassign(artist_id) {
            Some(category) => {
                info!("Removed {} from {}", artist_id, category);
                removed += 1;
            }
            None => warning!("Artist {} is not in any category.", artist_id),
        }
    }

    if removed > 0 {
        session.save_categories(&categories).await;
        success!("Unassigned {} artist(s).", removed);
    }
}
