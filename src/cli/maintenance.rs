use crate::{
    cli::{Session, spinner},
    error, info,
    store::{LegacyMigrator, reset_all},
    success, warning,
};

/// Shows the pending legacy conversion, and performs it with `--yes`.
pub async fn migrate(yes: bool) {
    let session = Session::open(false).await;
    let migrator = LegacyMigrator::new(session.client.clone());

    let pb = spinner("Reading legacy category playlists...");
    let detected = migrator.detect(&session.owner_id).await;
    pb.finish_and_clear();

    let migration = match detected {
        Ok(Some(m)) => m,
        Ok(None) => {
            success!("No legacy category playlists found. Nothing to migrate.");
            return;
        }
        Err(e) => error!("Failed to read legacy playlists. Err: {}", e),
    };

    for (category, artists) in migration.mapping.iter() {
        info!("{}: {} artists", category, artists.len());
    }

    if !yes {
        warning!(
            "{} legacy playlists would be converted and then deleted. Re-run with --yes to proceed.",
            migration.legacy_playlists.len()
        );
        return;
    }

    let pb = spinner("Migrating categories...");
    let committed = migrator
        .commit(&session.store, &session.owner_id, &migration)
        .await;
    pb.finish_and_clear();

    match committed {
        Ok(summary) => success!(
            "Migrated {} categories ({} artists) and removed {} legacy playlists.",
            summary.categories,
            summary.artists,
            summary.deleted_playlists
        ),
        Err(e) => error!(
            "Migration failed. Legacy playlists that were not deleted yet are untouched. Err: {}",
            e
        ),
    }
}

/// Deletes every data and category playlist. Requires `--yes`.
pub async fn reset(yes: bool) {
    if !yes {
        warning!("This deletes all your categories and their playlists for good. Re-run with --yes to proceed.");
        return;
    }

    let session = Session::open(false).await;

    let pb = spinner("Deleting sporlcat playlists...");
    let result = reset_all(&session.client, &session.owner_id).await;
    pb.finish_and_clear();

    match result {
        Ok(summary) => success!(
            "Deleted {} data playlists and {} category playlists.",
            summary.deleted_data,
            summary.deleted_categories
        ),
        Err(e) => error!("Reset stopped halfway. Err: {}", e),
    }
}
