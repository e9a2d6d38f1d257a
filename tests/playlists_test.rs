mod common;

use sporlcat::spotify::{
    auth::{generate_code_challenge, generate_code_verifier},
    playlists::CATEGORY_DESCRIPTION,
};

use common::{FakeSpotify, OWNER, STRANGER, client};

#[tokio::test]
async fn test_playlists_by_prefix_filters_owner() {
    let fake = FakeSpotify::new();
    fake.add_playlist("🎸 Category: Rock", OWNER, "");
    fake.add_playlist("🎸 Category: Theirs", STRANGER, "");
    fake.add_playlist("Road trip", OWNER, "");
    fake.add_playlist("🎸 Category: Jazz", OWNER, "");

    let found = client(&fake)
        .playlists_by_prefix("🎸 Category: ", OWNER)
        .await
        .unwrap();

    let names: Vec<String> = found.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["🎸 Category: Rock", "🎸 Category: Jazz"]);
}

#[tokio::test]
async fn test_category_playlists_strip_prefix() {
    let fake = FakeSpotify::new();
    fake.add_playlist("🎸 Category: Rock & Roll", OWNER, "");
    fake.add_playlist("🎸 Rock", OWNER, "");

    let categories = client(&fake).category_playlists(OWNER).await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].0, "Rock & Roll");
}

#[tokio::test]
async fn test_create_category_playlist() {
    let fake = FakeSpotify::new();

    let playlist = client(&fake)
        .create_category_playlist(OWNER, "Jazz")
        .await
        .unwrap();

    assert_eq!(playlist.name, "🎸 Category: Jazz");
    assert!(playlist.is_owned_by(OWNER));
    let stored = fake.playlist_named("🎸 Category: Jazz").unwrap();
    assert_eq!(stored.description, CATEGORY_DESCRIPTION);
}

#[tokio::test]
async fn test_ensure_category_playlist_does_not_duplicate() {
    let fake = FakeSpotify::new();
    let client = client(&fake);

    let first = client.ensure_category_playlist(OWNER, "Rock").await.unwrap();
    let second = client.ensure_category_playlist(OWNER, "Rock").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(fake.names_starting_with("🎸 Category: ").len(), 1);
}

#[tokio::test]
async fn test_delete_category_playlist() {
    let fake = FakeSpotify::new();
    fake.add_playlist("🎸 Category: Rock", OWNER, "");
    fake.add_playlist("🎸 Category: Rock", OWNER, "");
    fake.add_playlist("🎸 Category: Rockabilly", OWNER, "");

    let deleted = client(&fake)
        .delete_category_playlist(OWNER, "Rock")
        .await
        .unwrap();

    // Should delete exact category matches only
    assert_eq!(deleted, 2);
    assert_eq!(
        fake.names_starting_with("🎸 Category: "),
        vec!["🎸 Category: Rockabilly"]
    );
}

#[tokio::test]
async fn test_delete_playlist_is_idempotent() {
    let fake = FakeSpotify::new();
    let theirs = fake.add_playlist("Shared", STRANGER, "");
    let client = client(&fake);

    // Should accept a missing playlist and one we cannot unfollow
    client.delete_playlist("does-not-exist").await.unwrap();
    client.delete_playlist(&theirs).await.unwrap();
    assert!(fake.playlist_named("Shared").is_some());
}

#[tokio::test]
async fn test_delete_playlist_propagates_server_errors() {
    let fake = FakeSpotify::new();
    let id = fake.add_playlist("Mine", OWNER, "");
    fake.reject("DELETE", "/playlists", 503);

    let err = client(&fake).delete_playlist(&id).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_playlist_detail_has_full_description() {
    let fake = FakeSpotify::new();
    let id = fake.add_playlist("Long", OWNER, "a description longer than a listing shows");
    let client = client(&fake);

    let listed = client.all_playlists().await.unwrap();
    let detail = client.playlist(&id).await.unwrap();

    assert_ne!(listed[0].description, detail.description);
    assert_eq!(
        detail.description.as_deref(),
        Some("a description longer than a listing shows")
    );
}

#[tokio::test]
async fn test_update_description() {
    let fake = FakeSpotify::new();
    let id = fake.add_playlist("Notes", OWNER, "old");

    client(&fake).update_description(&id, "new").await.unwrap();

    assert_eq!(fake.playlist_named("Notes").unwrap().description, "new");
}

#[tokio::test]
async fn test_current_user() {
    let fake = FakeSpotify::new();

    let user = client(&fake).current_user().await.unwrap();

    assert_eq!(user.id, OWNER);
    assert_eq!(user.display_name.as_deref(), Some("Fake User"));
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 alphanumeric characters
    assert_eq!(verifier.len(), 128);
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    assert_ne!(verifier, generate_code_verifier());
}

#[test]
fn test_generate_code_challenge() {
    let challenge = generate_code_challenge("test_verifier_123");

    // Should be deterministic, URL safe and unpadded
    assert_eq!(challenge, generate_code_challenge("test_verifier_123"));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));
    assert_eq!(challenge.len(), 43);
    assert!(!challenge.contains('=') && !challenge.contains('+') && !challenge.contains('/'));
}
