mod common;

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use sporlcat::{
    error::Result,
    config::StoreSettings,
    spotify::{
        pagination::{self, PageLayout},
        transport::{ApiRequest, ApiResponse},
    },
};

use common::{FakeSpotify, OWNER, client, client_with_settings};

#[test]
fn test_next_url_root_layout() {
    let body = json!({"items": [], "next": "https://api.spotify.com/v1/me/playlists?offset=50"});
    assert_eq!(
        PageLayout::Root.next_url(&body).as_deref(),
        Some("https://api.spotify.com/v1/me/playlists?offset=50")
    );

    // Should stop on null, missing or empty next links
    assert_eq!(PageLayout::Root.next_url(&json!({"next": null})), None);
    assert_eq!(PageLayout::Root.next_url(&json!({"items": []})), None);
    assert_eq!(PageLayout::Root.next_url(&json!({"next": ""})), None);
}

#[test]
fn test_next_url_nested_layout() {
    let layout = PageLayout::Nested("artists");
    let body = json!({"artists": {"items": [], "next": "https://example.com/next"}});
    assert_eq!(layout.next_url(&body).as_deref(), Some("https://example.com/next"));

    // Should not look at the root of a nested page
    let misplaced = json!({"items": [], "next": "https://example.com/next"});
    assert_eq!(layout.next_url(&misplaced), None);
}

#[test]
fn test_items_extractor() {
    let page = json!({"items": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}]});
    let names: Vec<Value> = pagination::items(&page).unwrap();
    assert_eq!(names.len(), 2);

    // Should treat null and missing items as an empty page
    assert!(pagination::items::<Value>(&json!({"items": null})).unwrap().is_empty());
    assert!(pagination::items::<Value>(&json!({})).unwrap().is_empty());
}

#[tokio::test]
async fn test_collects_every_root_page() {
    let fake = FakeSpotify::new();
    fake.set_page_size(2);
    for i in 0..5 {
        fake.add_playlist(&format!("Playlist {i}"), OWNER, "");
    }

    let playlists = client(&fake).all_playlists().await.unwrap();

    // Should follow next links until they run out, keeping listing order
    let names: Vec<String> = playlists.into_iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        vec!["Playlist 0", "Playlist 1", "Playlist 2", "Playlist 3", "Playlist 4"]
    );
    let pages = fake
        .log()
        .into_iter()
        .filter(|(_, path)| path == "/me/playlists")
        .count();
    assert_eq!(pages, 3);
}

#[tokio::test]
async fn test_collects_every_nested_page() {
    let fake = FakeSpotify::new();
    fake.set_page_size(2);
    fake.follow("a1", "Alpha");
    fake.follow("a2", "Beta");
    fake.follow("a3", "Gamma");

    let artists = client(&fake).followed_artists().await.unwrap();

    let ids: Vec<String> = artists.into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
}

#[tokio::test]
async fn test_custom_extractor() {
    let fake = FakeSpotify::new();
    fake.add_playlist("One", OWNER, "");
    fake.add_playlist("Two", OWNER, "");

    let names: Vec<String> = pagination::collect_pages(
        fake.as_ref(),
        ApiRequest::get("/me/playlists"),
        PageLayout::Root,
        Duration::ZERO,
        |envelope: &Value| -> Result<Vec<String>> {
            Ok(envelope["items"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|p| p["name"].as_str().map(str::to_string))
                .collect())
        },
    )
    .await
    .unwrap();

    assert_eq!(names, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_page_delay_between_pages() {
    let fake = FakeSpotify::new();
    fake.set_page_size(3);
    for i in 0..7 {
        fake.add_playlist(&format!("Playlist {i}"), OWNER, "");
    }
    let delay = Duration::from_millis(30);
    let client = client_with_settings(
        &fake,
        StoreSettings {
            page_delay: delay,
            ..StoreSettings::without_delays()
        },
    );

    let started = Instant::now();
    let playlists = client.all_playlists().await.unwrap();

    // Should pause once between each of the three pages
    assert_eq!(playlists.len(), 7);
    assert!(started.elapsed() >= delay * 2);
}

#[tokio::test]
async fn test_no_page_delay_without_next_page() {
    let fake = FakeSpotify::new();
    fake.add_playlist("Only", OWNER, "");
    let delay = Duration::from_millis(500);

    let started = Instant::now();
    let names: Vec<Value> = pagination::collect_pages(
        fake.as_ref(),
        ApiRequest::get("/me/playlists"),
        PageLayout::Root,
        delay,
        pagination::items::<Value>,
    )
    .await
    .unwrap();

    // Should not pause before the first page or after the last
    assert_eq!(names.len(), 1);
    assert!(started.elapsed() < delay);
}

#[tokio::test]
async fn test_failed_page_aborts() {
    let fake = FakeSpotify::new();
    fake.set_page_size(1);
    fake.add_playlist("One", OWNER, "");
    fake.add_playlist("Two", OWNER, "");
    fake.script(vec![
        ApiResponse::new(
            200,
            json!({"items": [], "next": format!("{}/me/playlists?offset=1", common::BASE)}).to_string(),
        ),
        ApiResponse::new(502, "bad gateway"),
    ]);

    let err = client(&fake).all_playlists().await.unwrap_err();

    // Should surface the failing page's status
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_missing_envelope_is_unexpected() {
    let fake = FakeSpotify::new();
    fake.script(vec![ApiResponse::new(200, r#"{"items": []}"#)]);

    let err = client(&fake).followed_artists().await.unwrap_err();

    assert!(matches!(err, sporlcat::Error::UnexpectedResponse { .. }));
}
