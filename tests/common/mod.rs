//! In-memory stand-in for the parts of the Spotify Web API sporlcat uses.
//!
//! Behaves like the real service where the store cares about it: listings
//! are paginated and cut descriptions short, descriptions come back
//! HTML-escaped, unfollowing someone else's playlist is refused.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{Value, json};
use sporlcat::{
    config::StoreSettings,
    error::Result,
    spotify::{
        SpotifyClient,
        transport::{ApiRequest, ApiResponse, RateLimited, Transport},
    },
};
use url::Url;

pub const OWNER: &str = "owner-1";
pub const STRANGER: &str = "someone-else";
pub const BASE: &str = "http://fake.spotify/v1";

#[derive(Debug, Clone)]
pub struct StoredPlaylist {
    pub id: String,
    pub name: String,
    pub owner: String,
    /// Exactly what Spotify would hand back, escaping included.
    pub description: String,
    /// `(track id, primary artist id)`; an empty track id is an unavailable track.
    pub tracks: Vec<(String, String)>,
}

struct Rejection {
    method: String,
    path_prefix: String,
    status: u16,
}

struct State {
    playlists: Vec<StoredPlaylist>,
    followed: Vec<(String, String)>,
    next_id: u64,
    log: Vec<(String, String)>,
    scripted: VecDeque<ApiResponse>,
    rejections: Vec<Rejection>,
    page_size: usize,
    listing_truncation: usize,
}

pub struct FakeSpotify {
    state: Mutex<State>,
}

/// The escaping Spotify applies to playlist descriptions.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn json_response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn not_found() -> ApiResponse {
    json_response(404, json!({"error": {"status": 404, "message": "Not found."}}))
}

fn playlist_json(p: &StoredPlaylist, description: String) -> Value {
    json!({
        "id": p.id,
        "name": p.name,
        "description": description,
        "owner": {"id": p.owner},
        "public": false,
    })
}

fn page_bounds(query: &HashMap<String, String>, key: &str, page_size: usize, total: usize) -> (usize, usize, usize) {
    let start = query.get(key).and_then(|v| v.parse().ok()).unwrap_or(0usize);
    let limit = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(50usize);
    let end = (start + limit.min(page_size)).min(total);
    (start.min(total), end, limit)
}

impl FakeSpotify {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                playlists: Vec::new(),
                followed: Vec::new(),
                next_id: 1,
                log: Vec::new(),
                scripted: VecDeque::new(),
                rejections: Vec::new(),
                page_size: 3,
                listing_truncation: 8,
            }),
        })
    }

    pub fn set_page_size(&self, size: usize) {
        self.state.lock().unwrap().page_size = size;
    }

    /// Stores a playlist with `description` kept verbatim.
    pub fn add_playlist(&self, name: &str, owner: &str, description: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = format!("pl{}", state.next_id);
        state.next_id += 1;
        state.playlists.push(StoredPlaylist {
            id: id.clone(),
            name: name.to_string(),
            owner: owner.to_string(),
            description: description.to_string(),
            tracks: Vec::new(),
        });
        id
    }

    pub fn add_track_playlist(&self, name: &str, owner: &str, tracks: &[(&str, &str)]) -> String {
        let id = self.add_playlist(name, owner, "");
        let mut state = self.state.lock().unwrap();
        if let Some(p) = state.playlists.iter_mut().find(|p| p.id == id) {
            p.tracks = tracks
                .iter()
                .map(|(t, a)| (t.to_string(), a.to_string()))
                .collect();
        }
        id
    }

    pub fn follow(&self, artist_id: &str, name: &str) {
        self.state
            .lock()
            .unwrap()
            .followed
            .push((artist_id.to_string(), name.to_string()));
    }

    /// Answers the next requests with these responses, whatever they are.
    pub fn script(&self, responses: Vec<ApiResponse>) {
        self.state.lock().unwrap().scripted.extend(responses);
    }

    /// Answers every matching request with `status` from now on.
    pub fn reject(&self, method: &str, path_prefix: &str, status: u16) {
        self.state.lock().unwrap().rejections.push(Rejection {
            method: method.to_string(),
            path_prefix: path_prefix.to_string(),
            status,
        });
    }

    pub fn playlists(&self) -> Vec<StoredPlaylist> {
        self.state.lock().unwrap().playlists.clone()
    }

    pub fn playlist_named(&self, name: &str) -> Option<StoredPlaylist> {
        self.playlists().into_iter().find(|p| p.name == name)
    }

    pub fn names_starting_with(&self, prefix: &str) -> Vec<String> {
        self.playlists()
            .into_iter()
            .filter(|p| p.name.starts_with(prefix))
            .map(|p| p.name)
            .collect()
    }

    /// Every request seen so far as `(method, path)`.
    pub fn log(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().log.clone()
    }

    /// Requests other than GET.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.log().into_iter().filter(|(m, _)| m != "GET").collect()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }

    fn handle(state: &mut State, request: &ApiRequest) -> ApiResponse {
        let raw = if request.url.starts_with("http") {
            request.url.clone()
        } else {
            format!("{BASE}{}", request.url)
        };
        let url = Url::parse(&raw).expect("fake received an invalid url");
        let path = url.path().trim_start_matches("/v1").to_string();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let method = request.method.as_str().to_string();

        state.log.push((method.clone(), path.clone()));

        if let Some(response) = state.scripted.pop_front() {
            return response;
        }
        if let Some(rejection) = state
            .rejections
            .iter()
            .find(|r| r.method == method && path.starts_with(&r.path_prefix))
        {
            return json_response(rejection.status, json!({"error": "rejected"}));
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["me"]) => json_response(200, json!({"id": OWNER, "display_name": "Fake User"})),
            ("GET", ["me", "playlists"]) => {
                let total = state.playlists.len();
                let (start, end, limit) = page_bounds(&query, "offset", state.page_size, total);
                let items: Vec<Value> = state.playlists[start..end]
                    .iter()
                    .map(|p| {
                        let cut: String = p.description.chars().take(state.listing_truncation).collect();
                        playlist_json(p, cut)
                    })
                    .collect();
                let next = (end < total).then(|| format!("{BASE}/me/playlists?offset={end}&limit={limit}"));
                json_response(200, json!({"items": items, "next": next, "total": total}))
            }
            ("GET", ["me", "following"]) => {
                let total = state.followed.len();
                let (start, end, limit) = page_bounds(&query, "after", state.page_size, total);
                let items: Vec<Value> = state.followed[start..end]
                    .iter()
                    .map(|(id, name)| json!({"id": id, "name": name, "genres": []}))
                    .collect();
                let next = (end < total)
                    .then(|| format!("{BASE}/me/following?type=artist&after={end}&limit={limit}"));
                json_response(
                    200,
                    json!({"artists": {
                        "items": items,
                        "next": next,
                        "cursors": {"after": next.as_ref().map(|_| end.to_string())},
                        "total": total,
                    }}),
                )
            }
            ("GET", ["playlists", id]) => match state.playlists.iter().find(|p| p.id == *id) {
                Some(p) => json_response(200, playlist_json(p, p.description.clone())),
                None => not_found(),
            },
            ("GET", ["playlists", id, "tracks"]) => {
                let Some(p) = state.playlists.iter().find(|p| p.id == *id) else {
                    return not_found();
                };
                let total = p.tracks.len();
                let (start, end, limit) = page_bounds(&query, "offset", state.page_size, total);
                let items: Vec<Value> = p.tracks[start..end]
                    .iter()
                    .map(|(track_id, artist_id)| {
                        if track_id.is_empty() {
                            json!({"track": null})
                        } else {
                            json!({"track": {
                                "id": track_id,
                                "name": format!("Track {track_id}"),
                                "artists": [
                                    {"id": artist_id, "name": format!("Artist {artist_id}")},
                                    {"id": "featured", "name": "Featured Artist"},
                                ],
                            }})
                        }
                    })
                    .collect();
                let next = (end < total)
                    .then(|| format!("{BASE}/playlists/{id}/tracks?offset={end}&limit={limit}"));
                json_response(200, json!({"items": items, "next": next, "total": total}))
            }
            ("POST", ["users", owner, "playlists"]) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                let id = format!("pl{}", state.next_id);
                state.next_id += 1;
                let playlist = StoredPlaylist {
                    id,
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    owner: owner.to_string(),
                    description: html_escape(body["description"].as_str().unwrap_or_default()),
                    tracks: Vec::new(),
                };
                let response = playlist_json(&playlist, playlist.description.clone());
                state.playlists.push(playlist);
                json_response(201, response)
            }
            ("PUT", ["playlists", id]) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                match state.playlists.iter_mut().find(|p| p.id == *id) {
                    Some(p) => {
                        p.description = html_escape(body["description"].as_str().unwrap_or_default());
                        ApiResponse::new(200, "")
                    }
                    None => not_found(),
                }
            }
            ("DELETE", ["playlists", id, "followers"]) => {
                match state.playlists.iter().position(|p| p.id == *id) {
                    Some(pos) if state.playlists[pos].owner == OWNER => {
                        state.playlists.remove(pos);
                        ApiResponse::new(200, "")
                    }
                    Some(_) => json_response(403, json!({"error": "forbidden"})),
                    None => not_found(),
                }
            }
            _ => not_found(),
        }
    }
}

#[async_trait]
impl Transport for FakeSpotify {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut state = self.state.lock().unwrap();
        Ok(Self::handle(&mut state, request))
    }
}

/// Client over the fake with 429 handling, millisecond retry units and no
/// courtesy delays.
pub fn client(fake: &Arc<FakeSpotify>) -> SpotifyClient {
    client_with_capacity(fake, 40)
}

pub fn client_with_capacity(fake: &Arc<FakeSpotify>, slot_capacity: usize) -> SpotifyClient {
    client_with_settings(
        fake,
        StoreSettings {
            slot_capacity,
            ..StoreSettings::without_delays()
        },
    )
}

pub fn client_with_settings(fake: &Arc<FakeSpotify>, settings: StoreSettings) -> SpotifyClient {
    SpotifyClient::new(
        Arc::new(RateLimited::with_unit(fake.clone(), Duration::from_millis(1))),
        settings,
    )
}
