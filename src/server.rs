//! Local HTTP server receiving the OAuth redirect.
//!
//! It lives only for the duration of `sporlcat auth`: `/callback` exchanges
//! the authorization code and hands the token to the waiting flow through a
//! oneshot channel, `/health` answers liveness probes.

use std::{collections::HashMap, net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    extract::Query,
    response::{Html, Json},
    routing::get,
};
use serde_json::{Value, json};
use tokio::{
    sync::{Mutex, oneshot},
    task::JoinHandle,
};

use crate::{
    config::AuthSettings,
    error::{Error, Result},
    spotify::auth::exchange_code_pkce,
    types::Token,
    warning,
};

pub struct CallbackState {
    pub settings: AuthSettings,
    pub code_verifier: String,
    /// Taken by the first callback that completes an exchange.
    pub sender: Mutex<Option<oneshot::Sender<Result<Token>>>>,
}

/// Binds `addr` and serves the callback routes on a background task.
pub async fn start_callback_server(addr: &str, state: Arc<CallbackState>) -> Result<JoinHandle<()>> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| Error::Config(format!("invalid SERVER_ADDRESS {addr}: {e}")))?;

    let app = Router::new()
        .route("/health", get(health))
        .route("/callback", get(callback).layer(Extension(state)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        if let Some(err) = params.get("error") {
            warning!("Spotify denied authorization: {}", err);
        }
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut sender = state.sender.lock().await;
    let Some(tx) = sender.take() else {
        return Html("<h4>Authorization already completed.</h4>");
    };

    match exchange_code_pkce(&state.settings, code, &state.code_verifier).await {
        Ok(token) => {
            let _ = tx.send(Ok(token));
            Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            let _ = tx.send(Err(e));
            Html("<h4>Login failed.</h4>")
        }
    }
}
