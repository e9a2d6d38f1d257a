use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::{
    sync::{Mutex, oneshot},
    time::timeout,
};
use tracing::debug;

use crate::{
    config::AuthSettings,
    error::{Error, Result},
    server::{CallbackState, start_callback_server},
    types::Token,
    warning,
};

/// How long the user gets to approve access in the browser.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Runs the OAuth 2.0 PKCE flow and returns the exchanged token.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for `/callback` to exchange the code, up to two minutes
pub async fn authorize(settings: &AuthSettings) -> Result<Token> {
    let code_verifier = generate_code_verifier();
    let code_challenge = generate_code_challenge(&code_verifier);

    let (tx, rx) = oneshot::channel();
    let state = Arc::new(CallbackState {
        settings: settings.clone(),
        code_verifier,
        sender: Mutex::new(Some(tx)),
    });
    let server = start_callback_server(&settings.server_addr, state).await?;

    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = settings.auth_url,
        client_id = settings.client_id,
        redirect_uri = settings.redirect_uri,
        code_challenge = code_challenge,
        scope = settings.scope.replace(' ', "%20"),
    );

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let outcome = timeout(AUTH_TIMEOUT, rx).await;
    server.abort();

    match outcome {
        Ok(Ok(token)) => token,
        Ok(Err(_)) => Err(Error::Auth("callback server stopped early".to_string())),
        Err(_) => Err(Error::Auth("authorization timed out".to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Result<Token> {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_string))
            .ok_or_else(|| Error::Auth("token response carries no refresh token".to_string()))?;

        Ok(Token {
            access_token: self.access_token,
            refresh_token,
            scope: self.scope,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }
}

async fn post_token_form(settings: &AuthSettings, form: &[(&str, &str)]) -> Result<TokenResponse> {
    let response = Client::new()
        .post(&settings.token_url)
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::Auth(format!(
            "token endpoint answered {}: {}",
            status, body
        )));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Exchanges the authorization code for a token, proving possession of the verifier.
pub async fn exchange_code_pkce(settings: &AuthSettings, code: &str, verifier: &str) -> Result<Token> {
    let response = post_token_form(
        settings,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", &settings.client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", &settings.redirect_uri),
        ],
    )
    .await?;
    debug!("exchanged authorization code for a token");
    response.into_token(None)
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; the old one is kept when
/// the response omits it.
pub async fn refresh_token(settings: &AuthSettings, refresh_token: &str) -> Result<Token> {
    let response = post_token_form(
        settings,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &settings.client_id),
        ],
    )
    .await?;
    debug!("refreshed access token");
    response.into_token(Some(refresh_token))
}
