use crate::{config::AuthSettings, error, management::TokenManager, spotify, success};

pub async fn auth() {
    let settings = match AuthSettings::from_env() {
        Ok(s) => s,
        Err(e) => error!("Cannot start authentication. Err: {}", e),
    };

    let token = match spotify::auth::authorize(&settings).await {
        Ok(t) => t,
        Err(e) => error!("Authentication failed. Err: {}", e),
    };

    if let Err(e) = TokenManager::new(token).persist().await {
        error!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
}
