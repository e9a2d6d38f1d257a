//! Request/response plumbing underneath every Spotify call.
//!
//! [`Transport`] is the seam between the API wrappers and the network:
//! [`HttpTransport`] talks to Spotify through reqwest, and [`RateLimited`]
//! decorates any transport with 429 handling. Statuses other than 429 pass
//! through untouched; turning them into errors is the caller's business.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Total attempts, the first one included, before giving up on a 429.
pub const MAX_ATTEMPTS: u32 = 3;

/// Retry hints above this many units are honoured but reported.
const RETRY_AFTER_WARN_THRESHOLD: u64 = 120;

/// A request relative to the API base URL, or absolute for `next` links.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            url: url.into(),
            body: None,
        }
    }

    pub fn post<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn put<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::PUT,
            url: url.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed `Retry-After` header, in seconds.
    pub retry_after: Option<u64>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_throttled(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS.as_u16()
    }

    /// Turns a non-success status into [`Error::Remote`].
    pub fn error_for_status(self, request: &ApiRequest) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(Error::Remote {
            status: self.status,
            method: request.method.to_string(),
            url: request.url.clone(),
            body: self.body,
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).send(request).await
    }
}

/// reqwest-backed transport authenticated with a bearer token.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.resolve(&request.url);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .bearer_auth(&self.token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await?;

        Ok(ApiResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Retries 429 responses, waiting as long as Spotify asks.
///
/// The wait is `Retry-After × unit`, one unit when the header is missing.
/// After [`MAX_ATTEMPTS`] throttled answers the call fails with
/// [`Error::TransportExhausted`].
pub struct RateLimited<T> {
    inner: T,
    unit: Duration,
}

impl<T: Transport> RateLimited<T> {
    pub fn new(inner: T) -> Self {
        Self::with_unit(inner, Duration::from_secs(1))
    }

    /// Scales retry hints by `unit` instead of one second.
    pub fn with_unit(inner: T, unit: Duration) -> Self {
        Self { inner, unit }
    }
}

#[async_trait]
impl<T: Transport> Transport for RateLimited<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        for attempt in 1..=MAX_ATTEMPTS {
            let response = self.inner.send(request).await?;
            if !response.is_throttled() {
                return Ok(response);
            }
            if attempt == MAX_ATTEMPTS {
                break;
            }

            let retry_after = response.retry_after.unwrap_or(1);
            if retry_after > RETRY_AFTER_WARN_THRESHOLD {
                warn!(
                    "Spotify asks to wait {} units before retrying {} {}",
                    retry_after, request.method, request.url
                );
            } else {
                debug!(
                    "throttled on {} {}, retrying in {} units (attempt {}/{})",
                    request.method, request.url, retry_after, attempt, MAX_ATTEMPTS
                );
            }
            let units = u32::try_from(retry_after).unwrap_or(u32::MAX);
            sleep(self.unit.saturating_mul(units)).await;
        }

        warn!(
            "giving up on {} {} after {} throttled attempts",
            request.method, request.url, MAX_ATTEMPTS
        );
        Err(Error::TransportExhausted {
            method: request.method.to_string(),
            url: request.url.clone(),
            attempts: MAX_ATTEMPTS,
        })
    }
}
