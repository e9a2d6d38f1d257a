//! Cursor-following collection of paginated listings.
//!
//! Most Spotify listings put `items` and `next` on the response root. The
//! followed-artists listing wraps both in an `artists` object instead. A
//! [`PageLayout`] says where the page envelope lives; an extractor turns the
//! envelope into items. Both shapes share [`collect_pages`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;

use crate::{
    error::{Error, Result},
    spotify::transport::{ApiRequest, Transport},
};

/// Where a page's `items` and `next` fields live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// `{"items": [...], "next": "..."}`
    Root,
    /// `{"<key>": {"items": [...], "next": "..."}}`
    Nested(&'static str),
}

impl PageLayout {
    /// The object holding `items` and `next`.
    pub fn envelope<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        match self {
            Self::Root => Some(body),
            Self::Nested(key) => body.get(*key),
        }
    }

    /// URL of the following page, if any.
    pub fn next_url(&self, body: &Value) -> Option<String> {
        self.envelope(body)?
            .get("next")?
            .as_str()
            .filter(|next| !next.is_empty())
            .map(str::to_string)
    }
}

/// Deserializes the envelope's `items` array into `T`.
///
/// A missing or null `items` yields an empty page.
pub fn items<T: DeserializeOwned>(envelope: &Value) -> Result<Vec<T>> {
    match envelope.get("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => Ok(serde_json::from_value(items.clone())?),
    }
}

/// Fetches `first` and every page after it, concatenating the extracted items.
///
/// `delay` is slept between pages, never before the first one. A non-success
/// page aborts the walk with [`Error::Remote`].
pub async fn collect_pages<T, I, F>(
    transport: &T,
    first: ApiRequest,
    layout: PageLayout,
    delay: Duration,
    mut extract: F,
) -> Result<Vec<I>>
where
    T: Transport + ?Sized,
    F: FnMut(&Value) -> Result<Vec<I>>,
{
    let mut collected = Vec::new();
    let mut request = first;
    let mut pages = 0usize;

    loop {
        let response = transport.send(&request).await?.error_for_status(&request)?;
        let body: Value = response.json()?;
        pages += 1;

        let envelope = layout
            .envelope(&body)
            .ok_or_else(|| Error::UnexpectedResponse {
                url: request.url.clone(),
                message: format!("missing page envelope {:?}", layout),
            })?;
        collected.extend(extract(envelope)?);

        match layout.next_url(&body) {
            Some(next) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                request = ApiRequest::get(next);
            }
            None => break,
        }
    }

    debug!("collected {} items over {} pages", collected.len(), pages);
    Ok(collected)
}
