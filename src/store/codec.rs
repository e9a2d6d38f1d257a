//! Turning the category document into text and back.
//!
//! Decoding is lenient: Spotify HTML-escapes some characters in playlist
//! descriptions, and a partially written document may carry trailing junk.
//! [`decode`] undoes the escaping, tries a strict parse, then falls back to
//! the first balanced `{...}` span before giving up with
//! [`LoadOutcome::Corrupted`].

use tracing::warn;

use crate::{error::Result, store::LoadOutcome, types::CategoryMap};

/// Entity replacements applied in order. `&amp;` comes last so that an
/// escaped entity such as `&amp;quot;` decodes to the literal `&quot;`.
const ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&#x2F;", "/"),
    ("&#47;", "/"),
    ("&amp;", "&"),
];

/// Serializes the mapping into the compact JSON text that gets chunked.
pub fn encode(map: &CategoryMap) -> Result<String> {
    Ok(serde_json::to_string(map)?)
}

/// Reverses the HTML entity escaping Spotify applies to descriptions.
pub fn unescape_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

/// The span from the first `{` to the brace that brings the depth back to zero.
///
/// Braces inside JSON strings are counted like any other brace.
pub fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;

    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Rebuilds the mapping from the concatenated slot texts.
pub fn decode(raw: &str) -> LoadOutcome {
    if raw.trim().is_empty() {
        return LoadOutcome::Loaded(CategoryMap::new());
    }

    let text = unescape_entities(raw);
    let parse_error = match serde_json::from_str::<CategoryMap>(&text) {
        Ok(map) => return LoadOutcome::Loaded(map),
        Err(e) => e,
    };

    let Some(span) = balanced_span(&text) else {
        warn!("category document is corrupted and has no object to recover: {}", parse_error);
        return LoadOutcome::Corrupted;
    };

    match serde_json::from_str::<CategoryMap>(span) {
        Ok(map) => {
            warn!(
                "category document was corrupted ({}); recovered {} of {} characters",
                parse_error,
                span.chars().count(),
                text.chars().count()
            );
            LoadOutcome::Loaded(map)
        }
        Err(e) => {
            warn!("category document is corrupted beyond recovery: {}", e);
            LoadOutcome::Corrupted
        }
    }
}
