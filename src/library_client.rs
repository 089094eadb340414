// HTTP client for the user's music library
//
// The backend is tolerant about shape: some deployments return a bare
// array of songs, others wrap it as { "songs": [...] }. Anything else is
// treated as an empty library. A non-2xx response is a real failure: when
// a fetch was requested, the turn must not silently run without it.

use std::time::Duration;

use serde_json::Value;

use crate::agent::types::LibraryTrack;
use crate::error::{AgentError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 15;

pub struct LibraryClient {
    base_url: String,
    client: reqwest::Client,
}

impl LibraryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Fetch the user's library tracks.
    ///
    /// `user_id` is appended as a query parameter when present; a token is
    /// passed through as a bearer Authorization header.
    pub async fn fetch(
        &self,
        user_id: Option<&str>,
        auth_token: Option<&str>,
    ) -> Result<Vec<LibraryTrack>> {
        let mut request = self.client.get(&self.base_url);
        if let Some(user_id) = user_id {
            request = request.query(&[("userId", user_id)]);
        }
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::LibraryFetch {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        Ok(parse_library_response(data))
    }
}

/// Accepts a bare array or a `{songs: [...]}` wrapper; anything else is empty.
pub(crate) fn parse_library_response(data: Value) -> Vec<LibraryTrack> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("songs") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_array() {
        let tracks = parse_library_response(json!([
            { "id": 1, "title": "Ye", "artist": "Burna Boy" },
            { "id": 2, "title": "Essence", "artist": "WizKid" }
        ]));
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].title.as_deref(), Some("Essence"));
    }

    #[test]
    fn parses_songs_wrapper() {
        let tracks = parse_library_response(json!({
            "songs": [{ "trackId": "t-9", "title": "Joy", "artist": "Ada" }]
        }));
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].identifier(), Some("t-9".to_string()));
    }

    #[test]
    fn other_shapes_yield_empty_library() {
        assert!(parse_library_response(json!({ "tracks": [] })).is_empty());
        assert!(parse_library_response(json!("nope")).is_empty());
        assert!(parse_library_response(json!(42)).is_empty());
    }

    #[test]
    fn non_object_entries_are_dropped() {
        let tracks = parse_library_response(json!([
            { "title": "Kept", "artist": "A" },
            "not a track",
            null
        ]));
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title.as_deref(), Some("Kept"));
    }
}
