// YouTube video lookup
//
// Best-effort enrichment: the resolver queries one video per track and
// tolerates any failure, so this client never gets to fail a turn.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AgentError, Result};

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One-method abstraction over video lookup, stubbed in resolver tests.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Return the watch URL of the first video hit for `query`, if any.
    async fn search_first_video(&self, query: &str) -> Result<Option<String>>;
}

/// YouTube Data API v3 search client.
pub struct YoutubeClient {
    api_key: String,
    client: Client,
}

impl YoutubeClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { api_key, client }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// First hit's watch URL from a search response body.
fn watch_url_from_response(body: &str) -> Option<String> {
    let response: SearchResponse = serde_json::from_str(body).ok()?;
    response
        .items
        .into_iter()
        .find_map(|item| item.id.video_id)
        .map(|id| format!("https://www.youtube.com/watch?v={id}"))
}

#[async_trait]
impl VideoSearch for YoutubeClient {
    async fn search_first_video(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(AgentError::VideoLookup(format!("{status}: {body}")));
        }

        Ok(watch_url_from_response(&body))
    }
}
