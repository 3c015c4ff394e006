use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::TrackListSource;

const DEFAULT_BASE_URL: &str = "https://musicbrainz.org";

/// MusicBrainz asks API consumers to identify themselves.
const USER_AGENT: &str = concat!("spindle/", env!("CARGO_PKG_VERSION"));

/// MusicBrainz release lookup client.
///
/// Queries the release endpoint with recordings included and returns the
/// first medium's track titles in release order.
#[derive(Debug, Clone)]
pub struct MusicBrainzClient {
    http: reqwest::Client,
    base_url: String,
}

impl MusicBrainzClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Override the endpoint, mainly for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn request_release(&self, mbid: &str) -> Result<Release> {
        let url = format!(
            "{}/ws/2/release/{}?inc=recordings&fmt=json",
            self.base_url, mbid
        );

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .context("release request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("unexpected status {}", response.status()));
        }

        response
            .json::<Release>()
            .await
            .context("release payload did not parse")
    }
}

impl Default for MusicBrainzClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    media: Vec<Medium>,
}

#[derive(Debug, Deserialize)]
struct Medium {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    title: String,
}

#[async_trait]
impl TrackListSource for MusicBrainzClient {
    async fn fetch_track_list(&self, mbid: &str) -> Vec<String> {
        match self.request_release(mbid).await {
            Ok(release) => release
                .media
                .into_iter()
                .next()
                .map(|medium| medium.tracks.into_iter().map(|t| t.title).collect())
                .unwrap_or_default(),
            Err(e) => {
                tracing::error!(mbid, error = %e, "tracklist lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_yields_an_empty_tracklist() {
        // Port 1 is essentially guaranteed to refuse connections.
        let client = MusicBrainzClient::with_base_url("http://127.0.0.1:1");
        let tracks = client.fetch_track_list("some-mbid").await;
        assert!(tracks.is_empty());
    }

    #[test]
    fn release_payload_parses_track_titles_in_order() {
        let payload = serde_json::json!({
            "media": [
                {
                    "tracks": [
                        { "title": "Come Together" },
                        { "title": "Something" }
                    ]
                },
                {
                    "tracks": [ { "title": "Bonus" } ]
                }
            ]
        });

        let release: Release = serde_json::from_value(payload).unwrap();
        let titles: Vec<String> = release
            .media
            .into_iter()
            .next()
            .map(|m| m.tracks.into_iter().map(|t| t.title).collect())
            .unwrap_or_default();

        assert_eq!(titles, vec!["Come Together".to_string(), "Something".to_string()]);
    }
}
