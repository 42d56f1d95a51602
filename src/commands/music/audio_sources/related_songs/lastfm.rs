//! Implements `RecommendationService` on top of the Last.fm `track.getsimilar` method.
//! Requires an API key (`LASTFM_API_KEY`).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serenity::async_trait;
use tracing::debug;

use super::{RecommendationCandidate, RecommendationService, RelatedSongsResult};
use crate::commands::music::utils::music_manager::MusicError;

/// Default Last.fm API host.
pub const LASTFM_BASE_URL: &str = "https://ws.audioscrobbler.com";

/// Top-level shape of a successful `track.getsimilar` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarTracksResponse {
    pub similartracks: SimilarTracks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarTracks {
    #[serde(default)]
    pub track: Vec<SimilarTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarTrack {
    pub name: String,
    pub artist: SimilarArtist,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarArtist {
    pub name: String,
}

/// Error body Last.fm returns with HTTP 200 for failed calls.
#[derive(Debug, Deserialize)]
struct LastFmError {
    error: u32,
    message: String,
}

/// Last.fm client for similar-track lookups.
#[derive(Debug, Clone)]
pub struct LastFmClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    limit: usize,
}

impl LastFmClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            limit: 10,
        }
    }

    /// Maximum number of candidates requested per lookup.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl RecommendationService for LastFmClient {
    async fn similar(&self, artist: &str, title: &str) -> RelatedSongsResult {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MusicError::ConfigError("LASTFM_API_KEY is not set".to_string()))?;

        let url = format!("{}/2.0/", self.base_url.trim_end_matches('/'));
        let limit = self.limit.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("method", "track.getsimilar"),
                ("artist", artist),
                ("track", title),
                ("autocorrect", "1"),
                ("limit", limit.as_str()),
                ("api_key", api_key),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MusicError::ExternalApiError(format!("Last.fm request failed: {}", e)))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MusicError::ExternalApiError(format!("Last.fm response unreadable: {}", e)))?;

        if let Ok(err) = serde_json::from_value::<LastFmError>(body.clone()) {
            return Err(MusicError::ExternalApiError(format!(
                "Last.fm error {}: {}",
                err.error, err.message
            )));
        }

        let parsed: SimilarTracksResponse = serde_json::from_value(body).map_err(|e| {
            MusicError::ExternalApiError(format!("Unexpected Last.fm response: {}", e))
        })?;

        let candidates: Vec<RecommendationCandidate> = parsed
            .similartracks
            .track
            .into_iter()
            .take(self.limit)
            .map(|t| RecommendationCandidate::new(t.artist.name, t.name))
            .collect();

        debug!(
            "Last.fm suggested {} tracks similar to '{} - {}'",
            candidates.len(),
            artist,
            title
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, key: Option<&str>) -> LastFmClient {
        LastFmClient::new(Client::new(), server.uri(), key.map(String::from))
    }

    #[tokio::test]
    async fn returns_candidates_in_response_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2.0/"))
            .and(query_param("method", "track.getsimilar"))
            .and(query_param("artist", "Daft Punk"))
            .and(query_param("track", "One More Time"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "similartracks": {
                    "track": [
                        {"name": "Music Sounds Better With You", "artist": {"name": "Stardust"}},
                        {"name": "Lady", "artist": {"name": "Modjo"}}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let candidates = client(&server, Some("secret"))
            .similar("Daft Punk", "One More Time")
            .await
            .unwrap();

        assert_eq!(
            candidates,
            vec![
                RecommendationCandidate::new("Stardust", "Music Sounds Better With You"),
                RecommendationCandidate::new("Modjo", "Lady"),
            ]
        );
        assert_eq!(candidates[1].search_query(), "Modjo Lady");
    }

    #[tokio::test]
    async fn truncates_to_limit() {
        let server = MockServer::start().await;
        let tracks: Vec<_> = (0..15)
            .map(|i| json!({"name": format!("Song {}", i), "artist": {"name": "A"}}))
            .collect();

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"similartracks": {"track": tracks}})),
            )
            .mount(&server)
            .await;

        let candidates = client(&server, Some("k"))
            .with_limit(10)
            .similar("A", "B")
            .await
            .unwrap();
        assert_eq!(candidates.len(), 10);
        assert_eq!(candidates[0].name, "Song 0");
    }

    #[tokio::test]
    async fn limit_is_sent_to_last_fm() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("limit", "3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"similartracks": {"track": []}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let candidates = client(&server, Some("k"))
            .with_limit(3)
            .similar("A", "B")
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn api_error_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": 6, "message": "Track not found"})),
            )
            .mount(&server)
            .await;

        let result = client(&server, Some("k")).similar("x", "y").await;
        assert_matches!(result, Err(MusicError::ExternalApiError(msg)) if msg.contains("Track not found"));
    }

    #[tokio::test]
    async fn http_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client(&server, Some("k")).similar("x", "y").await;
        assert_matches!(result, Err(MusicError::ExternalApiError(_)));
    }

    #[tokio::test]
    async fn unexpected_shape_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tracks": []})))
            .mount(&server)
            .await;

        let result = client(&server, Some("k")).similar("x", "y").await;
        assert_matches!(result, Err(MusicError::ExternalApiError(_)));
    }

    #[tokio::test]
    async fn missing_api_key_never_calls_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client(&server, None).similar("x", "y").await;
        assert_matches!(result, Err(MusicError::ConfigError(_)));
    }
}
