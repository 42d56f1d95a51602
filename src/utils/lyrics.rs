//! Lyrics lookup against the LRCLIB public API.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Default LRCLIB host.
pub const LRCLIB_BASE_URL: &str = "https://lrclib.net";

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Lyrics request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected lyrics response: {0}")]
    Response(String),
}

/// What to look lyrics up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsQuery {
    /// A known track, e.g. the one currently playing.
    Track { artist: String, title: String },
    /// Whatever the user typed.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsBody {
    Plain(String),
    Instrumental,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics {
    pub track_name: String,
    pub artist_name: String,
    pub body: LyricsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrclibRecord {
    track_name: String,
    artist_name: String,
    #[serde(default)]
    instrumental: bool,
    plain_lyrics: Option<String>,
}

impl LrclibRecord {
    fn plain(&self) -> Option<&str> {
        self.plain_lyrics
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct LyricsClient {
    http: Client,
    base_url: String,
}

impl LyricsClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Searches LRCLIB. The first record with plain lyrics wins; if none has
    /// any but one is marked instrumental, that one is returned instead.
    pub async fn search(&self, query: &LyricsQuery) -> Result<Option<Lyrics>, LyricsError> {
        let url = format!("{}/api/search", self.base_url.trim_end_matches('/'));
        let params: Vec<(&str, &str)> = match query {
            LyricsQuery::Track { artist, title } => {
                vec![("artist_name", artist.as_str()), ("track_name", title.as_str())]
            }
            LyricsQuery::Text(text) => vec![("q", text.as_str())],
        };

        let records: Vec<LrclibRecord> = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| LyricsError::Response(e.to_string()))?;

        debug!("LRCLIB returned {} records for {:?}", records.len(), query);

        if let Some(record) = records.iter().find(|r| r.plain().is_some()) {
            return Ok(Some(Lyrics {
                track_name: record.track_name.clone(),
                artist_name: record.artist_name.clone(),
                body: LyricsBody::Plain(record.plain().unwrap_or_default().to_string()),
            }));
        }

        Ok(records
            .into_iter()
            .find(|r| r.instrumental)
            .map(|record| Lyrics {
                track_name: record.track_name,
                artist_name: record.artist_name,
                body: LyricsBody::Instrumental,
            }))
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

    fn record(track: &str, plain: Option<&str>, instrumental: bool) -> serde_json::Value {
        json!({
            "id": 1,
            "trackName": track,
            "artistName": "Artist",
            "albumName": "Album",
            "duration": 200.0,
            "instrumental": instrumental,
            "plainLyrics": plain,
            "syncedLyrics": null
        })
    }

    #[tokio::test]
    async fn track_query_picks_first_record_with_lyrics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("artist_name", "Artist"))
            .and(query_param("track_name", "Song"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record("Song (Live)", Some("   "), false),
                record("Song", Some("line one\nline two\n"), false),
                record("Song (Remix)", Some("other"), false),
            ])))
            .mount(&server)
            .await;

        let lyrics = LyricsClient::new(Client::new(), server.uri())
            .search(&LyricsQuery::Track {
                artist: "Artist".into(),
                title: "Song".into(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(lyrics.track_name, "Song");
        assert_eq!(lyrics.body, LyricsBody::Plain("line one\nline two".into()));
    }

    #[tokio::test]
    async fn instrumental_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "interlude"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([record("Interlude", None, true)])),
            )
            .mount(&server)
            .await;

        let lyrics = LyricsClient::new(Client::new(), server.uri())
            .search(&LyricsQuery::Text("interlude".into()))
            .await
            .unwrap();

        assert_matches!(lyrics, Some(Lyrics { body: LyricsBody::Instrumental, .. }));
    }

    #[tokio::test]
    async fn no_records_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let lyrics = LyricsClient::new(Client::new(), server.uri())
            .search(&LyricsQuery::Text("nothing".into()))
            .await
            .unwrap();
        assert_eq!(lyrics, None);
    }

    #[tokio::test]
    async fn server_errors_surface() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = LyricsClient::new(Client::new(), server.uri())
            .search(&LyricsQuery::Text("x".into()))
            .await;
        assert_matches!(result, Err(LyricsError::Request(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = LyricsClient::new(Client::new(), server.uri())
            .search(&LyricsQuery::Text("x".into()))
            .await;
        assert_matches!(result, Err(LyricsError::Response(_)));
    }
}
