//! Implements the `TrackSearch` trait using the `yt-dlp` command-line tool.
//! Free-text queries go through the `yt-dlp` search extractors; URLs (videos,
//! playlists, SoundCloud sets) are resolved as-is.

use serde_json::Value;
use serenity::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{AudioSource, AudioSourceResult, Requester, SearchSource, TrackMetadata, TrackSearch};
use crate::commands::music::utils::music_manager::MusicError;

/// Upper bound on entries read from a single playlist URL.
const MAX_PLAYLIST_ENTRIES: usize = 100;

/// Implements `TrackSearch` by shelling out to `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpSearch {
    binary: String,
    results_per_query: usize,
}

impl Default for YtDlpSearch {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlpSearch {
    /// Creates a search backend invoking the given `yt-dlp` executable.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            results_per_query: 1,
        }
    }

    /// Number of results requested for free-text searches.
    pub fn with_results_per_query(mut self, results: usize) -> Self {
        self.results_per_query = results.max(1);
        self
    }

    /// Builds the `yt-dlp` arguments for a query.
    fn args(&self, query: &str, source: SearchSource) -> Vec<String> {
        let (target, limit) = if AudioSource::is_url(query) {
            (query.to_string(), MAX_PLAYLIST_ENTRIES)
        } else {
            (
                source.search_target(query, self.results_per_query),
                self.results_per_query,
            )
        };

        vec![
            "-j".to_string(),          // Output metadata as JSON lines
            "--flat-playlist".to_string(), // Don't resolve every entry
            "--no-warnings".to_string(),
            "--playlist-end".to_string(),
            limit.to_string(),
            target,
        ]
    }
}

#[async_trait]
impl TrackSearch for YtDlpSearch {
    async fn search(
        &self,
        query: &str,
        source: SearchSource,
        requester: &Requester,
    ) -> AudioSourceResult<Vec<TrackMetadata>> {
        info!("Searching {} for: {}", source, query);

        let output = Command::new(&self.binary)
            .args(self.args(query, source))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MusicError::AudioSourceError(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MusicError::AudioSourceError(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tracks = parse_ytdlp_lines(&stdout, requester);
        debug!("yt-dlp returned {} tracks for '{}'", tracks.len(), query);

        Ok(tracks)
    }
}

/// Parses `yt-dlp -j` output (one JSON object per line) into tracks.
/// Lines that are not JSON or carry no usable URL are skipped.
pub fn parse_ytdlp_lines(stdout: &str, requester: &Requester) -> Vec<TrackMetadata> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(json) => track_from_json(&json),
            Err(e) => {
                warn!("Skipping malformed yt-dlp output line: {}", e);
                None
            }
        })
        .map(|track| track.requested_by(requester.clone()))
        .collect()
}

/// Converts one `yt-dlp` JSON object into `TrackMetadata`.
///
/// Handles both full extractions (`webpage_url`, `thumbnail`) and flat playlist
/// entries (`url`, `thumbnails`).
pub fn track_from_json(json: &Value) -> Option<TrackMetadata> {
    let url = json["webpage_url"]
        .as_str()
        .or_else(|| json["url"].as_str())
        .filter(|u| AudioSource::is_url(u))?
        .to_string();

    let title = json["title"].as_str().unwrap_or("Unknown Title").to_string();

    let author = ["artist", "channel", "uploader"]
        .iter()
        .find_map(|key| json[*key].as_str())
        .unwrap_or("Unknown Artist")
        .to_string();

    let is_stream = json["is_live"].as_bool().unwrap_or(false)
        || json["live_status"].as_str() == Some("is_live");

    let duration = if is_stream {
        None
    } else {
        json["duration"]
            .as_f64()
            .filter(|secs| *secs > 0.0)
            .map(Duration::from_secs_f64)
    };

    let thumbnail = json["thumbnail"]
        .as_str()
        .or_else(|| {
            json["thumbnails"]
                .as_array()
                .and_then(|thumbs| thumbs.last())
                .and_then(|thumb| thumb["url"].as_str())
        })
        .map(|s| s.to_string());

    Some(TrackMetadata {
        title,
        author,
        url: Some(url),
        duration,
        is_stream,
        thumbnail,
        ..Default::default()
    })
}
