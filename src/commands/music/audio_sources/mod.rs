//! This module defines the traits for finding playable tracks.
//! It includes the `yt-dlp` backed search used by `/play` and autoplay,
//! and the recommendation lookup used by autoplay.

/// Submodule for finding tracks similar to a given one, used by autoplay.
pub mod related_songs;
/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub mod track_metadata;
/// Submodule implementing `TrackSearch` on top of `yt-dlp`.
pub mod youtube;

use crate::commands::music::utils::music_manager::MusicError;
use serenity::async_trait;
use std::fmt;
use std::str::FromStr;
use url::Url;

pub use track_metadata::{Provenance, Requester, TrackMetadata};

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// The catalog a free-text query is searched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSource {
    #[default]
    YouTube,
    YouTubeMusic,
    SoundCloud,
}

impl SearchSource {
    /// Builds the `yt-dlp` target for a free-text query.
    pub fn search_target(&self, query: &str, results: usize) -> String {
        match self {
            SearchSource::YouTube => format!("ytsearch{}:{}", results, query),
            SearchSource::SoundCloud => format!("scsearch{}:{}", results, query),
            SearchSource::YouTubeMusic => {
                let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
                format!("https://music.youtube.com/search?q={}#songs", encoded)
            }
        }
    }
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchSource::YouTube => "youtube",
            SearchSource::YouTubeMusic => "youtubemusic",
            SearchSource::SoundCloud => "soundcloud",
        };
        f.write_str(name)
    }
}

impl FromStr for SearchSource {
    type Err = MusicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" | "yt" => Ok(SearchSource::YouTube),
            "youtubemusic" | "ytmusic" | "ytm" => Ok(SearchSource::YouTubeMusic),
            "soundcloud" | "sc" => Ok(SearchSource::SoundCloud),
            other => Err(MusicError::ConfigError(format!(
                "Unknown search source: {}",
                other
            ))),
        }
    }
}

/// Resolves queries and URLs into playable tracks.
///
/// Requires `Send + Sync` so a single instance can be shared by every command
/// handler and by the autoplay pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Searches `source` for `query`, or resolves `query` directly when it is a URL.
    ///
    /// Every returned track is attributed to `requester`.
    async fn search(
        &self,
        query: &str,
        source: SearchSource,
        requester: &Requester,
    ) -> AudioSourceResult<Vec<TrackMetadata>>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as an http(s) URL.
    /// Does not validate if the URL is actually reachable or supported by any backend.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("youtube", SearchSource::YouTube)]
    #[test_case(" YTM ", SearchSource::YouTubeMusic)]
    #[test_case("SoundCloud", SearchSource::SoundCloud)]
    fn parses_search_source(input: &str, expected: SearchSource) {
        assert_eq!(input.parse::<SearchSource>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_search_source() {
        assert!("bandcamp".parse::<SearchSource>().is_err());
    }

    #[test]
    fn builds_search_targets() {
        assert_eq!(
            SearchSource::YouTube.search_target("daft punk", 1),
            "ytsearch1:daft punk"
        );
        assert_eq!(
            SearchSource::SoundCloud.search_target("daft punk", 3),
            "scsearch3:daft punk"
        );
        assert_eq!(
            SearchSource::YouTubeMusic.search_target("daft punk & co", 1),
            "https://music.youtube.com/search?q=daft+punk+%26+co#songs"
        );
    }

    #[test_case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", true)]
    #[test_case("http://soundcloud.com/artist/track", true)]
    #[test_case("never gonna give you up", false)]
    #[test_case("mailto:someone@example.com", false)]
    fn detects_urls(input: &str, expected: bool) {
        assert_eq!(AudioSource::is_url(input), expected);
    }
}
