//! This module defines the trait and implementations for fetching songs related
//! to a given track, used by the autoplay feature.

/// Implementation using the Last.fm `track.getsimilar` API.
pub mod lastfm;

use crate::commands::music::utils::music_manager::MusicError;
use serenity::async_trait;

/// A specialized `Result` type for related song lookups.
pub type RelatedSongsResult = Result<Vec<RecommendationCandidate>, MusicError>;

/// A track suggested by a recommendation service. Not playable by itself; it
/// must be resolved through a `TrackSearch` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCandidate {
    pub artist: String,
    pub name: String,
}

impl RecommendationCandidate {
    pub fn new(artist: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            name: name.into(),
        }
    }

    /// The free-text query used to find this candidate.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.artist, self.name)
    }
}

/// Defines the common interface for looking up tracks similar to a given one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Returns candidates similar to `title` by `artist`, most similar first.
    async fn similar(&self, artist: &str, title: &str) -> RelatedSongsResult;
}
