//! Autoplay: when the queue runs dry, look up tracks similar to the one that
//! just finished and queue them, falling back to the artist's popular songs.
//!
//! Failures never surface to the caller. A failed lookup or search counts as
//! no results, and a failed enqueue ends the run.

use futures::future::join_all;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::queue_manager::PlaybackQueue;
use crate::commands::music::audio_sources::related_songs::{
    RecommendationCandidate, RecommendationService,
};
use crate::commands::music::audio_sources::{Requester, SearchSource, TrackMetadata, TrackSearch};

/// Matches "lyric" and "lyrics" anywhere in a title, any case.
static LYRIC_VIDEO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)lyric").unwrap());

/// Whether a title looks like a lyric-video upload rather than the track itself.
pub fn is_lyric_video(title: &str) -> bool {
    LYRIC_VIDEO.is_match(title)
}

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    /// Catalog searched for candidates and for the fallback.
    pub source: SearchSource,
    /// Identity autoplay searches are made on behalf of.
    pub requester: Requester,
    /// Recommendation candidates searched per run.
    pub candidate_limit: usize,
    /// Tracks queued from recommendations.
    pub primary_limit: usize,
    /// Tracks queued from the fallback search.
    pub fallback_limit: usize,
    /// Optional bound on each individual search.
    pub search_timeout: Option<Duration>,
}

impl AutoplayConfig {
    pub fn new(requester: Requester) -> Self {
        Self {
            source: SearchSource::default(),
            requester,
            candidate_limit: 10,
            primary_limit: 10,
            fallback_limit: 3,
            search_timeout: None,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayOutcome {
    /// Autoplay disabled or nothing to base recommendations on.
    Skipped,
    /// Queued this many recommended tracks.
    Recommended(usize),
    /// Queued this many tracks from the fallback search.
    Fallback(usize),
    /// Nothing usable was found, or it could not be queued.
    Exhausted,
}

pub struct AutoplayPipeline {
    search: Arc<dyn TrackSearch>,
    recommendations: Arc<dyn RecommendationService>,
    config: AutoplayConfig,
}

impl AutoplayPipeline {
    pub fn new(
        search: Arc<dyn TrackSearch>,
        recommendations: Arc<dyn RecommendationService>,
        config: AutoplayConfig,
    ) -> Self {
        Self {
            search,
            recommendations,
            config,
        }
    }

    pub fn config(&self) -> &AutoplayConfig {
        &self.config
    }

    /// Queues follow-up tracks for `last_track` if autoplay is `enabled`.
    pub async fn run(
        &self,
        queue: &dyn PlaybackQueue,
        last_track: Option<&TrackMetadata>,
        enabled: bool,
    ) -> AutoplayOutcome {
        let Some(last_track) = last_track.filter(|_| enabled) else {
            return AutoplayOutcome::Skipped;
        };

        info!(
            "Autoplay looking for tracks after '{} - {}'",
            last_track.author, last_track.title
        );

        let recommended = self.recommended_tracks(last_track).await;
        if !recommended.is_empty() {
            return match Self::enqueue_and_play(queue, recommended).await {
                Some(count) => AutoplayOutcome::Recommended(count),
                None => AutoplayOutcome::Exhausted,
            };
        }

        debug!("No usable recommendations, trying fallback search");
        let fallback = self.fallback_tracks(last_track).await;
        if fallback.is_empty() {
            info!("Autoplay found nothing to queue");
            return AutoplayOutcome::Exhausted;
        }

        match Self::enqueue_and_play(queue, fallback).await {
            Some(count) => AutoplayOutcome::Fallback(count),
            None => AutoplayOutcome::Exhausted,
        }
    }

    /// Primary path: resolve recommendation candidates into tracks.
    async fn recommended_tracks(&self, last_track: &TrackMetadata) -> Vec<TrackMetadata> {
        let candidates = match self
            .recommendations
            .similar(&last_track.author, &last_track.title)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Recommendation lookup failed: {}", e);
                Vec::new()
            }
        };

        // join_all yields results in candidate order regardless of completion order.
        let searches = candidates
            .iter()
            .take(self.config.candidate_limit)
            .map(|candidate| self.first_result(candidate));
        let found = join_all(searches).await.into_iter().flatten();

        Self::select(found, self.config.primary_limit)
    }

    /// Fallback path: one broad search on the artist.
    async fn fallback_tracks(&self, last_track: &TrackMetadata) -> Vec<TrackMetadata> {
        let query = format!("{} popular songs", last_track.author);
        let found = self.search_all(&query).await;
        Self::select(found, self.config.fallback_limit)
    }

    async fn first_result(&self, candidate: &RecommendationCandidate) -> Option<TrackMetadata> {
        self.search_all(&candidate.search_query()).await.into_iter().next()
    }

    /// Runs a search, mapping failures and timeouts to no results.
    async fn search_all(&self, query: &str) -> Vec<TrackMetadata> {
        let search = self
            .search
            .search(query, self.config.source, &self.config.requester);

        let result = match self.config.search_timeout {
            Some(limit) => match tokio::time::timeout(limit, search).await {
                Ok(result) => result,
                Err(_) => {
                    debug!("Search for '{}' timed out after {:?}", query, limit);
                    return Vec::new();
                }
            },
            None => search.await,
        };

        result.unwrap_or_else(|e| {
            debug!("Search for '{}' failed: {}", query, e);
            Vec::new()
        })
    }

    /// Drops lyric videos, caps the list and tags what is left.
    fn select(found: impl IntoIterator<Item = TrackMetadata>, limit: usize) -> Vec<TrackMetadata> {
        found
            .into_iter()
            .filter(|track| !is_lyric_video(&track.title))
            .take(limit)
            .map(|mut track| {
                track.tag_autoplay();
                track
            })
            .collect()
    }

    /// Queues `tracks` and starts playback if the player sits idle. `upcoming`
    /// excludes the head, so the check uses what was just queued.
    /// Returns `None` when the queue rejected them.
    async fn enqueue_and_play(
        queue: &dyn PlaybackQueue,
        tracks: Vec<TrackMetadata>,
    ) -> Option<usize> {
        let count = match queue.enqueue(tracks).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Autoplay could not queue tracks: {}", e);
                return None;
            }
        };

        if count > 0 && !queue.is_playing().await {
            if let Err(e) = queue.start_playback().await {
                warn!("Autoplay could not start playback: {}", e);
            }
        }

        info!("Autoplay queued {} tracks", count);
        Some(count)
    }
}
