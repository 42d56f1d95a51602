//! The autoplay pipeline driven through its public API against an
//! in-memory queue.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::fixtures::{bot, track_titled};
use common::mocks::{MemoryQueue, MockRecommendations, MockSearch};
use encore::commands::music::audio_sources::related_songs::RecommendationCandidate;
use encore::commands::music::audio_sources::{
    AudioSourceResult, Requester, SearchSource, TrackMetadata, TrackSearch,
};
use encore::commands::music::utils::autoplay::{AutoplayConfig, AutoplayOutcome, AutoplayPipeline};
use encore::commands::music::utils::music_manager::MusicError;
use encore::commands::music::utils::queue_manager::PlaybackQueue;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

fn last_played() -> TrackMetadata {
    TrackMetadata {
        title: "Harvest Moon".to_string(),
        author: "Neil Young".to_string(),
        ..Default::default()
    }
}

fn pipeline(search: MockSearch, recommendations: MockRecommendations) -> AutoplayPipeline {
    let mut config = AutoplayConfig::new(bot());
    config.source = SearchSource::SoundCloud;
    AutoplayPipeline::new(Arc::new(search), Arc::new(recommendations), config)
}

fn resolves_to_itself(search: &mut MockSearch) {
    search
        .expect_search()
        .returning(|query, _, requester| Ok(vec![track_titled(query, requester)]));
}

#[tokio::test]
async fn natural_queue_end_refills_and_starts_playback() {
    common::init_tracing();

    let mut recommendations = MockRecommendations::new();
    recommendations
        .expect_similar()
        .with(eq("Neil Young"), eq("Harvest Moon"))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                RecommendationCandidate::new("Crosby, Stills & Nash", "Helplessly Hoping"),
                RecommendationCandidate::new("America", "A Horse with No Name"),
            ])
        });

    let mut search = MockSearch::new();
    search
        .expect_search()
        .withf(|_, source, requester| *source == SearchSource::SoundCloud && *requester == bot())
        .times(2)
        .returning(|query, _, requester| Ok(vec![track_titled(query, requester)]));

    let queue = MemoryQueue::connected();
    let outcome = pipeline(search, recommendations)
        .run(&queue, Some(&last_played()), true)
        .await;

    assert_eq!(outcome, AutoplayOutcome::Recommended(2));
    assert_eq!(
        queue.titles(),
        vec![
            "Crosby, Stills & Nash Helplessly Hoping",
            "America A Horse with No Name"
        ]
    );
    assert!(queue.current().is_some_and(|track| track.is_autoplay()));
    assert!(queue.current().is_some_and(|track| track.requester_name() == "Autoplay"));
    assert!(queue.is_playing().await);
}

#[tokio::test]
async fn one_recommended_track_still_starts_playback() {
    let mut recommendations = MockRecommendations::new();
    recommendations
        .expect_similar()
        .returning(|_, _| Ok(vec![RecommendationCandidate::new("America", "Daisy Jane")]));
    let mut search = MockSearch::new();
    resolves_to_itself(&mut search);

    let queue = MemoryQueue::connected();
    let outcome = pipeline(search, recommendations)
        .run(&queue, Some(&last_played()), true)
        .await;

    assert_eq!(outcome, AutoplayOutcome::Recommended(1));
    assert!(queue.upcoming().await.is_empty());
    assert!(queue.is_playing().await);
}

#[tokio::test]
async fn fallback_searches_the_artists_popular_songs() {
    let mut recommendations = MockRecommendations::new();
    recommendations
        .expect_similar()
        .returning(|_, _| Err(MusicError::ExternalApiError("Track not found".to_string())));

    let mut search = MockSearch::new();
    search
        .expect_search()
        .withf(|query, _, _| query == "Neil Young popular songs")
        .times(1)
        .returning(|_, _, requester| {
            Ok(["Heart of Gold (Lyrics)", "Old Man", "Heart of Gold", "Harvest", "Ohio"]
                .iter()
                .map(|title| track_titled(title, requester))
                .collect())
        });

    let queue = MemoryQueue::connected();
    let outcome = pipeline(search, recommendations)
        .run(&queue, Some(&last_played()), true)
        .await;

    assert_eq!(outcome, AutoplayOutcome::Fallback(3));
    assert_eq!(queue.titles(), vec!["Old Man", "Heart of Gold", "Harvest"]);
    assert!(queue.is_playing().await);
}

#[tokio::test]
async fn disconnected_queue_is_exhausted() {
    let mut recommendations = MockRecommendations::new();
    recommendations
        .expect_similar()
        .returning(|_, _| Ok(vec![RecommendationCandidate::new("America", "Ventura Highway")]));
    let mut search = MockSearch::new();
    resolves_to_itself(&mut search);

    let queue = MemoryQueue::disconnected();
    let outcome = pipeline(search, recommendations)
        .run(&queue, Some(&last_played()), true)
        .await;

    assert_eq!(outcome, AutoplayOutcome::Exhausted);
    assert!(queue.titles().is_empty());
}

#[test]
fn busy_queue_is_appended_without_restarting() {
    let mut recommendations = MockRecommendations::new();
    recommendations
        .expect_similar()
        .returning(|_, _| Ok(vec![RecommendationCandidate::new("America", "Sister Golden Hair")]));
    let mut search = MockSearch::new();
    resolves_to_itself(&mut search);

    let playing = track_titled("Already Playing", &bot());
    let queue = MemoryQueue::with_tracks(playing.clone(), Vec::new());

    let outcome = tokio_test::block_on(
        pipeline(search, recommendations).run(&queue, Some(&last_played()), true),
    );

    assert_eq!(outcome, AutoplayOutcome::Recommended(1));
    assert_eq!(queue.current(), Some(playing));
    assert_eq!(queue.titles(), vec!["Already Playing", "America Sister Golden Hair"]);
}

/// Resolves one title and never answers for anything else.
struct HangingSearch {
    answers: &'static str,
}

#[async_trait]
impl TrackSearch for HangingSearch {
    async fn search(
        &self,
        query: &str,
        _source: SearchSource,
        requester: &Requester,
    ) -> AudioSourceResult<Vec<TrackMetadata>> {
        if query == self.answers {
            return Ok(vec![track_titled(query, requester)]);
        }
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn hung_searches_do_not_stall_the_pipeline() {
    let mut recommendations = MockRecommendations::new();
    recommendations.expect_similar().returning(|_, _| {
        Ok(vec![
            RecommendationCandidate::new("America", "Lonely People"),
            RecommendationCandidate::new("America", "Tin Man"),
        ])
    });

    let mut config = AutoplayConfig::new(bot());
    config.search_timeout = Some(Duration::from_millis(250));
    let search = HangingSearch {
        answers: "America Tin Man",
    };
    let pipeline = AutoplayPipeline::new(Arc::new(search), Arc::new(recommendations), config);

    let queue = MemoryQueue::connected();
    let outcome = pipeline.run(&queue, Some(&last_played()), true).await;

    assert_eq!(outcome, AutoplayOutcome::Recommended(1));
    assert_eq!(queue.titles(), vec!["America Tin Man"]);
}
