//! Mock implementations of the search and recommendation seams, plus an
//! in-memory playback queue.

use async_trait::async_trait;
use mockall::mock;
use std::sync::Mutex;

use encore::commands::music::audio_sources::related_songs::{
    RecommendationService, RelatedSongsResult,
};
use encore::commands::music::audio_sources::{
    AudioSourceResult, Requester, SearchSource, TrackMetadata, TrackSearch,
};
use encore::commands::music::utils::fair_queue;
use encore::commands::music::utils::music_manager::{MusicError, MusicResult};
use encore::commands::music::utils::queue_manager::PlaybackQueue;

mock! {
    pub Search {}

    #[async_trait]
    impl TrackSearch for Search {
        async fn search(
            &self,
            query: &str,
            source: SearchSource,
            requester: &Requester,
        ) -> AudioSourceResult<Vec<TrackMetadata>>;
    }
}

mock! {
    pub Recommendations {}

    #[async_trait]
    impl RecommendationService for Recommendations {
        async fn similar(&self, artist: &str, title: &str) -> RelatedSongsResult;
    }
}

/// Playback queue kept in memory. The first entry is the playing track.
#[derive(Default)]
pub struct MemoryQueue {
    entries: Mutex<Vec<TrackMetadata>>,
    playing: Mutex<bool>,
    connected: bool,
}

impl MemoryQueue {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A connected queue already playing `current` with `upcoming` behind it.
    pub fn with_tracks(current: TrackMetadata, upcoming: Vec<TrackMetadata>) -> Self {
        let queue = Self::connected();
        {
            let mut entries = queue.entries.lock().unwrap();
            entries.push(current);
            entries.extend(upcoming);
        }
        *queue.playing.lock().unwrap() = true;
        queue
    }

    pub fn current(&self) -> Option<TrackMetadata> {
        self.entries.lock().unwrap().first().cloned()
    }

    pub fn titles(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|track| track.title.clone())
            .collect()
    }
}

#[async_trait]
impl PlaybackQueue for MemoryQueue {
    async fn upcoming(&self) -> Vec<TrackMetadata> {
        self.entries.lock().unwrap().iter().skip(1).cloned().collect()
    }

    async fn enqueue(&self, tracks: Vec<TrackMetadata>) -> MusicResult<usize> {
        if !self.connected {
            return Err(MusicError::NotConnected);
        }
        let count = tracks.len();
        self.entries.lock().unwrap().extend(tracks);
        Ok(count)
    }

    async fn is_playing(&self) -> bool {
        *self.playing.lock().unwrap()
    }

    async fn start_playback(&self) -> MusicResult<()> {
        if self.entries.lock().unwrap().is_empty() {
            return Err(MusicError::QueueError("Nothing to play".to_string()));
        }
        *self.playing.lock().unwrap() = true;
        Ok(())
    }

    async fn apply_fair_order(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        if entries.is_empty() {
            return 0;
        }
        let upcoming = entries.split_off(1);
        let count = upcoming.len();
        entries.extend(fair_queue::reorder(upcoming));
        count
    }
}
