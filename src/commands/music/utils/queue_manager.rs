//! The playback queue seam. Commands and autoplay talk to `PlaybackQueue`;
//! `SongbirdQueue` adapts it onto songbird's builtin `TrackQueue`, where each
//! queued track carries its `TrackMetadata` as user data.

use serenity::async_trait;
use serenity::prelude::Mutex as SerenityMutex;
use songbird::input::YoutubeDl;
use songbird::tracks::{PlayMode, Queued, Track, TrackHandle, TrackQueue};
use songbird::Call;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::fair_queue;
use super::music_manager::{MusicError, MusicResult};
use crate::HTTP_CLIENT;
use crate::commands::music::audio_sources::TrackMetadata;

/// Operations the bot needs from the player's queue.
#[async_trait]
pub trait PlaybackQueue: Send + Sync {
    /// Tracks waiting to play, excluding the one currently playing.
    async fn upcoming(&self) -> Vec<TrackMetadata>;

    /// Appends tracks in order, returning how many were queued.
    async fn enqueue(&self, tracks: Vec<TrackMetadata>) -> MusicResult<usize>;

    /// Whether a track is currently audible.
    async fn is_playing(&self) -> bool;

    /// Starts or resumes playback of the queue head.
    async fn start_playback(&self) -> MusicResult<()>;

    /// Replaces the upcoming tracks with their fair (round-robin by requester)
    /// order. The currently playing track is left in place. Returns the number
    /// of upcoming tracks.
    async fn apply_fair_order(&self) -> usize;
}

/// Reads the metadata stored on a songbird track.
pub fn track_metadata(handle: &TrackHandle) -> Arc<TrackMetadata> {
    handle.data::<TrackMetadata>()
}

/// `PlaybackQueue` backed by a songbird call.
#[derive(Clone)]
pub struct SongbirdQueue {
    call: Arc<SerenityMutex<Call>>,
}

impl SongbirdQueue {
    pub fn new(call: Arc<SerenityMutex<Call>>) -> Self {
        Self { call }
    }

    /// Clone of the call's queue handle. Clones share state, so the call lock
    /// does not need to be held while using it.
    pub async fn queue(&self) -> TrackQueue {
        self.call.lock().await.queue().clone()
    }

    /// The playing track with its metadata.
    pub async fn current(&self) -> Option<(TrackHandle, Arc<TrackMetadata>)> {
        let handle = self.queue().await.current()?;
        let metadata = track_metadata(&handle);
        Some((handle, metadata))
    }

    /// Pauses a playing track or resumes a paused one. Returns whether the
    /// track is now paused, or `None` if nothing is playing.
    pub async fn toggle_pause(&self) -> MusicResult<Option<(bool, Arc<TrackMetadata>)>> {
        let Some((handle, metadata)) = self.current().await else {
            return Ok(None);
        };
        let info = handle
            .get_info()
            .await
            .map_err(|e| MusicError::QueueError(e.to_string()))?;

        let paused = match info.playing {
            PlayMode::Play => {
                handle.pause().map_err(|e| MusicError::QueueError(e.to_string()))?;
                true
            }
            PlayMode::Pause => {
                handle.play().map_err(|e| MusicError::QueueError(e.to_string()))?;
                false
            }
            other => {
                return Err(MusicError::QueueError(format!(
                    "Track is not in a pausable state ({:?})",
                    other
                )));
            }
        };

        Ok(Some((paused, metadata)))
    }

    /// Skips the current track, returning what was skipped.
    pub async fn skip(&self) -> MusicResult<Option<Arc<TrackMetadata>>> {
        let Some((_, metadata)) = self.current().await else {
            return Ok(None);
        };
        self.queue()
            .await
            .skip()
            .map_err(|e| MusicError::QueueError(e.to_string()))?;
        info!("Skipped '{}'", metadata.title);
        Ok(Some(metadata))
    }

    /// Stops playback and empties the queue.
    pub async fn stop(&self) {
        self.queue().await.stop();
    }

    /// Removes the upcoming track at `index` (0-based, excluding the current track).
    pub async fn remove_upcoming(&self, index: usize) -> Option<Arc<TrackMetadata>> {
        let queued = self.queue().await.dequeue(index + 1)?;
        let handle = queued.handle();
        let metadata = track_metadata(&handle);
        if let Err(e) = handle.stop() {
            debug!("Removed track was not active: {}", e);
        }
        Some(metadata)
    }
}

fn build_track(metadata: TrackMetadata, url: String) -> Track {
    let input = YoutubeDl::new(HTTP_CLIENT.clone(), url);
    Track::new_with_data(input.into(), Arc::new(metadata))
}

fn requester_of(queued: &Queued) -> Option<u64> {
    track_metadata(&queued.handle()).requester_id()
}

#[async_trait]
impl PlaybackQueue for SongbirdQueue {
    async fn upcoming(&self) -> Vec<TrackMetadata> {
        self.queue()
            .await
            .current_queue()
            .iter()
            .skip(1)
            .map(|handle| track_metadata(handle).as_ref().clone())
            .collect()
    }

    async fn enqueue(&self, tracks: Vec<TrackMetadata>) -> MusicResult<usize> {
        let mut handler = self.call.lock().await;
        if handler.current_channel().is_none() {
            return Err(MusicError::NotConnected);
        }

        let mut queued = 0;
        for metadata in tracks {
            let Some(url) = metadata.url.clone() else {
                warn!("Skipping track without URL: {}", metadata.title);
                continue;
            };
            debug!("Enqueueing '{}'", metadata.title);
            handler.enqueue(build_track(metadata, url)).await;
            queued += 1;
        }

        info!("Enqueued {} tracks", queued);
        Ok(queued)
    }

    async fn is_playing(&self) -> bool {
        let Some(handle) = self.queue().await.current() else {
            return false;
        };
        match handle.get_info().await {
            Ok(state) => matches!(state.playing, PlayMode::Play),
            Err(_) => false,
        }
    }

    async fn start_playback(&self) -> MusicResult<()> {
        self.queue()
            .await
            .resume()
            .map_err(|e| MusicError::QueueError(e.to_string()))
    }

    async fn apply_fair_order(&self) -> usize {
        self.queue().await.modify_queue(|queue| {
            let current = queue.pop_front();
            let upcoming: Vec<Queued> = queue.drain(..).collect();
            let count = upcoming.len();

            queue.extend(current);
            queue.extend(fair_queue::interleave(upcoming, requester_of));
            count
        })
    }
}
