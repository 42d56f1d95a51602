use std::sync::{Arc, Weak};

use poise::serenity_prelude as serenity;
use serenity::async_trait;
use songbird::{Call, Event, EventContext, EventHandler};
use tracing::{debug, info};

use super::autoplay::AutoplayPipeline;
use super::music_manager::MusicManager;
use super::queue_manager::{SongbirdQueue, track_metadata};
use crate::Data;
use crate::utils::database::GuildSettingsStore;

/// Global end-of-track handler for a guild's call. When the last queued track
/// finishes on its own, it hands over to autoplay.
///
/// The handler is owned by the call's driver, so it only keeps a weak
/// reference back to the call.
pub struct TrackEndNotifier {
    guild_id: serenity::GuildId,
    call: Weak<serenity::prelude::Mutex<Call>>,
    music: Arc<MusicManager>,
    settings: Arc<GuildSettingsStore>,
    autoplay: Arc<AutoplayPipeline>,
}

impl TrackEndNotifier {
    pub fn new(
        guild_id: serenity::GuildId,
        call: Arc<serenity::prelude::Mutex<Call>>,
        data: &Data,
    ) -> Self {
        Self {
            guild_id,
            call: Arc::downgrade(&call),
            music: data.music.clone(),
            settings: data.settings.clone(),
            autoplay: data.autoplay.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let EventContext::Track(ended) = ctx else {
            return None;
        };
        let Some((_, last_handle)) = ended.last() else {
            return None;
        };

        if self.music.is_manually_stopped(self.guild_id) {
            debug!("Track ended after manual stop in guild {}", self.guild_id);
            return None;
        }

        let Some(call) = self.call.upgrade() else {
            debug!("Call for guild {} is gone", self.guild_id);
            return None;
        };
        let queue = SongbirdQueue::new(call);
        let ended_ids: Vec<_> = ended.iter().map(|(_, handle)| handle.uuid()).collect();
        let remaining = queue
            .queue()
            .await
            .current_queue()
            .iter()
            .filter(|handle| !ended_ids.contains(&handle.uuid()))
            .count();
        if remaining > 0 {
            return None;
        }

        let enabled = self.settings.autoplay_enabled(self.guild_id);
        if !enabled {
            debug!("Queue finished in guild {}, autoplay is off", self.guild_id);
            return None;
        }

        let last_track = track_metadata(last_handle);
        let autoplay = self.autoplay.clone();
        let guild_id = self.guild_id;

        tokio::spawn(async move {
            let outcome = autoplay.run(&queue, Some(last_track.as_ref()), enabled).await;
            info!("Autoplay in guild {} finished: {:?}", guild_id, outcome);
        });

        None
    }
}
