use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use serenity::builder::EditMessage;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::{Call, Event, Songbird, TrackEvent};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use super::event_handlers::TrackEndNotifier;
use crate::Data;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No results found for: {0}")]
    NoResults(String),

    #[error("Queue error: {0}")]
    QueueError(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Per-guild state the bot keeps alongside the songbird call.
#[derive(Debug, Default, Clone)]
pub struct GuildSession {
    /// Text channel the player message lives in.
    pub channel_id: Option<ChannelId>,
    /// The current player message, if one was posted.
    pub message_id: Option<MessageId>,
    /// Set by stop commands so that the resulting end-of-track events do not trigger autoplay.
    pub manual_stop: bool,
}

/// Manages Songbird voice connections and per-guild session state
#[derive(Debug, Default)]
pub struct MusicManager {
    sessions: DashMap<GuildId, GuildSession>,
}

impl MusicManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the Songbird voice client from the context
    pub async fn get_songbird(ctx: &Context) -> MusicResult<Arc<Songbird>> {
        songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
    }

    /// Get the current voice channel call handle
    pub async fn get_call(
        ctx: &Context,
        guild_id: GuildId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::get_songbird(ctx).await?;
        songbird.get(guild_id).ok_or(MusicError::NotConnected)
    }

    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        ctx: &Context,
        guild_id: GuildId,
        user_id: UserId,
    ) -> MusicResult<ChannelId> {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }

    /// Join the user's voice channel, or return the existing call.
    ///
    /// A fresh call gets the end-of-track handler that drives autoplay.
    pub async fn join_user_channel(
        ctx: &Context,
        data: &Data,
        guild_id: GuildId,
        user_id: UserId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::get_songbird(ctx).await?;

        if let Some(call) = songbird.get(guild_id) {
            return Ok(call);
        }

        let channel_id = Self::get_user_voice_channel(ctx, guild_id, user_id)?;

        let call = songbird.join(guild_id, channel_id).await.map_err(|err| {
            error!(
                "Failed to join voice channel {} for guild {}: {}",
                channel_id, guild_id, err
            );
            MusicError::JoinError(err.to_string())
        })?;

        {
            let mut handler = call.lock().await;
            handler.add_global_event(
                Event::Track(TrackEvent::End),
                TrackEndNotifier::new(guild_id, call.clone(), data),
            );
        }

        info!("Joined voice channel {} in guild {}", channel_id, guild_id);
        Ok(call)
    }

    /// Leave a voice channel
    pub async fn leave_channel(ctx: &Context, guild_id: GuildId) -> MusicResult<()> {
        let songbird = Self::get_songbird(ctx).await?;

        if songbird.get(guild_id).is_none() {
            return Err(MusicError::NotConnected);
        }

        songbird
            .remove(guild_id)
            .await
            .map_err(|_| MusicError::JoinError("Failed to leave voice channel".to_string()))?;

        info!("Left voice channel in guild {}", guild_id);
        Ok(())
    }

    /// Snapshot of the session for a guild
    pub fn session(&self, guild_id: GuildId) -> GuildSession {
        self.sessions
            .get(&guild_id)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn store_channel_id(&self, guild_id: GuildId, channel_id: ChannelId) {
        self.sessions.entry(guild_id).or_default().channel_id = Some(channel_id);
    }

    pub fn store_message_id(&self, guild_id: GuildId, message_id: MessageId) {
        self.sessions.entry(guild_id).or_default().message_id = Some(message_id);
    }

    /// Flag that the next end-of-track events come from a manual stop.
    pub fn set_manual_stop(&self, guild_id: GuildId) {
        self.sessions.entry(guild_id).or_default().manual_stop = true;
    }

    /// Clear a stale manual stop, e.g. when a new play request arrives.
    pub fn clear_manual_stop(&self, guild_id: GuildId) {
        if let Some(mut session) = self.sessions.get_mut(&guild_id) {
            session.manual_stop = false;
        }
    }

    /// Whether playback in the guild was stopped by hand.
    pub fn is_manually_stopped(&self, guild_id: GuildId) -> bool {
        self.sessions
            .get(&guild_id)
            .is_some_and(|s| s.manual_stop)
    }

    /// Strip the buttons off the last player message, if one was posted.
    pub async fn retire_player_message(&self, ctx: &Context, guild_id: GuildId) {
        let Some((channel_id, message_id)) = self.sessions.get_mut(&guild_id).and_then(|mut s| {
            let ids = s.channel_id.zip(s.message_id);
            s.message_id = None;
            ids
        }) else {
            return;
        };

        let edit = EditMessage::new().components(Vec::new());
        if let Err(e) = channel_id.edit_message(ctx, message_id, edit).await {
            debug!("Could not retire player message {}: {}", message_id, e);
        }
    }
}
