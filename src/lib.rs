//! Encore: a Discord music bot with fair queueing, autoplay and lyrics.

pub mod commands;
pub mod config;
pub mod events;
pub mod utils;

use std::sync::{Arc, LazyLock};

use commands::music::audio_sources::TrackSearch;
use commands::music::utils::autoplay::AutoplayPipeline;
use commands::music::utils::music_manager::MusicManager;
use config::BotConfig;
use utils::database::GuildSettingsStore;
use utils::lyrics::LyricsClient;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client for songbird inputs and the web APIs.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// User data, stored and accessible in all command invocations
pub struct Data {
    pub config: BotConfig,
    pub settings: Arc<GuildSettingsStore>,
    pub music: Arc<MusicManager>,
    /// Search used by `/play`.
    pub search: Arc<dyn TrackSearch>,
    pub autoplay: Arc<AutoplayPipeline>,
    pub lyrics: LyricsClient,
}
