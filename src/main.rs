use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use serenity::all::ClientBuilder;
use songbird::SerenityInit;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use encore::commands::general::{help::*, ping::*};
use encore::commands::music::{
    audio_sources::{
        Requester, related_songs::lastfm::LastFmClient, youtube::YtDlpSearch,
    },
    autoplay::*, djrole::*, fairqueue::*, leave::*, lyrics::*, nowplaying::*, pause::*, play::*,
    queue::*, remove::*, skip::*, stop::*,
    utils::{
        autoplay::{AutoplayConfig, AutoplayPipeline},
        music_manager::MusicManager,
    },
};
use encore::config::BotConfig;
use encore::utils::{database::GuildSettingsStore, lyrics::LyricsClient};
use encore::{Data, Error, HTTP_CLIENT, events};

/// Results fetched per autoplay search, so lyric videos can be skipped.
const AUTOPLAY_RESULTS_PER_QUERY: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("encore=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;
    let token = config.discord_token.clone();

    let settings = Arc::new(GuildSettingsStore::open(&config.database_path)?);
    info!("Opened settings database at {}", config.database_path);

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let commands = vec![
        // Default commands
        register(),
        help(),
        // General commands
        ping(),
        // Music commands
        play(),
        pause(),
        skip(),
        stop(),
        leave(),
        queue(),
        nowplaying(),
        remove(),
        fairqueue(),
        autoplay(),
        lyrics(),
        djrole(),
    ];

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(build_data(config, settings, Requester::from(&*ready.user)))
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .register_songbird()
        .await?;

    client.start().await.map_err(Into::into)
}

fn build_data(config: BotConfig, settings: Arc<GuildSettingsStore>, bot: Requester) -> Data {
    let search = Arc::new(YtDlpSearch::new(config.ytdlp_path.clone()));
    let autoplay_search = Arc::new(
        YtDlpSearch::new(config.ytdlp_path.clone())
            .with_results_per_query(AUTOPLAY_RESULTS_PER_QUERY),
    );
    let mut autoplay_config = AutoplayConfig::new(bot);
    autoplay_config.source = config.autoplay_source;
    autoplay_config.search_timeout = config.autoplay_search_timeout;

    // Only the first `candidate_limit` candidates are searched.
    let lastfm = Arc::new(
        LastFmClient::new(
            HTTP_CLIENT.clone(),
            config.lastfm_base_url.clone(),
            config.lastfm_api_key.clone(),
        )
        .with_limit(autoplay_config.candidate_limit),
    );

    Data {
        lyrics: LyricsClient::new(HTTP_CLIENT.clone(), config.lyrics_base_url.clone()),
        settings,
        music: Arc::new(MusicManager::new()),
        search,
        autoplay: Arc::new(AutoplayPipeline::new(autoplay_search, lastfm, autoplay_config)),
        config,
    }
}
