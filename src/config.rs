//! Runtime configuration, read once at startup and handed to every component.

use std::time::Duration;
use thiserror::Error;

use crate::commands::music::audio_sources::SearchSource;
use crate::commands::music::audio_sources::related_songs::lastfm::LASTFM_BASE_URL;
use crate::utils::database::APPDATA_DB;
use crate::utils::lyrics::LRCLIB_BASE_URL;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub database_path: String,
    pub lastfm_api_key: Option<String>,
    pub lastfm_base_url: String,
    pub lyrics_base_url: String,
    pub ytdlp_path: String,
    pub autoplay_source: SearchSource,
    pub autoplay_search_timeout: Option<Duration>,
    pub pagination_timeout: Duration,
    pub queue_page_size: usize,
}

impl BotConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let autoplay_source = match get("AUTOPLAY_SOURCE") {
            Some(value) => value
                .parse::<SearchSource>()
                .map_err(|e| ConfigError::Invalid {
                    key: "AUTOPLAY_SOURCE",
                    reason: e.to_string(),
                    value,
                })?,
            None => SearchSource::default(),
        };

        let autoplay_search_timeout = get("AUTOPLAY_SEARCH_TIMEOUT")
            .map(|value| parse_duration("AUTOPLAY_SEARCH_TIMEOUT", &value))
            .transpose()?;

        let pagination_timeout = match get("PAGINATION_TIMEOUT") {
            Some(value) => parse_duration("PAGINATION_TIMEOUT", &value)?,
            None => Duration::from_secs(60),
        };

        let queue_page_size = match get("QUEUE_PAGE_SIZE") {
            Some(value) => match value.parse::<usize>() {
                Ok(size) if size > 0 => size,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: "QUEUE_PAGE_SIZE",
                        value,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "QUEUE_PAGE_SIZE",
                        reason: e.to_string(),
                        value,
                    });
                }
            },
            None => 10,
        };

        Ok(Self {
            discord_token,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| APPDATA_DB.to_string()),
            lastfm_api_key: get("LASTFM_API_KEY"),
            lastfm_base_url: get("LASTFM_BASE_URL").unwrap_or_else(|| LASTFM_BASE_URL.to_string()),
            lyrics_base_url: get("LYRICS_BASE_URL").unwrap_or_else(|| LRCLIB_BASE_URL.to_string()),
            ytdlp_path: get("YTDLP_PATH").unwrap_or_else(|| "yt-dlp".to_string()),
            autoplay_source,
            autoplay_search_timeout,
            pagination_timeout,
            queue_page_size,
        })
    }
}

fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
