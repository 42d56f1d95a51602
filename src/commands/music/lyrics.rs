use super::*;
use crate::commands::music::utils::pagination::{PAGE_CHAR_LIMIT, chunk_text, paginate};
use crate::utils::lyrics::{LyricsBody, LyricsQuery};
use tracing::warn;

/// Show lyrics for a song, or for the current track if no query is given
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn lyrics(
    ctx: Context<'_>,
    #[description = "Song to look up (defaults to the current track)"] query: Option<String>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let lookup = match query {
        Some(text) => LyricsQuery::Text(text),
        None => {
            let current = match MusicManager::get_call(ctx.serenity_context(), guild_id).await {
                Ok(call) => SongbirdQueue::new(call).current().await,
                Err(_) => None,
            };
            let Some((_, metadata)) = current else {
                ctx.send(embedded_messages::no_track_playing()).await?;
                return Ok(());
            };
            LyricsQuery::Track {
                artist: metadata.author.clone(),
                title: metadata.title.clone(),
            }
        }
    };

    ctx.defer().await?;

    let described = match &lookup {
        LyricsQuery::Track { artist, title } => format!("{} - {}", artist, title),
        LyricsQuery::Text(text) => text.clone(),
    };

    let found = match ctx.data().lyrics.search(&lookup).await {
        Ok(found) => found,
        Err(err) => {
            warn!("Lyrics lookup for '{}' failed: {}", described, err);
            ctx.send(embedded_messages::generic_error(&err.to_string()))
                .await?;
            return Ok(());
        }
    };

    let Some(lyrics) = found else {
        ctx.send(embedded_messages::lyrics_not_found(&described)).await?;
        return Ok(());
    };

    match lyrics.body {
        LyricsBody::Instrumental => {
            ctx.send(embedded_messages::instrumental(&lyrics.artist_name, &lyrics.track_name))
                .await?;
            Ok(())
        }
        LyricsBody::Plain(text) => {
            let title = format!("🎤 {} - {}", lyrics.artist_name, lyrics.track_name);
            paginate(ctx, &title, chunk_text(&text, PAGE_CHAR_LIMIT)).await
        }
    }
}
