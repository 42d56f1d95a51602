use super::*;
use crate::commands::music::audio_sources::{Requester, SearchSource};
use crate::commands::music::utils::queue_manager::PlaybackQueue;
use tracing::{error, info};

/// Play a song from a URL or search query
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    let user_id = ctx.author().id;
    let data = ctx.data();

    if MusicManager::get_user_voice_channel(ctx.serenity_context(), guild_id, user_id).is_err() {
        ctx.send(embedded_messages::user_not_in_voice_channel()).await?;
        return Ok(());
    }

    // Searching can take a few seconds
    ctx.defer().await?;

    let call =
        match MusicManager::join_user_channel(ctx.serenity_context(), data, guild_id, user_id).await
        {
            Ok(call) => call,
            Err(err) => {
                error!("Failed to join voice channel: {}", err);
                ctx.send(embedded_messages::generic_error(&err.to_string()))
                    .await?;
                return Ok(());
            }
        };
    data.music.clear_manual_stop(guild_id);

    let requester = Requester::from(ctx.author());
    let tracks = match data
        .search
        .search(&query, SearchSource::default(), &requester)
        .await
    {
        Ok(tracks) if !tracks.is_empty() => tracks,
        Ok(_) => {
            ctx.send(embedded_messages::generic_error(&format!(
                "No results found for `{}`",
                query
            )))
            .await?;
            return Ok(());
        }
        Err(err) => {
            error!("Failed to resolve '{}': {}", query, err);
            ctx.send(embedded_messages::generic_error(&format!(
                "Failed to process audio source: {}",
                err
            )))
            .await?;
            return Ok(());
        }
    };

    let first = tracks[0].clone();
    let queue = SongbirdQueue::new(call);
    let was_idle = queue.current().await.is_none();
    let waiting = queue.upcoming().await.len();

    let count = match queue.enqueue(tracks).await {
        Ok(count) => count,
        Err(err) => {
            ctx.send(embedded_messages::generic_error(&format!(
                "Failed to add track to queue: {}",
                err
            )))
            .await?;
            return Ok(());
        }
    };

    if !was_idle {
        ctx.send(poise::CreateReply::default().embed(embedded_messages::added_to_queue(
            &first,
            waiting + 1,
            count,
        )))
        .await?;
        return Ok(());
    }

    let upcoming = queue.upcoming().await.len();
    let reply = ctx
        .send(embedded_messages::player_message(
            Some((&first, None)),
            true,
            upcoming,
        ))
        .await?;

    let message = reply.message().await?;
    data.music.store_channel_id(guild_id, ctx.channel_id());
    data.music.store_message_id(guild_id, message.id);

    Ok(())
}
