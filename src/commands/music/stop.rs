use super::*;

/// Stop the music, clear the queue, and leave the voice channel
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };
    let music = &ctx.data().music;

    // Keeps the end-of-track events from starting autoplay
    music.set_manual_stop(guild_id);
    queue.stop().await;

    MusicManager::leave_channel(ctx.serenity_context(), guild_id).await?;
    music.retire_player_message(ctx.serenity_context(), guild_id).await;

    ctx.send(embedded_messages::stopped()).await?;
    Ok(())
}
