use super::*;

/// Leave the voice channel
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };
    let music = &ctx.data().music;

    music.set_manual_stop(guild_id);
    queue.stop().await;

    if let Err(err) = MusicManager::leave_channel(ctx.serenity_context(), guild_id).await {
        ctx.send(embedded_messages::generic_error(&format!(
            "Failed to leave voice channel: {}",
            err
        )))
        .await?;
        return Ok(());
    }
    music.retire_player_message(ctx.serenity_context(), guild_id).await;

    ctx.send(embedded_messages::left_voice_channel()).await?;
    Ok(())
}
