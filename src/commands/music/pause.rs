use super::*;

/// Pause or resume the current track
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };

    match queue.toggle_pause().await {
        Ok(Some((true, metadata))) => ctx.send(embedded_messages::paused(&metadata)).await?,
        Ok(Some((false, metadata))) => ctx.send(embedded_messages::resumed(&metadata)).await?,
        Ok(None) => ctx.send(embedded_messages::no_track_playing()).await?,
        Err(err) => {
            ctx.send(embedded_messages::generic_error(&err.to_string()))
                .await?
        }
    };

    Ok(())
}
