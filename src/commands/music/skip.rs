use super::*;

/// Skip the currently playing song
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };

    match queue.skip().await? {
        Some(metadata) => ctx.send(embedded_messages::skipped(&metadata)).await?,
        None => ctx.send(embedded_messages::no_track_playing()).await?,
    };

    Ok(())
}
