use super::*;

/// Show the track that is playing right now
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn nowplaying(ctx: Context<'_>) -> CommandResult {
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };

    let Some((handle, metadata)) = queue.current().await else {
        ctx.send(embedded_messages::no_track_playing()).await?;
        return Ok(());
    };

    let position = handle.get_info().await.ok().map(|info| info.position);
    ctx.send(poise::CreateReply::default().embed(embedded_messages::now_playing(&metadata, position)))
        .await?;

    Ok(())
}
