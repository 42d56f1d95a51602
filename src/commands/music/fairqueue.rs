use super::*;
use crate::commands::music::utils::queue_manager::PlaybackQueue;
use tracing::info;

/// Interleave the upcoming tracks so every requester takes turns
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn fairqueue(ctx: Context<'_>) -> CommandResult {
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };

    let count = queue.apply_fair_order().await;
    info!("Applied fair order to {} upcoming tracks", count);

    ctx.send(embedded_messages::fair_queue_applied(count)).await?;
    Ok(())
}
