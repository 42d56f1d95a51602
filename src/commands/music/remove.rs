use super::*;
use crate::commands::music::utils::queue_manager::PlaybackQueue;

/// Remove a track from the queue by its position
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position of the track to remove (1-based)"]
    #[min = 1]
    position: usize,
) -> CommandResult {
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };

    let queue_length = queue.upcoming().await.len();
    if position == 0 || position > queue_length {
        ctx.send(embedded_messages::invalid_queue_position(queue_length))
            .await?;
        return Ok(());
    }

    match queue.remove_upcoming(position - 1).await {
        Some(removed) => {
            ctx.send(embedded_messages::track_removed(&removed, position))
                .await?
        }
        None => {
            ctx.send(embedded_messages::generic_error("Failed to remove track"))
                .await?
        }
    };

    Ok(())
}
