use super::*;
use crate::commands::music::utils::pagination::{paginate, paginate_lines};
use crate::commands::music::utils::queue_manager::PlaybackQueue;

/// View the current music queue
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let Some(queue) = connected_queue(ctx).await? else {
        return Ok(());
    };

    let current = queue.current().await;
    let upcoming = queue.upcoming().await;
    let header = embedded_messages::queue_header(current.as_ref().map(|(_, m)| m.as_ref()), &upcoming);

    let lines = embedded_messages::queue_lines(&upcoming);
    let mut pages: Vec<String> = paginate_lines(&lines, ctx.data().config.queue_page_size)
        .into_iter()
        .map(|page| format!("{}\n\n{}", header, page))
        .collect();
    if pages.is_empty() {
        pages.push(header);
    }

    paginate(ctx, "🎵 Music Queue", pages).await
}
