//! Defines the `/autoplay` command for managing the music autoplay feature.

use super::*;

/// Enables, disables, or toggles the music autoplay feature for the guild.
///
/// When autoplay is enabled, the bot queues tracks similar to the last one
/// whenever the queue runs out. If the `enabled` argument is omitted, the
/// command toggles the current autoplay state. The setting is persisted.
#[poise::command(slash_command, guild_only, check = "dj_check", category = "Music")]
pub async fn autoplay(
    ctx: Context<'_>,
    #[description = "Enable or disable autoplay"] enabled: Option<bool>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    let settings = &ctx.data().settings;

    let new_state = enabled.unwrap_or_else(|| !settings.autoplay_enabled(guild_id));
    settings.set_autoplay(guild_id, new_state)?;

    ctx.send(embedded_messages::autoplay_status(new_state)).await?;
    Ok(())
}
