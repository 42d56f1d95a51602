use super::*;
use poise::serenity_prelude::Role;
use tracing::info;

/// Set the role allowed to control playback, or clear it to allow everyone
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    category = "Music"
)]
pub async fn djrole(
    ctx: Context<'_>,
    #[description = "DJ role (leave empty to clear)"] role: Option<Role>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    let role_id = role.map(|role| role.id);

    ctx.data().settings.set_dj_role(guild_id, role_id)?;
    info!("DJ role for guild {} set to {:?}", guild_id, role_id);

    ctx.send(embedded_messages::dj_role_updated(role_id)).await?;
    Ok(())
}
