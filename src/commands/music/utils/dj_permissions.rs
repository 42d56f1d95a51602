//! DJ-role authorization for playback controls.
//!
//! A member may control playback when the guild has no DJ role configured,
//! when they hold the DJ role, or when they can manage the guild anyway.

use poise::serenity_prelude as serenity;
use serenity::all::{Member, Permissions, RoleId};
use tracing::debug;

use crate::utils::database::GuildSettingsStore;
use crate::{Context, Error};

pub fn is_dj(dj_role: Option<RoleId>, member_roles: &[RoleId], permissions: Permissions) -> bool {
    permissions.administrator()
        || permissions.manage_guild()
        || dj_role.is_none_or(|role| member_roles.contains(&role))
}

/// Authorization for a member seen on an interaction.
pub fn member_is_dj(settings: &GuildSettingsStore, member: &Member) -> bool {
    is_dj(
        settings.dj_role(member.guild_id),
        &member.roles,
        member.permissions.unwrap_or_else(Permissions::empty),
    )
}

/// Poise check for commands that control playback for everyone.
pub async fn dj_check(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    if member_is_dj(&ctx.data().settings, &member) {
        return Ok(true);
    }

    debug!("{} was denied a DJ command", ctx.author().name);
    ctx.send(
        poise::CreateReply::default()
            .content("You need the DJ role to do that.")
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}
