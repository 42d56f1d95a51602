use poise::serenity_prelude::{self as serenity, Context};
use serenity::all::{
    ComponentInteraction, CreateEmbed, CreateInteractionResponseFollowup, EditInteractionResponse,
};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::{
    button_controls,
    dj_permissions::member_is_dj,
    embedded_messages,
    music_manager::MusicManager,
    queue_manager::{PlaybackQueue, SongbirdQueue},
};
use crate::Data;

type ButtonInteractionResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Handle a player button press
pub async fn handle_interaction(
    ctx: &Context,
    data: &Data,
    interaction: &ComponentInteraction,
) -> ButtonInteractionResult {
    let guild_id = interaction.guild_id.ok_or("Not in a guild")?;
    let custom_id = interaction.data.custom_id.as_str();

    // The queue button is view-only.
    if custom_id != button_controls::QUEUE {
        let allowed = interaction
            .member
            .as_ref()
            .is_some_and(|member| member_is_dj(&data.settings, member));
        if !allowed {
            info!(
                "{} pressed {} without the DJ role",
                interaction.user.name, custom_id
            );
            interaction
                .create_response(
                    ctx,
                    serenity::CreateInteractionResponse::Message(
                        serenity::CreateInteractionResponseMessage::new()
                            .content("You need the DJ role to control playback.")
                            .ephemeral(true),
                    ),
                )
                .await?;
            return Ok(());
        }
    }

    interaction.defer(ctx).await?;

    let call = match MusicManager::get_call(ctx, guild_id).await {
        Ok(call) => call,
        Err(_) => return error_followup(ctx, interaction, "I'm not in a voice channel.").await,
    };
    let queue = SongbirdQueue::new(call);

    match custom_id {
        button_controls::PLAY_PAUSE => match queue.toggle_pause().await {
            Ok(Some(_)) => update_player_message(ctx, interaction, &queue).await,
            Ok(None) => error_followup(ctx, interaction, "No track is currently playing.").await,
            Err(e) => error_followup(ctx, interaction, &e.to_string()).await,
        },
        button_controls::SKIP => match queue.skip().await {
            Ok(Some(_)) => {
                // Let the queue advance before redrawing.
                sleep(Duration::from_millis(100)).await;
                update_player_message(ctx, interaction, &queue).await
            }
            Ok(None) => {
                error_followup(ctx, interaction, "No track is currently playing to skip.").await
            }
            Err(e) => error_followup(ctx, interaction, &e.to_string()).await,
        },
        button_controls::STOP => {
            data.music.set_manual_stop(guild_id);
            queue.stop().await;
            if let Err(e) = MusicManager::leave_channel(ctx, guild_id).await {
                warn!("Failed to leave voice channel via stop button: {}", e);
            }

            let reply = embedded_messages::stopped();
            interaction
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .embeds(reply.embeds)
                        .components(Vec::new()),
                )
                .await?;
            Ok(())
        }
        button_controls::QUEUE => {
            let current = queue.current().await;
            let upcoming = queue.upcoming().await;
            let mut content =
                embedded_messages::queue_header(current.as_ref().map(|(_, m)| m.as_ref()), &upcoming);

            let lines = embedded_messages::queue_lines(&upcoming);
            let shown = data.config.queue_page_size.min(lines.len());
            if shown > 0 {
                content.push_str("\n\n");
                content.push_str(&lines[..shown].join("\n"));
            }
            if lines.len() > shown {
                content.push_str(&format!(
                    "\n…and {} more. Use `/queue` to see everything.",
                    lines.len() - shown
                ));
            }

            interaction
                .create_followup(
                    &ctx.http,
                    CreateInteractionResponseFollowup::new()
                        .embed(
                            CreateEmbed::new()
                                .title("🎵 Music Queue")
                                .description(content)
                                .color(0x00ff00),
                        )
                        .ephemeral(true),
                )
                .await?;
            Ok(())
        }
        _ => {
            error!("Unknown button ID: {}", custom_id);
            error_followup(ctx, interaction, "Unknown button action.").await
        }
    }
}

/// Redraw the player message the button belongs to
async fn update_player_message(
    ctx: &Context,
    interaction: &ComponentInteraction,
    queue: &SongbirdQueue,
) -> ButtonInteractionResult {
    let current = queue.current().await;
    let position = match &current {
        Some((handle, _)) => handle.get_info().await.ok().map(|info| info.position),
        None => None,
    };
    let is_playing = queue.is_playing().await;
    let upcoming = queue.upcoming().await.len();

    let reply = embedded_messages::player_message(
        current.as_ref().map(|(_, metadata)| (metadata.as_ref(), position)),
        is_playing,
        upcoming,
    );

    interaction
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .embeds(reply.embeds)
                .components(reply.components.unwrap_or_default()),
        )
        .await?;

    Ok(())
}

/// Send an ephemeral error followup message for failed interactions
async fn error_followup(
    ctx: &Context,
    interaction: &ComponentInteraction,
    content: &str,
) -> ButtonInteractionResult {
    interaction
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}
