use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::{CreateEmbed, CreateEmbedFooter, RoleId};
use std::time::Duration;

use super::{button_controls, format_duration};
use crate::commands::music::audio_sources::TrackMetadata;

const GREEN: u32 = 0x00ff00;
const RED: u32 = 0xff0000;

/// Create a progress bar for the current track
fn format_progress_bar(position: Duration, total: Duration) -> String {
    const BAR_LENGTH: usize = 15;
    let progress = if total.as_secs() == 0 {
        0.0
    } else {
        (position.as_secs_f64() / total.as_secs_f64()).min(1.0)
    };

    let filled = (progress * BAR_LENGTH as f64).round() as usize;
    let empty = BAR_LENGTH - filled;

    format!("▬{}🔘{}▬", "▬".repeat(filled), "▬".repeat(empty))
}

/// Title linked to the track URL, for embed descriptions
fn track_link(metadata: &TrackMetadata) -> String {
    format!(
        "[{}]({})",
        metadata.title,
        metadata.url.as_deref().unwrap_or("#")
    )
}

fn duration_label(metadata: &TrackMetadata) -> String {
    if metadata.is_stream {
        return "🔴 Live".to_string();
    }
    metadata
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Unknown duration".to_string())
}

fn error_embed(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Error")
        .description(description)
        .color(RED)
}

/// Generic ephemeral error reply
pub fn generic_error(description: &str) -> CreateReply {
    CreateReply::default()
        .embed(error_embed(description))
        .ephemeral(true)
}

/// Create an embed for the track that is currently playing
pub fn now_playing(metadata: &TrackMetadata, position: Option<Duration>) -> CreateEmbed {
    let mut description = format!("**{}**\nby {}", track_link(metadata), metadata.author);

    if let (Some(duration), Some(position), false) =
        (metadata.duration, position, metadata.is_stream)
    {
        description.push_str(&format!(
            "\n\n{} `{}/{}`",
            format_progress_bar(position, duration),
            format_duration(position),
            format_duration(duration)
        ));
    }

    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(description)
        .field("Duration", format!("`{}`", duration_label(metadata)), true)
        .field("Requested by", metadata.requester_name(), true)
        .color(GREEN);

    if let Some(thumbnail) = &metadata.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    if metadata.is_autoplay() {
        embed = embed.footer(CreateEmbedFooter::new("Queued by autoplay"));
    }
    embed
}

/// Create an embed for when tracks are added to the queue
pub fn added_to_queue(metadata: &TrackMetadata, position: usize, count: usize) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🎵 Added to Queue")
        .description(track_link(metadata))
        .field("Duration", format!("`{}`", duration_label(metadata)), true)
        .field("Position", format!("`#{}`", position), true)
        .color(GREEN);

    if count > 1 {
        embed = embed.field("Tracks", format!("`{} tracks added`", count), true);
    }
    if let Some(thumbnail) = &metadata.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    embed
}

/// The player message: now playing plus control buttons
pub fn player_message(
    current: Option<(&TrackMetadata, Option<Duration>)>,
    is_playing: bool,
    upcoming: usize,
) -> CreateReply {
    let embed = match current {
        Some((metadata, position)) => {
            now_playing(metadata, position).field("Up next", format!("`{} tracks`", upcoming), true)
        }
        None => CreateEmbed::new()
            .title("🔇 Nothing playing")
            .description("Use `/play` to queue something")
            .color(GREEN),
    };

    CreateReply::default()
        .embed(embed)
        .components(button_controls::player_buttons(is_playing, upcoming > 0))
}

/// One line per queued track, for the paginated queue view
pub fn queue_lines(upcoming: &[TrackMetadata]) -> Vec<String> {
    upcoming
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let mut line = format!("`{}.` {}", index + 1, track_link(track));
            line.push_str(&format!(" `{}`", duration_label(track)));
            line.push_str(&format!(" - {}", track.requester_name()));
            line
        })
        .collect()
}

/// Header shown above the queue pages
pub fn queue_header(current: Option<&TrackMetadata>, upcoming: &[TrackMetadata]) -> String {
    let mut header = match current {
        Some(metadata) => format!("**🎵 Now Playing**\n{}\n\n", track_link(metadata)),
        None => "**🔇 Nothing playing**\n\n".to_string(),
    };

    if upcoming.is_empty() {
        header.push_str("**📭 Queue is empty**");
        return header;
    }

    header.push_str(&format!("**📋 Queue - {} tracks**", upcoming.len()));
    let total: Duration = upcoming.iter().filter_map(|track| track.duration).sum();
    if total.as_secs() > 0 {
        header.push_str(&format!(" • `{}`", format_duration(total)));
    }
    header
}

/// Create an embed for when a track is paused
pub fn paused(metadata: &TrackMetadata) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏸️ Paused")
            .description(format!("Paused {}", track_link(metadata)))
            .color(GREEN),
    )
}

/// Create an embed for when a track is resumed
pub fn resumed(metadata: &TrackMetadata) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("▶️ Resumed")
            .description(format!("Resumed {}", track_link(metadata)))
            .color(GREEN),
    )
}

/// Create an embed for when no track is playing
pub fn no_track_playing() -> CreateReply {
    CreateReply::default()
        .embed(error_embed("No track is currently playing"))
        .ephemeral(true)
}

/// Create an embed for when the bot is not connected to a voice channel
pub fn bot_not_in_voice_channel() -> CreateReply {
    CreateReply::default()
        .embed(error_embed("I'm not connected to a voice channel"))
        .ephemeral(true)
}

/// Create an embed for when a user is not connected to a voice channel
pub fn user_not_in_voice_channel() -> CreateReply {
    CreateReply::default()
        .embed(error_embed("You need to be in a voice channel"))
        .ephemeral(true)
}

/// Create an embed for when autoplay is enabled or disabled
pub fn autoplay_status(enabled: bool) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(if enabled {
                "🔄 Autoplay Enabled"
            } else {
                "⏹️ Autoplay Disabled"
            })
            .description(if enabled {
                "I will automatically play similar songs when the queue runs out"
            } else {
                "I will stop playing when the queue is empty"
            })
            .color(if enabled { GREEN } else { RED }),
    )
}

/// Create an embed for when the bot leaves a voice channel
pub fn left_voice_channel() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("👋 Left Voice Channel")
            .description("Disconnected and cleared the queue")
            .color(GREEN),
    )
}

/// Create an embed for when the bot stops playing music
pub fn stopped() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏹️ Stopped")
            .description("Playback stopped and queue cleared")
            .color(GREEN),
    )
}

/// Create an embed for when a track is skipped
pub fn skipped(metadata: &TrackMetadata) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏭️ Skipped")
            .description(format!("Skipped {}", track_link(metadata)))
            .color(GREEN),
    )
}

/// Create an embed for when a queue position is invalid
pub fn invalid_queue_position(queue_length: usize) -> CreateReply {
    CreateReply::default()
        .embed(error_embed(format!(
            "Invalid position. The queue has {} tracks",
            queue_length
        )))
        .ephemeral(true)
}

/// Create an embed for when a track is removed from the queue
pub fn track_removed(metadata: &TrackMetadata, position: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🗑️ Track Removed")
            .description(format!(
                "Removed {} from position #{}",
                track_link(metadata),
                position
            ))
            .color(GREEN),
    )
}

/// Create an embed for when the upcoming tracks were reordered fairly
pub fn fair_queue_applied(count: usize) -> CreateReply {
    let description = if count < 2 {
        "Nothing to reorder".to_string()
    } else {
        format!("Interleaved {} upcoming tracks by requester", count)
    };

    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⚖️ Fair Queue")
            .description(description)
            .color(GREEN),
    )
}

/// Create an embed for when the DJ role changes
pub fn dj_role_updated(role: Option<RoleId>) -> CreateReply {
    let description = match role {
        Some(role) => format!("Playback controls now require <@&{}>", role),
        None => "DJ role cleared. Everyone can control playback".to_string(),
    };

    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎧 DJ Role")
            .description(description)
            .color(GREEN),
    )
}

/// Create an embed for when no lyrics were found
pub fn lyrics_not_found(query: &str) -> CreateReply {
    CreateReply::default()
        .embed(error_embed(format!("No lyrics found for `{}`", query)))
        .ephemeral(true)
}

/// Create an embed for an instrumental track
pub fn instrumental(artist: &str, title: &str) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(format!("🎼 {} - {}", artist, title))
            .description("This track is instrumental")
            .color(GREEN),
    )
}
