use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, ReactionType};

pub const PLAY_PAUSE: &str = "music_play_pause";
pub const SKIP: &str = "music_skip";
pub const STOP: &str = "music_stop";
pub const QUEUE: &str = "music_queue";

/// Creates the player control buttons based on player status
pub fn player_buttons(is_playing: bool, has_queue: bool) -> Vec<CreateActionRow> {
    let play_pause = CreateButton::new(PLAY_PAUSE)
        .emoji(ReactionType::Unicode(
            if is_playing { "⏸️" } else { "▶️" }.to_string(),
        ))
        .style(ButtonStyle::Primary)
        .label(if is_playing { "Pause" } else { "Play" });

    let skip = CreateButton::new(SKIP)
        .emoji(ReactionType::Unicode("⏭️".to_string()))
        .style(ButtonStyle::Secondary)
        .label("Skip");

    let stop = CreateButton::new(STOP)
        .emoji(ReactionType::Unicode("⏹️".to_string()))
        .style(ButtonStyle::Danger)
        .label("Stop");

    let queue = CreateButton::new(QUEUE)
        .emoji(ReactionType::Unicode("📋".to_string()))
        .style(ButtonStyle::Secondary)
        .label("Queue")
        .disabled(!has_queue);

    vec![CreateActionRow::Buttons(vec![play_pause, skip, stop, queue])]
}
