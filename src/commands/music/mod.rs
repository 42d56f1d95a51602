//! Music playback commands. All of them only work inside a guild.

pub mod autoplay;
pub mod djrole;
pub mod fairqueue;
pub mod leave;
pub mod lyrics;
pub mod nowplaying;
pub mod pause;
pub mod play;
pub mod queue;
pub mod remove;
pub mod skip;
pub mod stop;

pub mod audio_sources;
pub mod utils;

use crate::commands::music::utils::dj_permissions::dj_check;
use crate::commands::music::utils::embedded_messages;
use crate::commands::music::utils::music_manager::{MusicError, MusicManager};
use crate::commands::music::utils::queue_manager::SongbirdQueue;
use crate::{CommandResult, Context};

/// The guild's queue, or `None` after telling the user the bot is not in a
/// voice channel.
async fn connected_queue(ctx: Context<'_>) -> Result<Option<SongbirdQueue>, crate::Error> {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    match MusicManager::get_call(ctx.serenity_context(), guild_id).await {
        Ok(call) => Ok(Some(SongbirdQueue::new(call))),
        Err(_) => {
            ctx.send(embedded_messages::bot_not_in_voice_channel()).await?;
            Ok(None)
        }
    }
}
