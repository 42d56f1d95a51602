use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::CreateEmbed;
use std::time::Duration;

use crate::{CommandResult, Context};

/// Ping the bot to check its latency
#[poise::command(slash_command, category = "General")]
pub async fn ping(ctx: Context<'_>) -> CommandResult {
    let latency = match get_shard_latency(&ctx).await {
        Some(latency) => format!("{} ms", latency.as_millis()),
        None => "Not measured yet".to_string(),
    };

    let connected = match (ctx.guild_id(), songbird::get(ctx.serenity_context()).await) {
        (Some(guild_id), Some(manager)) => manager.get(guild_id).is_some(),
        _ => false,
    };

    let embed = CreateEmbed::new()
        .title("Pong!")
        .field("API Latency", latency, true)
        .field("Voice", if connected { "Connected" } else { "Idle" }, true)
        .color(0x00ff00);

    ctx.send(CreateReply::default().embed(embed).ephemeral(false))
        .await?;

    Ok(())
}

async fn get_shard_latency(ctx: &Context<'_>) -> Option<Duration> {
    let shard_manager = ctx.framework().shard_manager();
    let runners = shard_manager.runners.lock().await;

    // Latency is reported by the runner of the shard this command came in on.
    let runner = runners.get(&serenity::ShardId(ctx.serenity_context().shard_id.0))?;

    runner.latency
}
