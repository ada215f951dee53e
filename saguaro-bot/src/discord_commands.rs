use crate::Context;
use poise::command;
use saguaro_api::{format, servers};
use saguaro_bot::helpers::chunk_message;

pub(crate) type Error = Box<dyn std::error::Error + Send + Sync>;

/// Discord caps messages at 2000 characters; stay under it with headroom.
const MESSAGE_LIMIT: usize = 1900;

async fn say_chunked(ctx: &Context<'_>, text: &str) -> Result<(), Error> {
    for chunk in chunk_message(text, MESSAGE_LIMIT) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Show the live status of every game server
#[command(slash_command, prefix_command)]
pub async fn servers(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let text = ctx.data().client.servers_status_from_api().await;
    say_chunked(&ctx, &text).await
}

/// Per-server online counts from the status cache
#[command(slash_command, prefix_command)]
pub async fn online(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let statuses = ctx.data().client.fetch_all_servers_status().await;
    say_chunked(&ctx, &format::format_status_map(&statuses)).await
}

/// Look up a player's stats on a server
#[command(slash_command, prefix_command)]
pub async fn stats(
    ctx: Context<'_>,
    #[description = "Player nickname"] nickname: String,
    #[description = "Server ID"] server_id: u16,
) -> Result<(), Error> {
    if let Err(err) = servers::validate_nickname(&nickname) {
        ctx.say(format!("❌ {err}")).await?;
        return Ok(());
    }
    if let Err(err) = servers::validate_server_id(server_id) {
        ctx.say(format!("❌ {err}")).await?;
        return Ok(());
    }

    ctx.defer().await?;
    match ctx
        .data()
        .client
        .fetch_player_stats(&nickname, server_id)
        .await
    {
        Ok(record) => {
            say_chunked(&ctx, &format::format_stats(&record, &nickname, server_id)).await?;
        }
        Err(err) => {
            ctx.say(err.user_message()).await?;
        }
    }
    Ok(())
}
