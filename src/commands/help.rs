use poise::CreateReply;
use serenity::builder::CreateEmbed;

use crate::{Context, Error};

async fn help_impl(ctx: Context<'_>) -> Result<(), Error> {
    let player_cmds = "\
`/character init <url>` — register or update your character from a Google Sheet
`/character show` — see the overview of your character
`/character resync` — re-fetch your character from its sheet
`/character delete` — remove your registered character";

    let storyteller_cmds = "\
`/roster` — list all registered characters
`/stinit <user> <url>` — register a character on a player's behalf";

    let embed = CreateEmbed::new()
        .title("The Dark World — South Florida")
        .field("Characters", player_cmds, false)
        .field("Storyteller", storyteller_cmds, false)
        .color(0x8B0000);

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Show the bot's commands
#[poise::command(slash_command, guild_only)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    help_impl(ctx).await
}
