use poise::serenity_prelude as serenity;
use poise::CreateReply;

use super::character::{register_sheet, registration_conflict};
use crate::{utils, Context, Error};

/// List all registered characters (Storyteller only)
#[poise::command(slash_command, guild_only, check = "crate::auth::storyteller_check")]
pub async fn roster(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let embed = match ctx.data().store.list_all() {
        Ok(characters) => utils::embed::roster(&characters),
        Err(e) => {
            tracing::error!(user = %ctx.author().id, error = %e, "roster listing failed");
            utils::embed::error("The roster could not be loaded. Please try again later.")
        }
    };
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Register a character sheet on a player's behalf (Storyteller only)
#[poise::command(slash_command, guild_only, check = "crate::auth::storyteller_check")]
pub async fn stinit(
    ctx: Context<'_>,
    #[description = "Player to register the character for"] user: serenity::User,
    #[description = "Link to the character sheet"] url: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let owner_id = user.id.to_string();

    let existing = match ctx.data().store.lookup_by_owner(&owner_id) {
        Ok(existing) => existing,
        Err(e) => {
            tracing::error!(player = %owner_id, error = %e, "character lookup failed");
            ctx.send(
                CreateReply::default()
                    .embed(utils::embed::error(
                        "The character could not be loaded. Please try again later.",
                    ))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };
    if registration_conflict(existing.as_ref(), &url) {
        ctx.send(
            CreateReply::default()
                .embed(utils::embed::error(
                    "That player already has a character registered. \
                     It must be deleted before adding another.",
                ))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let embed = match register_sheet(ctx, &owner_id, &url).await {
        Ok(character) => {
            tracing::info!(
                storyteller = %ctx.author().id,
                player = %owner_id,
                name = %character.name(),
                "character registered by storyteller"
            );
            utils::embed::saved(&character)
        }
        Err(message) => utils::embed::error(&message),
    };
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
