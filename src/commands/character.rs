use poise::CreateReply;

use crate::character::Character;
use crate::sheet::{client, parse};
use crate::{utils, Context, Error};

/// Fetch, validate, and store one character sheet. Shared by
/// `/character init`, `/character resync`, and `/stinit`.
///
/// Fetch and validation errors carry user-facing messages; storage errors are
/// logged in full and replaced with a generic message.
pub(crate) async fn register_sheet(
    ctx: Context<'_>,
    owner_id: &str,
    url: &str,
) -> Result<Character, String> {
    let data = ctx.data();

    let grid = match client::fetch(&data.http_client, &data.google_api_key, url, data.fetch_timeout)
        .await
    {
        Ok(grid) => grid,
        Err(e) => {
            tracing::warn!(user = %owner_id, url, error = %e, "sheet fetch failed");
            return Err(e.to_string());
        }
    };

    let fields = match parse::parse(&grid, &data.template) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(user = %owner_id, url, error = %e, "sheet validation failed");
            return Err(e.to_string());
        }
    };

    let character = Character::new(url.to_string(), owner_id.to_string(), fields);
    if let Err(e) = data.store.upsert(&character) {
        tracing::error!(user = %owner_id, url, error = %e, "character save failed");
        return Err("The character could not be saved. Please try again later.".to_string());
    }

    tracing::info!(user = %owner_id, url, name = %character.name(), "character registered");
    Ok(character)
}

/// One character per player: a new registration is refused while a different
/// sheet is already on file for the owner. Re-initialising the same sheet is
/// an update, not a conflict.
pub fn registration_conflict(existing: Option<&Character>, url: &str) -> bool {
    existing.is_some_and(|c| c.sheet_url != url)
}

const ALREADY_REGISTERED: &str =
    "You already have a character registered. You must delete it before adding another.";

/// Character sheet commands
#[poise::command(
    slash_command,
    guild_only,
    subcommands("init", "show", "resync", "delete")
)]
pub async fn character(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent of subcommands, never invoked directly.
    Ok(())
}

/// Register or update your character from a Google Sheet
#[poise::command(slash_command, guild_only)]
pub async fn init(
    ctx: Context<'_>,
    #[description = "Link to your character sheet"] url: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let owner_id = ctx.author().id.to_string();

    let existing = match ctx.data().store.lookup_by_owner(&owner_id) {
        Ok(existing) => existing,
        Err(e) => {
            tracing::error!(user = %owner_id, error = %e, "character lookup failed");
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
                .embed(utils::embed::error(ALREADY_REGISTERED))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let embed = match register_sheet(ctx, &owner_id, &url).await {
        Ok(character) => utils::embed::saved(&character),
        Err(message) => utils::embed::error(&message),
    };
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// See the overview of your character
#[poise::command(slash_command, guild_only)]
pub async fn show(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let owner_id = ctx.author().id.to_string();

    let embed = match ctx.data().store.lookup_by_owner(&owner_id) {
        Ok(Some(character)) => utils::embed::character_sheet(&character),
        Ok(None) => utils::embed::error("You don't have a character registered yet."),
        Err(e) => {
            tracing::error!(user = %owner_id, error = %e, "character lookup failed");
            utils::embed::error("The character could not be loaded. Please try again later.")
        }
    };
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Re-fetch your character from its sheet
#[poise::command(slash_command, guild_only)]
pub async fn resync(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let owner_id = ctx.author().id.to_string();

    let existing = match ctx.data().store.lookup_by_owner(&owner_id) {
        Ok(Some(character)) => character,
        Ok(None) => {
            ctx.send(
                CreateReply::default()
                    .embed(utils::embed::error("You don't have a character to resync."))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!(user = %owner_id, error = %e, "character lookup failed");
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

    let embed = match register_sheet(ctx, &owner_id, &existing.sheet_url).await {
        Ok(character) => utils::embed::saved(&character),
        Err(message) => utils::embed::error(&message),
    };
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Remove your registered character
#[poise::command(slash_command, guild_only)]
pub async fn delete(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let owner_id = ctx.author().id.to_string();

    let embed = match ctx.data().store.lookup_by_owner(&owner_id) {
        Ok(Some(character)) => match ctx.data().store.delete(&character.sheet_url) {
            Ok(true) => {
                tracing::info!(user = %owner_id, name = %character.name(), "character deleted");
                utils::embed::deleted(character.name())
            }
            Ok(false) => utils::embed::error("You don't have a character to delete."),
            Err(e) => {
                tracing::error!(user = %owner_id, error = %e, "character delete failed");
                utils::embed::error("The character could not be deleted. Please try again later.")
            }
        },
        Ok(None) => utils::embed::error("You don't have a character to delete."),
        Err(e) => {
            tracing::error!(user = %owner_id, error = %e, "character lookup failed");
            utils::embed::error("The character could not be loaded. Please try again later.")
        }
    };
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
