use std::collections::HashSet;

use poise::CreateReply;

use crate::{utils, Context, Error};

/// Capability check for Storyteller-only commands. The allowed role names come
/// from the `ROLES` environment variable at startup; a user passes if any of
/// their guild roles is in the set.
pub struct StorytellerGate {
    allowed: HashSet<String>,
}

impl StorytellerGate {
    pub fn new(roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    pub fn permits<'a>(&self, role_names: impl IntoIterator<Item = &'a str>) -> bool {
        role_names.into_iter().any(|r| self.allowed.contains(r))
    }
}

/// poise command check for Storyteller commands. Runs before the command body,
/// so a denied user never reaches the fetch/parse/store pipeline.
pub async fn storyteller_check(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        deny(ctx).await?;
        return Ok(false);
    };

    // The guild cache ref must be released before replying.
    let role_names: Option<Vec<String>> = ctx.guild().map(|guild| {
        member
            .roles
            .iter()
            .filter_map(|id| guild.roles.get(id).map(|r| r.name.clone()))
            .collect()
    });
    let Some(role_names) = role_names else {
        deny(ctx).await?;
        return Ok(false);
    };

    let permitted = ctx
        .data()
        .storyteller_gate
        .permits(role_names.iter().map(String::as_str));

    if !permitted {
        tracing::info!(
            user = %ctx.author().id,
            command = %ctx.command().name,
            "storyteller command denied"
        );
        deny(ctx).await?;
    }

    Ok(permitted)
}

async fn deny(ctx: Context<'_>) -> Result<(), Error> {
    ctx.send(
        CreateReply::default()
            .embed(utils::embed::error(
                "You do not have the correct role to use this command.",
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
