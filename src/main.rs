use std::sync::Arc;

use darkworld_bot::character::store::CharacterStore;
use darkworld_bot::sheet::template::SheetTemplate;
use darkworld_bot::{auth, commands, config, Data};
use poise::serenity_prelude as serenity;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Both must be in place before the gateway connects; a bot that cannot
    // read templates or store characters should not come up at all.
    let template = match SheetTemplate::load(&config.base_sheet_path) {
        Ok(t) => {
            tracing::info!(
                path = %config.base_sheet_path,
                fields = t.fields.len(),
                "base sheet template loaded"
            );
            Arc::new(t)
        }
        Err(e) => {
            tracing::error!("failed to load base sheet template: {e}");
            std::process::exit(1);
        }
    };

    let store = match CharacterStore::new(&config.db_path) {
        Ok(s) => {
            tracing::info!(path = %config.db_path, "character store opened");
            s
        }
        Err(e) => {
            tracing::error!("failed to open character store: {e}");
            std::process::exit(1);
        }
    };

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let storyteller_roles = config.storyteller_roles.clone();
    let google_api_key = config.google_api_key.clone();
    let fetch_timeout = config.fetch_timeout;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("commands registered, bot is ready");
                Ok(Data {
                    http_client: reqwest::Client::new(),
                    store,
                    template,
                    storyteller_gate: auth::StorytellerGate::new(storyteller_roles),
                    google_api_key,
                    fetch_timeout,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .expect("failed to create Discord client");

    if let Err(e) = client.start().await {
        tracing::error!("client error: {e}");
    }
}
