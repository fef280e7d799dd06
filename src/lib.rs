use std::sync::Arc;
use std::time::Duration;

pub mod auth;
pub mod character;
pub mod commands;
pub mod config;
pub mod sheet;
pub mod utils;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub struct Data {
    pub http_client: reqwest::Client,
    pub store: character::store::CharacterStore,
    pub template: Arc<sheet::template::SheetTemplate>,
    pub storyteller_gate: auth::StorytellerGate,
    pub google_api_key: String,
    pub fetch_timeout: Duration,
}
