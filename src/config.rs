use std::time::Duration;

pub struct Config {
    pub discord_token: String,
    pub google_api_key: String,
    pub storyteller_roles: Vec<String>,
    pub base_sheet_path: String,
    pub db_path: String,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            discord_token: required("DISCORD_KEY"),
            google_api_key: required("GOOGLE_API_KEY"),
            storyteller_roles: parse_roles(&required("ROLES")),
            base_sheet_path: required("BASE_SHEET"),
            db_path: std::env::var("DARKWORLD_DB_PATH")
                .unwrap_or_else(|_| "characters.db".to_string()),
            fetch_timeout: Duration::from_secs(
                std::env::var("SHEET_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

fn required(name: &str) -> String {
    let value = std::env::var(name)
        .unwrap_or_else(|_| panic!("{name} must be set in the environment or .env"));
    if value.trim().is_empty() {
        panic!("{name} is set but empty");
    }
    value
}

/// `ROLES` is a comma-separated list of Discord role names.
fn parse_roles(raw: &str) -> Vec<String> {
    let roles: Vec<String> = raw
        .split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if roles.is_empty() {
        panic!("ROLES must contain at least one role name");
    }
    roles
}
