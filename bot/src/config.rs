use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the chat platform REST API
    pub chat_api_url: String,
    /// Bot token for the chat platform
    pub chat_bot_token: String,
    /// Base URL used to build message permalinks for navigation buttons
    pub chat_link_base: String,
    /// Address the trigger surface listens on
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            chat_api_url: env::var("CHAT_API_URL")
                .unwrap_or_else(|_| "https://discord.com/api/v10".to_string()),
            chat_bot_token: env::var("CHAT_BOT_TOKEN").unwrap_or_default(),
            chat_link_base: env::var("CHAT_LINK_BASE")
                .unwrap_or_else(|_| "https://discord.com/channels/@me".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        }
    }
}
