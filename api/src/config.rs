use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Group id scoping the roster collection lookups
    pub group_id: String,
    /// Webhook endpoint for outbound notifications (disabled when unset)
    pub webhook_url: Option<String>,
    /// Secret for signing outbound webhook payloads (HMAC-SHA256)
    pub webhook_secret: Option<String>,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            group_id: env::var("GROUP_ID").unwrap_or_else(|_| "default".to_string()),
            webhook_url: env::var("WEBHOOK_URL").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }
}
