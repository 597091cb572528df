use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails fast if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Shared secret the payment processor sends in the `verif-hash` header.
    pub payment_webhook_secret: String,
    /// Base URL of the hosting provider's domain API.
    pub domain_provider_url: String,
    pub domain_provider_token: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            payment_webhook_secret: require_env("PAYMENT_WEBHOOK_SECRET")?,
            domain_provider_url: require_env("DOMAIN_PROVIDER_URL")?,
            domain_provider_token: require_env("DOMAIN_PROVIDER_TOKEN")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
