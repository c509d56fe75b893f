use anyhow::{Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_JWT_EXPIRY_MINS: i64 = 1440;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_mins: i64,
    /// Similarity scoring is disabled when unset.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// PDF regeneration is skipped when unset.
    pub render_service_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            jwt_expiry_mins: std::env::var("JWT_EXPIRY_MINS")
                .unwrap_or_else(|_| DEFAULT_JWT_EXPIRY_MINS.to_string())
                .parse::<i64>()
                .context("JWT_EXPIRY_MINS must be a whole number of minutes")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            render_service_url: optional_env("RENDER_SERVICE_URL"),
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

/// Empty values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/pinjobs_test".to_string(),
            jwt_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            jwt_expiry_mins: 60,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            render_service_url: None,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}
