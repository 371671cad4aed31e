use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides `promo.secret`.
pub const SECRET_ENV_VAR: &str = "DISCOUNT_TOKEN_SECRET";

/// Shortest accepted signing secret.
pub const MIN_SECRET_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromoConfig {
    /// HMAC key used to sign and verify promo tokens.
    ///
    /// Prefer the `DISCOUNT_TOKEN_SECRET` environment variable; this field is
    /// the fallback. Rotating it invalidates every token already handed out.
    ///
    /// **Minimum length:** 32 characters.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// How long after an order was created a promo may still be minted for it.
    #[serde(default = "default_mint_window")]
    pub mint_window_hours: u64,
    #[serde(default = "default_percent")]
    pub default_percent: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub promo: PromoConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"127.0.0.1:8080"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl PromoConfig {
    pub fn token_ttl_ms(&self) -> i64 {
        (self.token_ttl_minutes * 60 * 1000) as i64
    }

    pub fn mint_window_ms(&self) -> i64 {
        (self.mint_window_hours * 60 * 60 * 1000) as i64
    }

    /// Resolve the secret with `DISCOUNT_TOKEN_SECRET` taking priority over
    /// the config file field.
    pub fn resolved_secret(&self) -> Option<String> {
        self.resolve_secret_from(std::env::var(SECRET_ENV_VAR).ok())
    }

    /// Same as [`resolved_secret`](Self::resolved_secret) with the
    /// environment value passed in.
    pub fn resolve_secret_from(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|s| !s.is_empty())
            .or_else(|| self.secret.clone())
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_port() -> u16 {
    8080
}

pub fn default_request_timeout() -> u64 {
    10
}

pub fn default_database_url() -> String {
    "sqlite://promo.db".to_string()
}

pub fn default_token_ttl() -> u64 {
    15
}

pub fn default_mint_window() -> u64 {
    24
}

pub fn default_percent() -> f64 {
    10.0
}
