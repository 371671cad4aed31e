use std::fs;
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError, MIN_SECRET_LEN, SECRET_ENV_VAR};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    parse_config(&contents)
}

/// Parse and validate TOML config text. The secret is resolved through the
/// environment as at runtime.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(contents)?;

    info!("Configuration loaded successfully");
    debug!(
        "Config: server={:?} database={:?} token_ttl_minutes={} mint_window_hours={}",
        config.server,
        config.database,
        config.promo.token_ttl_minutes,
        config.promo.mint_window_hours
    );

    validate_config(&config, config.promo.resolved_secret())?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig, secret: Option<String>) -> Result<(), ConfigError> {
    if config.server.bind.trim().is_empty() {
        return Err(ConfigError::InvalidConfig("bind cannot be empty".into()));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "request_timeout_secs must be greater than 0".into(),
        ));
    }

    if config.promo.token_ttl_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_ttl_minutes must be greater than 0".into(),
        ));
    }

    let pct = config.promo.default_percent;
    if !(0.0..=100.0).contains(&pct) {
        return Err(ConfigError::InvalidConfig(
            "default_percent must be between 0 and 100".into(),
        ));
    }

    match secret {
        None => {
            return Err(ConfigError::InvalidConfig(format!(
                "promo secret must be set via the {} env var or promo.secret config field",
                SECRET_ENV_VAR
            )));
        }
        Some(secret) if secret.len() < MIN_SECRET_LEN => {
            return Err(ConfigError::InvalidConfig(format!(
                "promo secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }
        _ => {}
    }

    Ok(())
}
