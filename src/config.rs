use crate::error::StartupError;
use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (Ed25519 PEM)
    pub jwt_public_key: String, // Public key (Ed25519 PEM)
    pub auth_issuer: String,
    pub jwt_ttl_minutes: i64,
    pub auto_confirm_purchases: bool,
    pub purchase_max_attempts: u32,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, StartupError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", 3000)?,
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_public_key: required("JWT_PUBLIC_KEY")?,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.ticketing.local".to_string()),
            jwt_ttl_minutes: parsed("JWT_TTL_MINUTES", 60)?,
            auto_confirm_purchases: parsed("AUTO_CONFIRM_PURCHASES", true)?,
            purchase_max_attempts: parsed("PURCHASE_MAX_ATTEMPTS", 3)?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
        })
    }
}

fn required(key: &str) -> Result<String, StartupError> {
    env::var(key).map_err(|_| StartupError::Config(format!("{} must be set", key)))
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, StartupError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StartupError::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
