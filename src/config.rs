use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    /// Where outbox emails get POSTed. Unset means deliveries are simulated.
    pub email_webhook_url: Option<String>,
    /// Reorder failure injection; set the rate to 0 to disable.
    pub reorder_fail_rate: f64,
    pub reorder_latency_ms: u64,
    pub reorder_jitter_ms: u64,
    pub seed_demo_data: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://talentflow.db?mode=rwc".to_string()),
            email_webhook_url: env::var("EMAIL_WEBHOOK_URL").ok(),
            reorder_fail_rate: get_env_parse_or("REORDER_FAIL_RATE", 0.05)?,
            reorder_latency_ms: get_env_parse_or("REORDER_LATENCY_MS", 300)?,
            reorder_jitter_ms: get_env_parse_or("REORDER_JITTER_MS", 700)?,
            seed_demo_data: get_env_parse_or("SEED_DEMO_DATA", false)?,
        })
    }
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
