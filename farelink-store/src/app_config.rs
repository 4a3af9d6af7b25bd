use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub supplier: SupplierConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Merchant credentials and endpoints for the flight supplier. Forwarded
/// verbatim to the signature endpoint; opaque to the rest of the system.
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierConfig {
    pub merchant_id: String,
    pub api_key: String,
    pub client_id: String,
    pub password: String,
    pub browser_key: String,
    pub signing_key: String,
    #[serde(default)]
    pub channel_id: String,
    pub utils_base_url: String,
    pub flights_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    /// Base URL the browser payment callback redirects to.
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("FARELINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
