use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Bearer token accepted by the static session provider.
    pub demo_token: String,
    pub demo_user: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    /// Seed the in-memory directory with sample trips on startup.
    #[serde(default = "default_seed")]
    pub seed: bool,
    pub per_seat_fare: i32,
}

fn default_seed() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overlay, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RUTERA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
