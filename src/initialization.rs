use std::env;
use std::fs;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;
use crate::manager_meteo::MeteoConfig;
use crate::solar_energy::SolarParameters;

/// Full service configuration as read from the toml file
#[derive(Deserialize)]
pub struct Config {
    pub web_server: WebServer,
    #[serde(default)]
    pub meteo: MeteoConfig,
    #[serde(default)]
    pub solar: SolarParameters,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Deserialize)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { level: "info".to_string(), file: None }
    }
}

/// Loads the configuration from the toml file given as the first command line
/// argument and initializes logging from it
///
pub fn config() -> Result<Config, ConfigError> {
    let path = env::args().nth(1).ok_or("missing path to configuration file")?;

    let toml_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&toml_str)?;

    setup_logger(&config.log)?;

    Ok(config)
}
