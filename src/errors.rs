use std::fmt;
use std::fmt::Formatter;
use log4rs::config::runtime::ConfigErrors;
use log::SetLoggerError;
use crate::manager_meteo::errors::MeteoError;

/// Error representing an unrecoverable error that will halt the application
///
#[derive(Debug)]
pub struct UnrecoverableError(pub String);
impl fmt::Display for UnrecoverableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "UnrecoverableError: {}", self.0)
    }
}
impl From<std::io::Error> for UnrecoverableError {
    fn from(e: std::io::Error) -> Self { UnrecoverableError(e.to_string()) }
}
impl From<ConfigError> for UnrecoverableError {
    fn from(e: ConfigError) -> Self {
        UnrecoverableError(e.to_string())
    }
}
impl From<MeteoError> for UnrecoverableError {
    fn from(e: MeteoError) -> Self { UnrecoverableError(e.to_string()) }
}

/// Errors while managing configuration
///
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<SetLoggerError> for ConfigError {
    fn from(e: SetLoggerError) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<ConfigErrors> for ConfigError {
    fn from(e: ConfigErrors) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError(e.to_string())
    }
}

/// Errors from the forecast aggregation, an empty period or a period with
/// missing values
///
#[derive(Debug)]
pub enum SummaryError {
    EmptyInput(String),
    MalformedData(String),
}
impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SummaryError::EmptyInput(e) => write!(f, "SummaryError::EmptyInput: {}", e),
            SummaryError::MalformedData(e) => write!(f, "SummaryError::MalformedData: {}", e),
        }
    }
}

/// Error raised when the energy estimator is handed a duration outside its
/// domain
#[derive(Debug)]
pub struct EnergyError(pub String);
impl fmt::Display for EnergyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "EnergyError: {}", self.0) }
}
