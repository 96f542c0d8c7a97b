// Engine settings: JSON file named by ENGINE_CONFIG, then ENGINE_HOST / ENGINE_PORT overrides.
use serde::Deserialize;
use shared::models::PolicyRates;
use std::net::SocketAddr;

use crate::error::EngineError;
use crate::projection::validation::validate_rates;

pub const CONFIG_PATH_VAR: &str = "ENGINE_CONFIG";
pub const HOST_VAR: &str = "ENGINE_HOST";
pub const PORT_VAR: &str = "ENGINE_PORT";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    pub max_connections: usize,
    /// Rates used whenever a request does not carry its own.
    pub rates: PolicyRates,
    /// Seed the store with one live listing built from the default figures.
    pub seed_demo_data: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "127.0.0.1".to_string(),
            port: 50051,
            max_connections: 10,
            rates: PolicyRates::default(),
            seed_demo_data: false,
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: &str) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("cannot read settings file '{}': {}", path, e)))?;
        Self::from_json_str(&json)
    }

    /// Settings from the process environment.
    pub fn load() -> Result<Self, EngineError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    fn load_with<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                tracing::info!(path = %path, "Loading engine settings from file");
                Self::load_from_file(&path)?
            }
            None => Self::default(),
        };
        if let Some(host) = lookup(HOST_VAR) {
            settings.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            settings.port = port
                .trim()
                .parse()
                .map_err(|e| EngineError::ConfigError(format!("{} must be a port number, got '{}': {}", PORT_VAR, port, e)))?;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_connections == 0 {
            return Err(EngineError::ConfigError("maxConnections must be at least 1".to_string()));
        }
        validate_rates(&self.rates).map_err(|e| EngineError::ConfigError(format!("default rates: {}", e)))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, EngineError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| EngineError::ConfigError(format!("invalid listen address '{}:{}': {}", self.host, self.port, e)))
    }
}
