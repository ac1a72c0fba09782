//! Configuration management for the YSF reflector
//!
//! Settings come from an optional TOML file, then `YSF_REFLECTOR_*`
//! environment variables, with built-in defaults for anything left unset.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::protocol::reflector_id;
use crate::protocol::responses::{STATUS_DESCRIPTION_LENGTH, STATUS_NAME_LENGTH};

/// Default config file, looked up relative to the working directory (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "ysf-reflector";

/// Environment prefix, e.g. `YSF_REFLECTOR_PORT=42001`
pub const ENV_PREFIX: &str = "YSF_REFLECTOR";

/// Complete reflector configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReflectorConfig {
    /// IP address the UDP socket binds to
    pub bind_address: String,

    /// UDP port gateways poll
    pub port: u16,

    /// Name reported in status replies (16 characters max)
    pub name: String,

    /// Description reported in status replies (14 characters max)
    pub description: String,

    /// Status id; derived from `name` when unset
    pub reflector_id: Option<u32>,

    /// Seconds without a poll before a gateway is unlinked
    pub client_timeout_secs: u64,

    /// Seconds between timeout sweeps
    pub sweep_interval_secs: u64,

    /// Maximum linked gateways, 0 for unlimited
    pub max_clients: usize,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 42000,
            name: "YSF Reflector".to_string(),
            description: "Rust reflector".to_string(),
            reflector_id: None,
            client_timeout_secs: 60,
            sweep_interval_secs: 5,
            max_clients: 0,
        }
    }
}

impl ReflectorConfig {
    /// Load configuration from a TOML file with environment overrides
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ReflectorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.name.trim().is_empty() {
            return Err(ConfigError::Message("name cannot be empty".into()));
        }

        if self.name.len() > STATUS_NAME_LENGTH {
            return Err(ConfigError::Message(format!(
                "name must be at most {} characters",
                STATUS_NAME_LENGTH
            )));
        }

        if self.description.len() > STATUS_DESCRIPTION_LENGTH {
            return Err(ConfigError::Message(format!(
                "description must be at most {} characters",
                STATUS_DESCRIPTION_LENGTH
            )));
        }

        if matches!(self.reflector_id, Some(id) if id >= 100_000) {
            return Err(ConfigError::Message(
                "reflector_id must have at most 5 digits".into(),
            ));
        }

        if self.client_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "client_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Message(
                "sweep_interval_secs must be greater than 0".into(),
            ));
        }

        if self.sweep_interval_secs > self.client_timeout_secs {
            return Err(ConfigError::Message(
                "sweep_interval_secs cannot exceed client_timeout_secs".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Id reported in status replies
    pub fn status_id(&self) -> u32 {
        self.reflector_id.unwrap_or_else(|| reflector_id(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReflectorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:42000");
        assert_eq!(config.client_timeout(), Duration::from_secs(60));
        assert_eq!(config.status_id(), reflector_id("YSF Reflector"));
    }

    #[test]
    fn test_explicit_id_wins() {
        let config = ReflectorConfig {
            reflector_id: Some(12345),
            ..ReflectorConfig::default()
        };
        assert_eq!(config.status_id(), 12345);
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            ReflectorConfig {
                port: 0,
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                name: "  ".into(),
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                name: "Seventeen chars!!".into(),
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                description: "Fifteen chars!!".into(),
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                reflector_id: Some(100_000),
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                client_timeout_secs: 0,
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                sweep_interval_secs: 0,
                ..ReflectorConfig::default()
            },
            ReflectorConfig {
                client_timeout_secs: 10,
                sweep_interval_secs: 30,
                ..ReflectorConfig::default()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "port = 42100\nname = \"Club\"\ndescription = \"Weekly net\"\nclient_timeout_secs = 120"
        )
        .unwrap();

        let config = ReflectorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.port, 42100);
        assert_eq!(config.name, "Club");
        assert_eq!(config.description, "Weekly net");
        assert_eq!(config.client_timeout_secs, 120);
        // Unset keys fall back to defaults.
        assert_eq!(config.sweep_interval_secs, 5);
        assert_eq!(config.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 0").unwrap();
        assert!(ReflectorConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let path = Path::new("/nonexistent/ysf-reflector.toml");
        assert!(ReflectorConfig::load(Some(path)).is_err());
    }
}
