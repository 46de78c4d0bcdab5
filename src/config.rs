use std::{
    collections::HashMap,
    fs::{self, File},
    io::prelude::*,
    net::SocketAddr,
    path::Path,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{logging::StatusLogger, query::QueryOptions};

/// Top-level configuration for the service, loaded from a TOML file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// TCP connect timeout for a status query, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Deadline covering handshake through response, in milliseconds.
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,

    /// Game server port assumed when a queried address has none.
    #[serde(default = "default_server_port")]
    pub default_server_port: u16,

    #[serde(flatten)]
    pub other_fields: HashMap<String, toml::Value>,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_io_timeout_ms() -> u64 {
    10_000
}

fn default_server_port() -> u16 {
    net::DEFAULT_PORT
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            connect_timeout_ms: default_connect_timeout_ms(),
            io_timeout_ms: default_io_timeout_ms(),
            default_server_port: default_server_port(),
            other_fields: HashMap::new(),
        }
    }
}

impl StatusConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path).map_err(ConfigLoadError::Io)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(raw).map_err(ConfigLoadError::Parse)?;

        for (key, value) in &config.other_fields {
            StatusLogger::config_unknown_field(key, value);
        }

        Ok(config)
    }

    /// Loads `path`, writing a default file when it cannot be read.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_or_init(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => {
                // Save config to fill missing fields
                let _ = config.save(path);
                Ok(config)
            }
            Err(ConfigLoadError::Io(_)) => {
                let config = Self::default();
                if config.save(path).is_ok() {
                    StatusLogger::config_generated(&path.display().to_string());
                }
                Ok(config)
            }
            Err(err @ ConfigLoadError::Parse(_)) => Err(err.into()),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_str = toml::to_string(&self)?;
        let mut file = File::create(path)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    /// Applies `BIND` and `PORT` from the environment (or `.env`).
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(bind) = dotenvy::var("BIND") {
            self.bind = bind;
        }
        if let Ok(port) = dotenvy::var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|err| anyhow::anyhow!("invalid PORT '{port}': {err}"))?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .bind
            .trim_matches(|c| c == '[' || c == ']')
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid bind address '{}': {err}", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            io_timeout: Duration::from_millis(self.io_timeout_ms),
            default_port: self.default_server_port,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Could not open config")]
    Io(#[source] std::io::Error),
    #[error("Could not parse config")]
    Parse(#[source] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = StatusConfig::parse("").unwrap();
        assert_eq!(config, StatusConfig::default());
        assert_eq!(config.query_options(), QueryOptions::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = StatusConfig::parse("port = 9000\nio_timeout_ms = 2500\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.query_options().io_timeout, Duration::from_millis(2500));
        assert_eq!(config.query_options().connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_keys_are_kept_aside() {
        let config = StatusConfig::parse("colour = \"blue\"\n").unwrap();
        assert!(config.other_fields.contains_key("colour"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        assert!(matches!(
            StatusConfig::parse("port = \"eighty\""),
            Err(ConfigLoadError::Parse(_))
        ));
    }

    #[test]
    fn listen_addr_accepts_ipv6() {
        let config = StatusConfig {
            bind: "[::]".into(),
            ..StatusConfig::default()
        };
        assert_eq!(config.listen_addr().unwrap().to_string(), "[::]:8080");
    }
}
