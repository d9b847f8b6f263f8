//! Server endpoint configuration.
//!
//! The backend address lives in `{config_dir}/washbook/server.toml` and can
//! be overridden per invocation from the command line. A missing or
//! unreadable file falls back to the built-in default rather than failing,
//! so the binary works out of the box on a LAN with the default port.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "192.168.1.100";
const DEFAULT_PORT: u16 = 5000;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Base URL of the booking backend, e.g. `http://10.10.20.47:5000`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Path of the config file, if a platform config directory exists.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("washbook").join("server.toml"))
}

/// Load the server config, falling back to the default when the file is
/// absent. A file that exists but does not parse is an error; silently
/// ignoring it would hide typos.
pub fn load() -> Result<ServerConfig> {
    let Some(path) = config_file_path() else {
        return Ok(ServerConfig::default());
    };
    if !path.exists() {
        log::debug!("no config file at {}, using defaults", path.display());
        return Ok(ServerConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read config file {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse config file {}", path.display()))
}

fn parse(raw: &str) -> Result<ServerConfig> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_joins_host_and_port() {
        let cfg = ServerConfig {
            host: "10.10.20.47".into(),
            port: 5000,
            request_timeout: Duration::from_secs(10),
        };
        assert_eq!(cfg.base_url(), "http://10.10.20.47:5000");
    }

    #[test]
    fn parse_fills_missing_fields_with_defaults() {
        let cfg = parse("host = \"10.0.0.7\"\n").expect("partial config should parse");
        assert_eq!(cfg.host, "10.0.0.7");
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn parse_reads_humantime_timeout() {
        let cfg = parse("request_timeout = \"30s\"\n").expect("timeout should parse");
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse("port = \"not a number\"").is_err());
    }
}
