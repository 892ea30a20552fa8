use birdcam_core::config::{default_zone, parse_utc_offset};
use chrono::FixedOffset;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    BindAddr { var: &'static str, value: String },
    #[error("{var}: {source}")]
    UtcOffset {
        var: &'static str,
        source: birdcam_core::ParseError,
    },
    #[error("{var} is not a byte count: {value}")]
    ByteCount { var: &'static str, value: String },
}

pub const ENV_BIND_ADDR: &str = "BIRDCAM_BIND_ADDR";
pub const ENV_DATA_DIR: &str = "BIRDCAM_DATA_DIR";
pub const ENV_UTC_OFFSET: &str = "BIRDCAM_UTC_OFFSET";
pub const ENV_MAX_UPLOAD_BYTES: &str = "BIRDCAM_MAX_UPLOAD_BYTES";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Holds `sensor_data.ndjson` and the `images/` folder.
    pub data_dir: PathBuf,
    pub utc_offset: FixedOffset,
    pub max_upload_bytes: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("."),
            utc_offset: default_zone(),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `BIRDCAM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(value) = lookup(ENV_BIND_ADDR) {
            cfg.bind_addr = value.parse().map_err(|_| ConfigError::BindAddr {
                var: ENV_BIND_ADDR,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_DATA_DIR) {
            cfg.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_UTC_OFFSET) {
            cfg.utc_offset = parse_utc_offset(&value).map_err(|source| ConfigError::UtcOffset {
                var: ENV_UTC_OFFSET,
                source,
            })?;
        }
        if let Some(value) = lookup(ENV_MAX_UPLOAD_BYTES) {
            cfg.max_upload_bytes = value.parse().map_err(|_| ConfigError::ByteCount {
                var: ENV_MAX_UPLOAD_BYTES,
                value: value.clone(),
            })?;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let cfg = NodeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.utc_offset.local_minus_utc(), 3600);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = NodeConfig::from_lookup(lookup(&[
            (ENV_BIND_ADDR, "127.0.0.1:3000"),
            (ENV_DATA_DIR, "/srv/birdcam"),
            (ENV_UTC_OFFSET, "+02:00"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/birdcam"));
        assert_eq!(cfg.utc_offset.local_minus_utc(), 7200);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(NodeConfig::from_lookup(lookup(&[(ENV_BIND_ADDR, "nowhere")])).is_err());
        assert!(NodeConfig::from_lookup(lookup(&[(ENV_UTC_OFFSET, "CET")])).is_err());
        assert!(NodeConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "lots")])).is_err());
    }
}
