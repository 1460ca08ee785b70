use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::core_types::{BlockId, blocks};
use crate::relay::AllocationPolicy;
use crate::relay::error::RelayError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Relay(#[from] RelayError),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    #[serde(default)]
    pub rotation: LogRotation,
    /// Per-unit transfer events (target `RELAY_UNITS`)
    pub enable_tracing: bool,
    #[serde(default)]
    pub relay: RelayConfig,
}

/// How often the log file rolls over
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Largest accepted `search_radius`; the scan visits (2r+1)^3 positions
pub const MAX_SEARCH_RADIUS: i32 = 32;

/// Tunables of the relay core
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Half-side of the cube scanned around a source
    pub search_radius: i32,
    /// Ticks a ghost lives; also the flight duration
    pub ghost_ttl: u32,
    /// A unit moves once the per-job counter exceeds this
    pub transfer_cooldown: u32,
    /// Block that must sit directly under a source container
    pub marker_block: BlockId,
    /// Distance of a transfer point from its container's centre
    pub transfer_point_offset: f64,
    /// Downward shift of both transfer points
    pub ghost_drop: f64,
    /// Tolerance when comparing a ray hit with the intended endpoint
    pub hit_epsilon: f64,
    pub allocation: AllocationPolicy,
    /// Seed for the coordinator's generator; entropy when unset
    pub rng_seed: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            search_radius: 5,
            ghost_ttl: 7,
            transfer_cooldown: 10,
            marker_block: blocks::DIAMOND_BLOCK,
            transfer_point_offset: 1.0,
            ghost_drop: 0.5,
            hit_epsilon: 1e-6,
            allocation: AllocationPolicy::default(),
            rng_seed: None,
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<(), RelayError> {
        if !(0..=MAX_SEARCH_RADIUS).contains(&self.search_radius) {
            return Err(RelayError::InvalidConfig(format!(
                "search_radius must be within 0..={MAX_SEARCH_RADIUS}, got {}",
                self.search_radius
            )));
        }
        if self.ghost_ttl == 0 {
            return Err(RelayError::InvalidConfig(
                "ghost_ttl must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("transfer_point_offset", self.transfer_point_offset),
            ("ghost_drop", self.ghost_drop),
            ("hit_epsilon", self.hit_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RelayError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.relay.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
log_level: info
log_dir: ./logs
log_file: relay.log
rotation: never
enable_tracing: false
"#;

    #[test]
    fn test_relay_defaults_when_section_missing() {
        let config = AppConfig::from_yaml(BASE).unwrap();
        assert_eq!(config.relay, RelayConfig::default());
        assert_eq!(config.relay.search_radius, 5);
        assert_eq!(config.relay.ghost_ttl, 7);
        assert_eq!(config.relay.transfer_cooldown, 10);
    }

    #[test]
    fn test_partial_relay_section() {
        let yaml = format!("{BASE}relay:\n  ghost_ttl: 3\n  allocation: allow_new_stacks\n  rng_seed: 42\n");
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.relay.ghost_ttl, 3);
        assert_eq!(config.relay.allocation, AllocationPolicy::AllowNewStacks);
        assert_eq!(config.relay.rng_seed, Some(42));
        assert_eq!(config.relay.search_radius, 5);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let yaml = format!("{BASE}relay:\n  ghost_ttl: 0\n");
        let err = AppConfig::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Relay(RelayError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_negative_values() {
        let config = RelayConfig {
            search_radius: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RelayConfig {
            ghost_drop: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_radius_upper_bound() {
        let at_limit = RelayConfig {
            search_radius: MAX_SEARCH_RADIUS,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let huge = RelayConfig {
            search_radius: i32::MAX,
            ..Default::default()
        };
        let err = huge.validate().unwrap_err();
        assert!(err.to_string().contains("search_radius"));
    }

    #[test]
    fn test_rotation_parsing() {
        let config = AppConfig::from_yaml(BASE).unwrap();
        assert_eq!(config.rotation, LogRotation::Never);

        let yaml = BASE.replace("rotation: never\n", "");
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.rotation, LogRotation::Daily);

        let yaml = BASE.replace("rotation: never", "rotation: weekly");
        assert!(matches!(
            AppConfig::from_yaml(&yaml).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("does-not-exist").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
