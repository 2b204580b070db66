use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinates;
use crate::transport::TransportId;

/// Top-level configuration stored on disk. Every field has a default, so the
/// file is optional and usually absent: the screen works out of the box with
/// the two hard-coded Berlin defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional default transport id, e.g. "client" or "raw".
    pub default_transport: Option<String>,

    /// Whether the position lookup may run at all. This is the terminal
    /// app's stand-in for the foreground location permission.
    pub location_enabled: bool,

    /// Coordinates used when no device location is available.
    pub default_latitude: f64,
    pub default_longitude: f64,

    /// Place name shown when falling back to the default coordinates.
    pub default_place: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_transport: None,
            location_enabled: true,
            default_latitude: 52.52,
            default_longitude: 13.41,
            default_place: "Berlin, Germany".to_string(),
        }
    }
}

impl Config {
    /// Return the configured default transport as a strongly-typed id, or
    /// `None` when the field is unset.
    pub fn default_transport_id(&self) -> Result<Option<TransportId>> {
        self.default_transport
            .as_deref()
            .map(TransportId::try_from)
            .transpose()
    }

    /// Store the default transport as its short name.
    pub fn set_default_transport(&mut self, id: TransportId) {
        self.default_transport = Some(id.as_str().to_string());
    }

    pub fn default_coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.default_latitude,
            longitude: self.default_longitude,
        }
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use the built-in defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_berlin() {
        let cfg = Config::default();

        assert_eq!(cfg.default_latitude, 52.52);
        assert_eq!(cfg.default_longitude, 13.41);
        assert_eq!(cfg.default_place, "Berlin, Germany");
        assert!(cfg.location_enabled);
        assert!(cfg.default_transport.is_none());
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let cfg: Config = toml::from_str("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = Config::default();
        cfg.set_default_transport(TransportId::Raw);
        cfg.location_enabled = false;

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&text).expect("parse");

        assert_eq!(parsed, cfg);
    }

    #[test]
    fn default_transport_id_round_trips() {
        let mut cfg = Config::default();
        assert!(cfg.default_transport_id().expect("unset is fine").is_none());

        cfg.set_default_transport(TransportId::Client);
        let id = cfg.default_transport_id().expect("set id must parse");
        assert_eq!(id, Some(TransportId::Client));
    }

    #[test]
    fn unknown_default_transport_errors() {
        let cfg = Config {
            default_transport: Some("carrier-pigeon".to_string()),
            ..Config::default()
        };

        let err = cfg.default_transport_id().unwrap_err();
        assert!(err.to_string().contains("Unknown transport"));
    }
}
