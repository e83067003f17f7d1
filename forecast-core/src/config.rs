use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, fs, path::PathBuf, time::Duration};

use crate::{
    model::{GeoPoint, SEOUL_CITY_HALL, TemperatureUnit},
    provider::DEFAULT_TIMEOUT,
    region::{Region, RegionTable},
};

/// Environment variable that takes precedence over the stored service key.
pub const SERVICE_KEY_ENV: &str = "FORECAST_SERVICE_KEY";

/// Mid-range ids for one extra region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Numeric feed id, e.g. "11H20201".
    pub id: String,
    /// Land outlook id, e.g. "11H20000".
    pub land_id: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// data.go.kr service key, the decoded form (not URL-encoded).
    pub service_key: Option<String>,

    /// HTTP timeout for every upstream call.
    pub timeout_secs: Option<u64>,

    /// Display unit, `"C"` or `"F"`.
    pub unit: Option<TemperatureUnit>,

    /// Location used when `show` gets no coordinates.
    pub default_location: Option<GeoPoint>,

    /// Example TOML:
    /// [regions."부산광역시"]
    /// id = "11H20201"
    /// land_id = "11H20000"
    #[serde(default)]
    pub regions: BTreeMap<String, RegionConfig>,
}

impl Config {
    pub fn service_key(&self) -> Option<String> {
        self.service_key.clone().filter(|key| !key.trim().is_empty())
    }

    /// Replace the stored key with `FORECAST_SERVICE_KEY` when that is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env::var(SERVICE_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            self.service_key = Some(key);
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit.unwrap_or_default()
    }

    pub fn location(&self) -> GeoPoint {
        self.default_location.unwrap_or(SEOUL_CITY_HALL)
    }

    /// Built-in regions followed by the configured extras.
    pub fn region_table(&self) -> RegionTable {
        RegionTable::with_extra(
            self.regions.iter().map(|(name, ids)| Region::new(name, &ids.id, &ids.land_id)),
        )
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
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

        tracing::info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
