//! Data directory configuration.
//!
//! An optional `civic_atlas.toml` names the data directory and the file
//! each dataset is read from. The `CIVIC_ATLAS_DATA_DIR` environment
//! variable overrides the file, and `--data-dir` overrides both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "CIVIC_ATLAS_DATA_DIR";
/// Data directory used when nothing else names one.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Errors loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`Config`].
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// File names of each dataset, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    /// Food-access tracts (`GeoJSON`).
    pub tracts: String,
    /// Transit stops (`GeoJSON`).
    pub stops: String,
    /// Per-stop service statistics (JSON).
    pub stop_stats: String,
    /// Route table (JSON).
    pub routes: String,
    /// Grocery stores (`GeoJSON`).
    pub groceries: String,
    /// Neighborhood boundaries (`GeoJSON`).
    pub neighborhoods: String,
    /// Latest year of 311 statistics (JSON).
    pub complaints: String,
    /// Multi-year trends with daily weather (JSON).
    pub trends: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            tracts: "food_deserts.geojson".to_string(),
            stops: "stops.geojson".to_string(),
            stop_stats: "stop_stats.json".to_string(),
            routes: "routes.json".to_string(),
            groceries: "grocery_stores.geojson".to_string(),
            neighborhoods: "neighborhoods.geojson".to_string(),
            complaints: "csb_latest.json".to_string(),
            trends: "trends.json".to_string(),
        }
    }
}

/// Contents of `civic_atlas.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory, if the file names one.
    pub data_dir: Option<PathBuf>,
    /// Dataset file names.
    pub files: DataFiles,
}

impl Config {
    /// Parses a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `text` does not describe a [`Config`].
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads the config at `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded config from {}", path.display());

        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Picks the data directory: `flag` wins over `env`, which wins over
    /// the config file, which wins over [`DEFAULT_DATA_DIR`].
    #[must_use]
    pub fn resolve_data_dir(&self, env: Option<PathBuf>, flag: Option<PathBuf>) -> PathBuf {
        flag.or(env)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}
