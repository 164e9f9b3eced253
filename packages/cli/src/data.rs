//! Reads datasets from the data directory.

use std::path::{Path, PathBuf};

use civic_atlas_complaints_models::{ComplaintData, TrendsData};
use civic_atlas_ingest::{
    IngestError, parse_complaints, parse_groceries, parse_neighborhoods, parse_routes,
    parse_stop_statistics, parse_stops, parse_tracts, parse_trends,
};
use civic_atlas_neighborhood_models::NeighborhoodBoundary;
use civic_atlas_transit_models::{
    FoodDesertTract, GroceryStore, StopStatisticsMap, TransitRoute, TransitStop,
};

use crate::config::DataFiles;

/// Errors loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Dataset path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file did not parse.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// Dataset path.
        path: PathBuf,
        /// Underlying ingest error.
        source: IngestError,
    },
}

/// A data directory and the names of the files inside it.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    files: DataFiles,
}

impl DataDir {
    #[must_use]
    pub const fn new(root: PathBuf, files: DataFiles) -> Self {
        Self { root, files }
    }

    fn load<T>(
        &self,
        name: &str,
        parse: impl FnOnce(&str) -> Result<T, IngestError>,
    ) -> Result<T, LoadError> {
        let path = self.root.join(name);
        let text = read(&path)?;
        let parsed = parse(&text).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded {}", path.display());
        Ok(parsed)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn tracts(&self) -> Result<Vec<FoodDesertTract>, LoadError> {
        self.load(&self.files.tracts, parse_tracts)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn stops(&self) -> Result<Vec<TransitStop>, LoadError> {
        self.load(&self.files.stops, parse_stops)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn stop_stats(&self) -> Result<StopStatisticsMap, LoadError> {
        self.load(&self.files.stop_stats, parse_stop_statistics)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn routes(&self) -> Result<Vec<TransitRoute>, LoadError> {
        self.load(&self.files.routes, parse_routes)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn groceries(&self) -> Result<Vec<GroceryStore>, LoadError> {
        self.load(&self.files.groceries, parse_groceries)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn neighborhoods(&self) -> Result<Vec<NeighborhoodBoundary>, LoadError> {
        self.load(&self.files.neighborhoods, parse_neighborhoods)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn complaints(&self) -> Result<ComplaintData, LoadError> {
        self.load(&self.files.complaints, parse_complaints)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or parsed.
    pub fn trends(&self) -> Result<TrendsData, LoadError> {
        self.load(&self.files.trends, parse_trends)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
