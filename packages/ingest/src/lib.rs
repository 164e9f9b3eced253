#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parses the cleaned source files into typed records.
//!
//! Callers read the files; these functions only see text. `GeoJSON`
//! collections (tracts, stops, groceries, neighborhood boundaries) go
//! through the `geojson` crate and come out as `geo` polygons and
//! `LatLng` points. Plain JSON tables go straight through serde.
//!
//! Parsing is strict: the first malformed feature fails the whole
//! collection, and the error names that feature's index.

mod features;

use civic_atlas_complaints_models::{ComplaintData, TrendsData};
use civic_atlas_neighborhood_models::NeighborhoodBoundary;
use civic_atlas_transit_models::{
    FoodDesertTract, GroceryStore, StopStatisticsMap, TransitRoute, TransitStop,
};
use thiserror::Error;

/// Errors that can occur while parsing source files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but is not a `FeatureCollection`.
    #[error("Expected a FeatureCollection, found a {found}")]
    NotFeatureCollection {
        /// The top-level `GeoJSON` type found instead.
        found: &'static str,
    },

    /// A feature has a null geometry.
    #[error("Feature {index} has no geometry")]
    MissingGeometry {
        /// Position of the feature in its collection.
        index: usize,
    },

    /// A feature's geometry could not be converted.
    #[error("Feature {index} has invalid geometry: {source}")]
    InvalidGeometry {
        /// Position of the feature in its collection.
        index: usize,
        /// Conversion failure.
        source: geojson::Error,
    },

    /// A feature's geometry is the wrong type for the collection.
    #[error("Feature {index} has unsupported geometry type {kind}")]
    UnsupportedGeometry {
        /// Position of the feature in its collection.
        index: usize,
        /// The geometry type found.
        kind: &'static str,
    },

    /// A required property is absent or null.
    #[error("Feature {index} is missing property '{name}'")]
    MissingProperty {
        /// Position of the feature in its collection.
        index: usize,
        /// Property name.
        name: &'static str,
    },

    /// A property has the wrong JSON type.
    #[error("Feature {index} has invalid property '{name}': {found}")]
    InvalidProperty {
        /// Position of the feature in its collection.
        index: usize,
        /// Property name.
        name: &'static str,
        /// The value found.
        found: String,
    },
}

/// Parses the food-access tract collection.
///
/// A `median_income` of 0 is the source's placeholder for "not reported"
/// and becomes `None`.
///
/// # Errors
///
/// Returns [`IngestError`] if the text is not a `FeatureCollection` or any
/// feature lacks a polygon or a required property.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_tracts(text: &str) -> Result<Vec<FoodDesertTract>, IngestError> {
    let collection = features::collection(text)?;

    let tracts = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            Ok(FoodDesertTract {
                tract_id: features::string(feature, index, "tract_id")?,
                name: features::string(feature, index, "name")?,
                population: features::number(feature, index, "pop")?.max(0.0).round() as u64,
                poverty_rate_pct: features::number(feature, index, "poverty_rate")?,
                median_income: features::optional_number(feature, index, "median_income")?
                    .filter(|income| *income > 0.0),
                pct_no_vehicle: features::number(feature, index, "pct_no_vehicle")?,
                is_lila: features::flag(feature, index, "lila")?,
                geometry: features::polygon(feature, index)?,
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    log::debug!("Parsed {} tracts", tracts.len());
    Ok(tracts)
}

/// Parses the transit stop collection.
///
/// # Errors
///
/// Returns [`IngestError`] if the text is not a `FeatureCollection` or any
/// feature lacks a point or a `stop_id`.
pub fn parse_stops(text: &str) -> Result<Vec<TransitStop>, IngestError> {
    let collection = features::collection(text)?;

    let stops = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            Ok(TransitStop {
                stop_id: features::string(feature, index, "stop_id")?,
                location: features::point(feature, index)?,
                name: features::optional_string(feature, "stop_name"),
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    log::debug!("Parsed {} stops", stops.len());
    Ok(stops)
}

/// Parses the grocery store collection.
///
/// # Errors
///
/// Returns [`IngestError`] if the text is not a `FeatureCollection` or any
/// feature lacks a point or a `name`.
pub fn parse_groceries(text: &str) -> Result<Vec<GroceryStore>, IngestError> {
    let collection = features::collection(text)?;

    let stores = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            Ok(GroceryStore {
                name: features::string(feature, index, "name")?,
                chain: features::optional_string(feature, "chain"),
                location: features::point(feature, index)?,
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    log::debug!("Parsed {} grocery stores", stores.len());
    Ok(stores)
}

/// Parses the city neighborhood boundary collection (`NHD_NUM`,
/// `NHD_NAME`).
///
/// # Errors
///
/// Returns [`IngestError`] if the text is not a `FeatureCollection` or any
/// feature lacks a polygon, a number, or a name.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_neighborhoods(text: &str) -> Result<Vec<NeighborhoodBoundary>, IngestError> {
    let collection = features::collection(text)?;

    let boundaries = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            Ok(NeighborhoodBoundary {
                number: features::number(feature, index, "NHD_NUM")?.max(0.0) as u32,
                name: features::string(feature, index, "NHD_NAME")?,
                geometry: features::polygon(feature, index)?,
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    log::debug!("Parsed {} neighborhood boundaries", boundaries.len());
    Ok(boundaries)
}

/// Parses per-stop service statistics (`{ stop_id: { trip_count, routes } }`).
///
/// # Errors
///
/// Returns [`IngestError::Json`] on malformed input.
pub fn parse_stop_statistics(text: &str) -> Result<StopStatisticsMap, IngestError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses the route table.
///
/// # Errors
///
/// Returns [`IngestError::Json`] on malformed input.
pub fn parse_routes(text: &str) -> Result<Vec<TransitRoute>, IngestError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses one year of 311 statistics.
///
/// # Errors
///
/// Returns [`IngestError::Json`] on malformed input.
pub fn parse_complaints(text: &str) -> Result<ComplaintData, IngestError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses the multi-year trends file.
///
/// # Errors
///
/// Returns [`IngestError::Json`] on malformed input.
pub fn parse_trends(text: &str) -> Result<TrendsData, IngestError> {
    Ok(serde_json::from_str(text)?)
}

/// Finds a boundary by neighborhood number.
#[must_use]
pub fn find_neighborhood(
    boundaries: &[NeighborhoodBoundary],
    number: u32,
) -> Option<&NeighborhoodBoundary> {
    boundaries.iter().find(|b| b.number == number)
}
