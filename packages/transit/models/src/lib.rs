#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transit, grocery, and food-desert reference types.
//!
//! These are the typed forms of the `GeoJSON` and JSON collections the data
//! layer loads: census tracts flagged as food deserts, transit stops with
//! their daily service statistics, route metadata, and grocery stores.
//! The equity analysis result types live here too so that consumers can
//! read them without depending on the analyzer.

use std::collections::{BTreeMap, BTreeSet};

use civic_atlas_geometry::{LatLng, Polygon};
use serde::{Deserialize, Serialize};

/// A census tract from the food-access dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDesertTract {
    /// Census tract identifier.
    pub tract_id: String,
    /// Human-readable tract name.
    pub name: String,
    /// Residents.
    pub population: u64,
    /// Share of residents below the poverty line, 0-100.
    pub poverty_rate_pct: f64,
    /// Median household income, when reported.
    pub median_income: Option<f64>,
    /// Share of households without a vehicle, 0-100.
    pub pct_no_vehicle: f64,
    /// "Low income, low access" designation.
    pub is_lila: bool,
    /// Tract boundary.
    pub geometry: Polygon<f64>,
}

/// A transit stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitStop {
    /// Stop identifier, the key into [`StopStatisticsMap`].
    pub stop_id: String,
    /// Stop location.
    pub location: LatLng,
    /// Display name.
    pub name: Option<String>,
}

/// Daily service statistics for one stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopStatistics {
    /// Scheduled trips per day.
    pub trip_count: u64,
    /// Routes serving the stop.
    #[serde(rename = "routes")]
    pub route_ids: BTreeSet<String>,
}

/// Stop statistics keyed by stop id.
pub type StopStatisticsMap = BTreeMap<String, StopStatistics>;

/// Route metadata from the GTFS routes table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitRoute {
    /// Route identifier.
    pub route_id: String,
    /// Short name (e.g. "70").
    pub route_short_name: String,
    /// Long name (e.g. "Grand").
    pub route_long_name: String,
    /// GTFS route type (3 = bus, 1 = subway/metro, ...).
    #[serde(default)]
    pub route_type: u16,
    /// Hex display color without the leading `#`.
    #[serde(default)]
    pub route_color: String,
}

/// A grocery store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryStore {
    /// Store name.
    pub name: String,
    /// Chain the store belongs to, if any.
    pub chain: Option<String>,
    /// Store location.
    pub location: LatLng,
}

/// Transit-to-grocery equity metrics for one LILA tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityGapResult {
    /// Tract identifier.
    pub tract_id: String,
    /// Tract name.
    pub name: String,
    /// Residents.
    pub population: u64,
    /// Poverty rate, 0-100.
    pub poverty_rate_pct: f64,
    /// Households without a vehicle, 0-100.
    pub pct_no_vehicle: f64,
    /// Stops within the walkshed of the tract centroid.
    pub stops_nearby: u32,
    /// Daily trips summed over the walkshed stops.
    pub total_trip_frequency: u64,
    /// Distance to the closest stop anywhere, `None` without stops.
    pub nearest_stop_distance_miles: Option<f64>,
    /// Distance to the closest grocery store, `None` without stores.
    pub nearest_grocery_distance_miles: Option<f64>,
    /// Name of the closest grocery store.
    pub nearest_grocery_name: Option<String>,
    /// Whether a walkshed stop shares a route with a grocery-adjacent stop.
    pub grocery_accessible: bool,
    /// Door-to-door estimate, only when the grocery is reachable.
    pub transit_time_estimate_minutes: Option<u32>,
    /// Composite equity score, 0-100.
    pub score: u8,
    /// Vertex-mean centroid of the tract.
    pub centroid: LatLng,
}

/// Citywide rollup of an equity analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquitySummary {
    /// LILA tracts in the input.
    pub lila_tracts: usize,
    /// Residents of LILA tracts.
    pub desert_population: u64,
    /// Rounded mean score over analyzed tracts, 0 when none.
    pub average_score: u8,
    /// Tracts scoring below [`EquitySummary::LOW_SCORE_THRESHOLD`].
    pub low_score_tracts: usize,
    /// Tracts with no shared-route path to a grocery store.
    pub no_access_tracts: usize,
}

impl EquitySummary {
    /// Scores below this are counted as critical gaps.
    pub const LOW_SCORE_THRESHOLD: u8 = 30;
}
