#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! 311 complaint statistics and the result types derived from them.
//!
//! The input types mirror the pre-aggregated JSON the city data pipeline
//! emits: one [`ComplaintData`] per year plus a multi-year [`TrendsData`]
//! with a daily weather series. Day keys are ISO dates (`YYYY-MM-DD`), so
//! the `BTreeMap` ordering is chronological.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Count per key (category, day, month, hour, or weekday).
pub type Counts = BTreeMap<String, u64>;

/// Weather per ISO day.
pub type WeatherSeries = BTreeMap<String, WeatherDay>;

/// 311 statistics for one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodComplaintStats {
    /// Neighborhood name.
    pub name: String,
    /// Requests filed.
    pub total: u64,
    /// Requests closed.
    pub closed: u64,
    /// Mean days from filing to closure. Zero when unknown.
    pub avg_resolution_days: f64,
    /// Requests per category, most frequent categories only.
    #[serde(default)]
    pub top_categories: Counts,
}

/// A heatmap sample: latitude, longitude, category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint(pub f64, pub f64, pub String);

/// One year of city-wide 311 statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintData {
    /// Calendar year covered.
    pub year: i32,
    /// Requests filed city-wide.
    pub total_requests: u64,
    /// Requests per category.
    #[serde(default)]
    pub categories: Counts,
    /// Statistics keyed by two-digit neighborhood number (`"01"`..).
    pub neighborhoods: BTreeMap<String, NeighborhoodComplaintStats>,
    /// Requests per ISO day.
    #[serde(default)]
    pub daily_counts: Counts,
    /// Month (`YYYY-MM`) → category → requests, busiest categories only.
    #[serde(default)]
    pub monthly: BTreeMap<String, Counts>,
    /// Requests per hour of day (`"0"`..`"23"`).
    #[serde(default)]
    pub hourly: Counts,
    /// Requests per weekday (`"0"` is Monday).
    #[serde(default)]
    pub weekday: Counts,
    /// Sampled request locations.
    #[serde(default)]
    pub heatmap_points: Vec<HeatmapPoint>,
}

/// Daily weather observation. Temperatures are `null` on days the
/// archive has no reading for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    /// High temperature, °F.
    pub high: Option<f64>,
    /// Low temperature, °F.
    pub low: Option<f64>,
    /// Precipitation, inches.
    #[serde(default)]
    pub precip: f64,
}

/// Multi-year trends with the daily weather series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsData {
    /// Year → month → requests.
    #[serde(default)]
    pub yearly_monthly: BTreeMap<String, Counts>,
    /// Year → category → requests.
    #[serde(default)]
    pub yearly_categories: BTreeMap<String, Counts>,
    /// Daily weather for the latest year.
    #[serde(alias = "weather2024", default)]
    pub weather: WeatherSeries,
}

/// A neighborhood flagged as an outlier, with its ratio to the mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintHotspot {
    /// Neighborhood key in [`ComplaintData::neighborhoods`].
    pub id: String,
    /// The neighborhood's statistics.
    #[serde(flatten)]
    pub stats: NeighborhoodComplaintStats,
    /// Ratio of the flagged metric to its mean, one decimal.
    pub ratio: f64,
}

/// Complaint volume on rainy versus dry days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RainComparison {
    /// Mean requests on days with more than 0.1 in of rain.
    pub avg_rainy: u64,
    /// Mean requests on the other days.
    pub avg_dry: u64,
    /// Percent difference, rainy relative to dry.
    pub diff: i64,
}

/// Complaint volume the day after heavy rain versus other days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterRainComparison {
    /// Mean requests on days following more than 0.5 in of rain.
    pub avg_after_heavy: u64,
    /// Mean requests on days following lighter or no rain.
    pub avg_normal: u64,
    /// Percent difference, after-heavy relative to normal.
    pub diff: i64,
}

/// Complaint volume on hot versus cool days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureComparison {
    /// Mean requests on days above 90 °F.
    pub avg_hot: u64,
    /// Mean requests on days below 70 °F.
    pub avg_cool: u64,
    /// Percent difference, hot relative to cool.
    pub diff: i64,
}

/// Weather-correlation deltas for a daily request series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInsights {
    /// Rainy versus dry.
    pub rain: RainComparison,
    /// After heavy rain versus normal.
    pub after_rain: AfterRainComparison,
    /// Hot versus cool.
    pub temp: TemperatureComparison,
}

/// Busiest day of the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakDay {
    /// ISO date.
    pub date: String,
    /// Requests filed that day.
    pub count: u64,
}

/// City-wide headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityKpis {
    /// Requests filed.
    pub total_requests: u64,
    /// Mean requests per day over a 365-day year.
    pub per_day: u64,
    /// Share of requests closed, percent, one decimal.
    pub closed_pct: f64,
    /// Requests closed across all neighborhoods.
    pub closed_count: u64,
    /// Mean resolution days over neighborhoods that report one, one decimal.
    pub avg_resolution: f64,
    /// Neighborhood with the longest resolution among those with more
    /// than 100 requests.
    pub slowest: Option<NeighborhoodComplaintStats>,
    /// Busiest day.
    pub peak_day: PeakDay,
}
