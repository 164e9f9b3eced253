#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood boundary and report card types.
//!
//! A report card condenses four signals for one neighborhood into 0-100
//! sub-scores and a composite: transit access, 311 health, food access,
//! and inverse vacancy distress.

use civic_atlas_complaints_models::NeighborhoodComplaintStats;
use civic_atlas_geometry::{LatLng, Polygon};
use civic_atlas_transit_models::TransitRoute;
use civic_atlas_vacancy_models::VacancySummary;
use serde::{Deserialize, Serialize};

/// A city neighborhood boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodBoundary {
    /// Official neighborhood number.
    pub number: u32,
    /// Official neighborhood name.
    pub name: String,
    /// Boundary polygon.
    pub geometry: Polygon<f64>,
}

impl NeighborhoodBoundary {
    /// Two-digit key used by the 311 statistics (`5` -> `"05"`).
    #[must_use]
    pub fn key(&self) -> String {
        format!("{:02}", self.number)
    }
}

/// Sub-scores and composite, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardScores {
    /// Walkshed stop count and service frequency.
    pub transit: f64,
    /// Fewer 311 requests scores higher.
    pub complaints: f64,
    /// Distance banding to the nearest grocery.
    pub food: u8,
    /// 100 minus the mean triage score of local vacancies.
    pub vacancy: u8,
    /// Rounded mean of the four sub-scores.
    pub composite: u8,
}

/// Transit service within walking distance of the neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitAccess {
    /// Stops within the walkshed.
    pub stops_nearby: usize,
    /// Routes serving those stops, in route-table order.
    pub routes: Vec<TransitRoute>,
    /// Daily trips summed over those stops.
    pub total_trips: u64,
}

/// Grocery access from the neighborhood centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodAccess {
    /// Nearest store, if any stores are known.
    pub nearest_grocery_name: Option<String>,
    /// Distance to the nearest store in miles.
    pub nearest_grocery_miles: Option<f64>,
    /// A LILA tract centroid lies within half a mile.
    pub in_food_desert: bool,
}

/// A high-priority vacant parcel in the neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyCandidate {
    /// Property id.
    pub id: u32,
    /// Street address.
    pub address: String,
    /// Triage score.
    pub triage_score: u8,
}

/// Combined neighborhood profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCard {
    /// Two-digit neighborhood key.
    pub key: String,
    /// Neighborhood name.
    pub name: String,
    /// Point the distance-based signals are measured from.
    pub centroid: LatLng,
    /// Scores.
    pub scores: ReportCardScores,
    /// Transit detail.
    pub transit: TransitAccess,
    /// Food access detail.
    pub food: FoodAccess,
    /// 311 statistics, when the neighborhood has any.
    pub complaints: Option<NeighborhoodComplaintStats>,
    /// Most frequent complaint categories, busiest first.
    pub top_categories: Vec<(String, u64)>,
    /// Vacancy rollup for the neighborhood.
    pub vacancy: VacancySummary,
    /// Highest-scoring vacant parcels, best first.
    pub top_candidates: Vec<VacancyCandidate>,
}
