#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Vacant-property record types.
//!
//! A [`RawProperty`] carries the observed attributes of a parcel. Scoring
//! turns it into a [`VacantProperty`] by attaching the triage score, the
//! per-factor breakdown, and the best future use. The JSON shape flattens
//! both so consumers see a single object per parcel.

use std::collections::BTreeMap;

use civic_atlas_geometry::LatLng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Whether the parcel has a structure on it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PropertyType {
    /// A standing structure.
    Building,
    /// An empty lot.
    Lot,
}

/// Who holds title to the parcel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Owner {
    /// Land Reutilization Authority.
    Lra,
    /// The city itself.
    City,
    /// A private owner.
    Private,
}

/// Candidate reuse for a vacant parcel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BestUse {
    /// Rehab or infill housing.
    Housing,
    /// Community solar.
    Solar,
    /// Community garden or green space.
    Garden,
}

/// Board-up state of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum BoardUpStatus {
    /// Openings are boarded.
    Boarded,
    /// Openings are exposed.
    Open,
    /// Secured by other means.
    Secured,
    /// Lots have nothing to board.
    #[serde(rename = "N/A")]
    #[strum(serialize = "N/A")]
    NotApplicable,
}

/// How confident we are that the parcel is actually vacant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum VacancyCategory {
    /// Condemned or LRA-held.
    Definite,
    /// Several years tax delinquent.
    #[serde(rename = "Very Likely")]
    #[strum(serialize = "Very Likely")]
    VeryLikely,
    /// Repeated code violations.
    Possibly,
    /// Not enough signal either way.
    Indeterminant,
}

/// Resolution state of a 311 complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum ComplaintStatus {
    /// Still open.
    Open,
    /// Resolved.
    Closed,
}

/// A recent 311 complaint filed against the parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentComplaint {
    /// Complaint category label.
    pub category: String,
    /// Filing date (`YYYY-MM-DD`).
    pub date: String,
    /// Current status.
    pub status: ComplaintStatus,
}

/// Observed attributes of a vacant parcel, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    /// Sequential identifier.
    pub id: u32,
    /// Assessor parcel number.
    pub parcel_id: String,
    /// Street address.
    pub address: String,
    /// ZIP code.
    pub zip: String,
    /// Parcel location.
    #[serde(flatten)]
    pub location: LatLng,
    /// City ward.
    pub ward: u8,
    /// Neighborhood label (free text, not a key).
    pub neighborhood: String,
    /// Building or lot.
    pub property_type: PropertyType,
    /// Title holder.
    pub owner: Owner,
    /// 1 (condemned) to 5 (sound).
    pub condition_rating: u8,
    /// Lot area in square feet.
    pub lot_sq_ft: u32,
    /// Zoning district code.
    pub zoning: String,
    /// Consecutive years of unpaid property tax.
    pub tax_years_delinquent: u32,
    /// 311 complaints filed nearby.
    pub complaints_nearby: u32,
    /// Access to transit, jobs and services, 0-100.
    pub proximity_score: u8,
    /// Market demand for the neighborhood, 0-100.
    pub neighborhood_demand: u8,
    /// Board-up state.
    pub board_up_status: BoardUpStatus,
    /// Open code violations.
    pub violation_count: u32,
    /// Whether the structure is condemned.
    pub condemned: bool,
    /// Assessed value in dollars.
    pub assessed_value: u32,
    /// Construction year, buildings only.
    pub year_built: Option<u16>,
    /// Stories, 0 for lots.
    pub stories: u8,
    /// Most recent complaints, oldest draw first.
    pub recent_complaints: Vec<RecentComplaint>,
    /// Vacancy likelihood label.
    pub vacancy_category: VacancyCategory,
}

/// A factor in the composite triage score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ScoringFactor {
    /// Structural condition, worse scores higher.
    Condition,
    /// Nearby 311 complaint volume.
    ComplaintDensity,
    /// Lot area.
    LotSize,
    /// Ease of acquisition given the owner.
    Ownership,
    /// Access to transit and services.
    Proximity,
    /// Years of unpaid tax.
    TaxDelinquency,
}

impl ScoringFactor {
    /// Weight of this factor in whole percent. The weights sum to 100.
    #[must_use]
    pub const fn weight_pct(self) -> u32 {
        match self {
            Self::Condition => 25,
            Self::ComplaintDensity => 20,
            Self::LotSize => 10,
            Self::Ownership | Self::Proximity | Self::TaxDelinquency => 15,
        }
    }

    /// Weight of this factor as a fraction of 1.
    #[must_use]
    pub fn weight(self) -> f64 {
        f64::from(self.weight_pct()) / 100.0
    }
}

/// Per-factor sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// See [`ScoringFactor::Condition`].
    pub condition: u8,
    /// See [`ScoringFactor::ComplaintDensity`].
    pub complaint_density: u8,
    /// See [`ScoringFactor::LotSize`].
    pub lot_size: u8,
    /// See [`ScoringFactor::Ownership`].
    pub ownership: u8,
    /// See [`ScoringFactor::Proximity`].
    pub proximity: u8,
    /// See [`ScoringFactor::TaxDelinquency`].
    pub tax_delinquency: u8,
}

impl ScoreBreakdown {
    /// Returns the sub-score for `factor`.
    #[must_use]
    pub const fn get(&self, factor: ScoringFactor) -> u8 {
        match factor {
            ScoringFactor::Condition => self.condition,
            ScoringFactor::ComplaintDensity => self.complaint_density,
            ScoringFactor::LotSize => self.lot_size,
            ScoringFactor::Ownership => self.ownership,
            ScoringFactor::Proximity => self.proximity,
            ScoringFactor::TaxDelinquency => self.tax_delinquency,
        }
    }
}

/// Composite triage score with its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageScore {
    /// Weighted total, 0-100.
    pub total: u8,
    /// Per-factor sub-scores.
    pub breakdown: ScoreBreakdown,
}

/// Unnormalized suitability of a parcel for each reuse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UseSuitability {
    /// Housing suitability.
    pub housing: f64,
    /// Solar suitability.
    pub solar: f64,
    /// Garden suitability.
    pub garden: f64,
}

impl UseSuitability {
    /// The highest-scoring use. Ties go to housing, then solar.
    #[must_use]
    pub fn best(&self) -> BestUse {
        if self.housing >= self.solar && self.housing >= self.garden {
            BestUse::Housing
        } else if self.solar >= self.garden {
            BestUse::Solar
        } else {
            BestUse::Garden
        }
    }
}

/// A scored vacant parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacantProperty {
    /// Observed attributes.
    #[serde(flatten)]
    pub raw: RawProperty,
    /// Composite triage score, 0-100.
    pub triage_score: u8,
    /// Per-factor sub-scores.
    pub score_breakdown: ScoreBreakdown,
    /// Recommended reuse.
    pub best_use: BestUse,
}

/// Criteria for narrowing a property list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    /// Only this recommended use.
    pub best_use: Option<BestUse>,
    /// Only this owner.
    pub owner: Option<Owner>,
    /// Only buildings or only lots.
    pub property_type: Option<PropertyType>,
    /// Only this neighborhood label.
    pub neighborhood: Option<String>,
    /// Minimum triage score.
    #[serde(default)]
    pub min_score: u8,
}

impl PropertyFilter {
    /// Whether `property` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, property: &VacantProperty) -> bool {
        property.triage_score >= self.min_score
            && self.best_use.is_none_or(|u| property.best_use == u)
            && self.owner.is_none_or(|o| property.raw.owner == o)
            && self
                .property_type
                .is_none_or(|t| property.raw.property_type == t)
            && self
                .neighborhood
                .as_deref()
                .is_none_or(|n| property.raw.neighborhood == n)
    }
}

/// Headline numbers for a set of properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancySummary {
    /// Properties in the set.
    pub count: usize,
    /// Rounded mean triage score, 0 for an empty set.
    pub average_triage_score: u8,
    /// LRA-held properties.
    pub lra_count: usize,
    /// Properties at or above [`VacancySummary::HIGH_PRIORITY_SCORE`].
    pub high_priority_count: usize,
    /// Count per recommended use.
    pub by_best_use: BTreeMap<BestUse, usize>,
}

impl VacancySummary {
    /// Triage score at which a property counts as high priority.
    pub const HIGH_PRIORITY_SCORE: u8 = 80;
}
