#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Triage scoring and best-use classification for vacant parcels.
//!
//! The triage score ranks parcels for intervention: six sub-scores, each
//! 0-100, combined with the fixed weights on [`ScoringFactor`]. Best use
//! compares three independent suitability heuristics and picks the
//! largest.

use civic_atlas_geometry::round_half_up;
use civic_atlas_vacancy_models::{
    BestUse, Owner, PropertyType, RawProperty, ScoreBreakdown, ScoringFactor, TriageScore,
    UseSuitability, VacantProperty,
};

/// Complaints nearby at which the complaint-density factor saturates.
const COMPLAINT_SATURATION: f64 = 20.0;
/// Lot area at which the lot-size factor saturates.
const LOT_SATURATION_SQ_FT: f64 = 10_000.0;
/// Years delinquent at which the tax factor saturates.
const TAX_SATURATION_YEARS: f64 = 10.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: f64) -> u8 {
    round_half_up(value).clamp(0.0, 100.0) as u8
}

/// Computes the composite triage score and its breakdown.
#[must_use]
pub fn score_triage(property: &RawProperty) -> TriageScore {
    let breakdown = ScoreBreakdown {
        condition: percent((5.0 - f64::from(property.condition_rating)) / 4.0 * 100.0),
        complaint_density: percent(
            f64::from(property.complaints_nearby) / COMPLAINT_SATURATION * 100.0,
        ),
        lot_size: percent((f64::from(property.lot_sq_ft) / LOT_SATURATION_SQ_FT).min(1.0) * 100.0),
        ownership: ownership_score(property),
        proximity: property.proximity_score.min(100),
        tax_delinquency: percent(
            f64::from(property.tax_years_delinquent) / TAX_SATURATION_YEARS * 100.0,
        ),
    };

    TriageScore {
        total: weighted_total(&breakdown),
        breakdown,
    }
}

/// LRA parcels are the easiest to acquire, city parcels next; private
/// parcels become acquirable as tax delinquency accumulates.
fn ownership_score(property: &RawProperty) -> u8 {
    match property.owner {
        Owner::Lra => 100,
        Owner::City => 70,
        Owner::Private => percent(f64::from(property.tax_years_delinquent) / 5.0 * 50.0),
    }
}

/// Weighted sum of the sub-scores, rounded half-up.
///
/// Weights are whole percentages so the sum is exact integer arithmetic.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn weighted_total(breakdown: &ScoreBreakdown) -> u8 {
    use strum::IntoEnumIterator as _;

    let weighted: u32 = ScoringFactor::iter()
        .map(|factor| factor.weight_pct() * u32::from(breakdown.get(factor)))
        .sum();

    ((weighted + 50) / 100).min(100) as u8
}

/// Suitability of the parcel for each candidate reuse.
#[must_use]
pub fn use_suitability(property: &RawProperty) -> UseSuitability {
    UseSuitability {
        housing: housing_fit(property),
        solar: solar_fit(property),
        garden: garden_fit(property),
    }
}

/// The best reuse for the parcel. Ties resolve housing, solar, garden.
#[must_use]
pub fn determine_best_use(property: &RawProperty) -> BestUse {
    use_suitability(property).best()
}

/// Scores a raw parcel and freezes the derived fields onto it.
#[must_use]
pub fn score_property(raw: RawProperty) -> VacantProperty {
    let triage = score_triage(&raw);
    let best_use = determine_best_use(&raw);

    VacantProperty {
        raw,
        triage_score: triage.total,
        score_breakdown: triage.breakdown,
        best_use,
    }
}

/// Standing buildings in sound condition with residential zoning, good
/// access, and demand.
fn housing_fit(p: &RawProperty) -> f64 {
    let mut score = 0.0;
    if p.property_type == PropertyType::Building {
        score += 35.0;
    }
    score += f64::from(p.condition_rating) * 8.0;
    score += f64::from(p.proximity_score) / 100.0 * 25.0;
    if p.zoning.starts_with('A') || p.zoning.starts_with('B') {
        score += 15.0;
    }
    score += f64::from(p.neighborhood_demand) / 100.0 * 15.0;
    score
}

/// Large lots, LRA-held, in less accessible locations.
fn solar_fit(p: &RawProperty) -> f64 {
    let mut score = 0.0;
    if p.property_type == PropertyType::Lot {
        score += 30.0;
    }
    score += (f64::from(p.lot_sq_ft) / 15_000.0 * 40.0).min(40.0);
    if p.owner == Owner::Lra {
        score += 15.0;
    }
    score += f64::from(100u8.saturating_sub(p.proximity_score)) / 100.0 * 15.0;
    score
}

/// Mid-sized lots (2,000-8,000 sq ft) close to people who would use them.
fn garden_fit(p: &RawProperty) -> f64 {
    let mut score = 0.0;
    if p.property_type == PropertyType::Lot {
        score += 25.0;
    }
    score += match p.lot_sq_ft {
        2_000..=8_000 => 30.0,
        0..2_000 => 10.0,
        _ => 15.0,
    };
    score += f64::from(p.proximity_score) / 100.0 * 25.0;
    score += f64::from(p.neighborhood_demand) / 100.0 * 15.0;
    if p.owner == Owner::Lra {
        score += 10.0;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_atlas_geometry::LatLng;
    use civic_atlas_vacancy_models::{BoardUpStatus, VacancyCategory};

    fn property() -> RawProperty {
        RawProperty {
            id: 1,
            parcel_id: "0512340456".to_string(),
            address: "1234 Cass Ave".to_string(),
            zip: "63106".to_string(),
            location: LatLng::new(38.641, -90.196),
            ward: 5,
            neighborhood: "Carr Square".to_string(),
            property_type: PropertyType::Building,
            owner: Owner::Private,
            condition_rating: 3,
            lot_sq_ft: 4_000,
            zoning: "C".to_string(),
            tax_years_delinquent: 2,
            complaints_nearby: 10,
            proximity_score: 40,
            neighborhood_demand: 50,
            board_up_status: BoardUpStatus::Boarded,
            violation_count: 3,
            condemned: false,
            assessed_value: 12_000,
            year_built: Some(1910),
            stories: 2,
            recent_complaints: vec![],
            vacancy_category: VacancyCategory::Possibly,
        }
    }

    #[test]
    fn breakdown_follows_factor_formulas() {
        let b = score_triage(&property()).breakdown;
        assert_eq!(b.condition, 50);
        assert_eq!(b.complaint_density, 50);
        assert_eq!(b.lot_size, 40);
        assert_eq!(b.ownership, 20);
        assert_eq!(b.proximity, 40);
        assert_eq!(b.tax_delinquency, 20);
    }

    #[test]
    fn total_is_weighted_sum() {
        // 0.25*50 + 0.20*50 + 0.10*40 + 0.15*20 + 0.15*40 + 0.15*20 = 38.5
        assert_eq!(score_triage(&property()).total, 39);
    }

    #[test]
    fn ownership_tiers() {
        let mut p = property();
        p.owner = Owner::Lra;
        assert_eq!(score_triage(&p).breakdown.ownership, 100);
        p.owner = Owner::City;
        assert_eq!(score_triage(&p).breakdown.ownership, 70);
        p.owner = Owner::Private;
        p.tax_years_delinquent = 15;
        assert_eq!(score_triage(&p).breakdown.ownership, 100);
    }

    #[test]
    fn factors_saturate_at_one_hundred() {
        let mut p = property();
        p.complaints_nearby = 500;
        p.lot_sq_ft = 80_000;
        p.tax_years_delinquent = 40;
        p.condition_rating = 1;
        let b = score_triage(&p).breakdown;
        assert_eq!(b.complaint_density, 100);
        assert_eq!(b.lot_size, 100);
        assert_eq!(b.tax_delinquency, 100);
        assert_eq!(b.condition, 100);
    }

    #[test]
    fn total_stays_in_bounds() {
        let mut p = property();
        for condition in 1..=5 {
            for owner in [Owner::Lra, Owner::City, Owner::Private] {
                for proximity in [0, 50, 100] {
                    for delinquency in [0, 5, 30] {
                        p.condition_rating = condition;
                        p.owner = owner;
                        p.proximity_score = proximity;
                        p.tax_years_delinquent = delinquency;
                        p.complaints_nearby = delinquency * 3;
                        assert!(score_triage(&p).total <= 100);
                    }
                }
            }
        }

        p.condition_rating = 1;
        p.owner = Owner::Lra;
        p.proximity_score = 100;
        p.tax_years_delinquent = 10;
        p.complaints_nearby = 20;
        p.lot_sq_ft = 10_000;
        assert_eq!(score_triage(&p).total, 100);
    }

    #[test]
    fn proximity_moves_total_by_its_weight() {
        let mut p = property();
        p.proximity_score = 20;
        let low = score_triage(&p).total;
        p.proximity_score = 80;
        let high = score_triage(&p).total;
        // 0.15 * 60 = 9
        assert_eq!(i32::from(high) - i32::from(low), 9);
    }

    #[test]
    fn sound_building_with_residential_zoning_is_housing() {
        let mut p = property();
        p.condition_rating = 5;
        p.zoning = "A".to_string();
        p.proximity_score = 80;
        p.neighborhood_demand = 80;
        assert_eq!(determine_best_use(&p), BestUse::Housing);
    }

    #[test]
    fn large_remote_lra_lot_is_solar() {
        let mut p = property();
        p.property_type = PropertyType::Lot;
        p.owner = Owner::Lra;
        p.lot_sq_ft = 15_000;
        p.condition_rating = 2;
        p.proximity_score = 10;
        p.neighborhood_demand = 20;
        let s = use_suitability(&p);
        assert!(s.solar > s.garden && s.solar > s.housing, "{s:?}");
        assert_eq!(determine_best_use(&p), BestUse::Solar);
    }

    #[test]
    fn mid_sized_accessible_lot_is_garden() {
        let mut p = property();
        p.property_type = PropertyType::Lot;
        p.owner = Owner::Lra;
        p.lot_sq_ft = 3_000;
        p.condition_rating = 1;
        p.proximity_score = 90;
        p.neighborhood_demand = 90;
        assert_eq!(determine_best_use(&p), BestUse::Garden);
    }

    #[test]
    fn garden_lot_size_bands() {
        let mut p = property();
        p.lot_sq_ft = 1_999;
        let small = use_suitability(&p).garden;
        p.lot_sq_ft = 2_000;
        let mid = use_suitability(&p).garden;
        p.lot_sq_ft = 8_001;
        let large = use_suitability(&p).garden;
        assert!((mid - small - 20.0).abs() < 1e-9);
        assert!((mid - large - 15.0).abs() < 1e-9);
    }

    #[test]
    fn score_property_freezes_derived_fields() {
        let scored = score_property(property());
        assert_eq!(scored.triage_score, 39);
        assert_eq!(scored.score_breakdown, score_triage(&scored.raw).breakdown);
        assert_eq!(scored.best_use, determine_best_use(&scored.raw));
    }
}
