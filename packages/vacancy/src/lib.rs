#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic vacant-property dataset.
//!
//! Generates a realistic population of vacant parcels spread across the
//! neighborhoods in [`registry`], scoring each one as it is created. The
//! output is a pure function of the neighborhood table and the fixed seed:
//! every call returns the same records with the same ids, which is what
//! lets callers join the records against geometry by location.

pub mod random;
pub mod registry;

use std::collections::{BTreeMap, BTreeSet};

use civic_atlas_geometry::{LatLng, round_half_up};
use civic_atlas_scoring::score_property;
use civic_atlas_vacancy_models::{
    BoardUpStatus, ComplaintStatus, Owner, PropertyFilter, PropertyType, RawProperty,
    RecentComplaint, VacancyCategory, VacancySummary, VacantProperty,
};

use crate::random::{SeededRandom, VACANCY_SEED};
use crate::registry::{NeighborhoodProfile, all_neighborhoods};

const STREET_NAMES: &[&str] = &[
    "N Broadway",
    "S Broadway",
    "Natural Bridge Ave",
    "Dr Martin Luther King Dr",
    "Cass Ave",
    "Florissant Ave",
    "N Grand Blvd",
    "S Grand Blvd",
    "Gravois Ave",
    "Chippewa St",
    "Arsenal St",
    "Manchester Ave",
    "Delmar Blvd",
    "Page Blvd",
    "Easton Ave",
    "Sullivan Ave",
    "Hebert St",
    "Blair Ave",
    "Palm St",
    "Obear Ave",
    "Penrose St",
    "Marcus Ave",
    "Margaretta Ave",
    "Newstead Ave",
    "Prairie Ave",
    "Benton St",
    "Montgomery St",
    "Bacon St",
    "Greer Ave",
    "Warne Ave",
    "Evans Ave",
    "St Louis Ave",
];

const ZIP_CODES: &[&str] = &[
    "63101", "63102", "63103", "63104", "63106", "63107", "63108", "63109", "63110", "63111",
    "63112", "63113", "63115", "63116", "63118", "63120",
];

const ZONING_CODES: &[&str] = &["A", "B", "C", "D", "F", "G", "H", "J"];

const COMPLAINT_CATEGORIES: &[&str] = &[
    "Vacant Building - Open/Dangerous",
    "High Weeds/Grass - Vacant",
    "Debris/Refuse Accumulation",
    "Structural Defect - Residential",
    "Rodent Infestation",
    "Illegal Dumping",
    "Property Damage",
    "Graffiti",
];

/// Max offset in degrees of a parcel from its neighborhood centroid.
const LOCATION_JITTER: f64 = 0.006;

/// Generates the synthetic vacancy dataset.
///
/// Deterministic: the same records, in the same order, with the same ids,
/// on every call.
#[must_use]
pub fn generate_vacancy_data() -> Vec<VacantProperty> {
    generate_from(&all_neighborhoods(), VACANCY_SEED)
}

/// Generates scored records for `neighborhoods`, in table order, from a
/// fresh generator seeded with `seed`. Ids start at 1.
#[must_use]
pub fn generate_from(neighborhoods: &[NeighborhoodProfile], seed: u64) -> Vec<VacantProperty> {
    let mut rng = SeededRandom::new(seed);
    let mut properties = Vec::new();
    let mut next_id = 1u32;

    for hood in neighborhoods {
        let count = parcel_count(hood, &mut rng);
        log::trace!("Synthesizing {count} parcels for {}", hood.name);

        for _ in 0..count {
            let raw = synthesize_parcel(hood, next_id, &mut rng);
            next_id += 1;
            properties.push(score_property(raw));
        }
    }

    log::debug!(
        "Generated {} vacant properties across {} neighborhoods",
        properties.len(),
        neighborhoods.len()
    );

    properties
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parcel_count(hood: &NeighborhoodProfile, rng: &mut SeededRandom) -> u32 {
    let base = round_half_up(hood.vacancy_rate * 40.0).max(0.0) as u32;
    base + rng.int_in(3, 10)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamped(value: f64, min: f64, max: f64) -> u32 {
    round_half_up(value).clamp(min, max) as u32
}

fn round_coordinate(value: f64) -> f64 {
    round_half_up(value * 10_000.0) / 10_000.0
}

/// Draws one parcel. The draw order is part of the dataset's identity:
/// reordering any two draws changes every record after it.
#[allow(clippy::cast_possible_truncation, clippy::too_many_lines)]
fn synthesize_parcel(hood: &NeighborhoodProfile, id: u32, rng: &mut SeededRandom) -> RawProperty {
    let rate = hood.vacancy_rate;

    let lat = hood.lat + rng.float_in(-LOCATION_JITTER, LOCATION_JITTER);
    let lng = hood.lng + rng.float_in(-LOCATION_JITTER, LOCATION_JITTER);
    let ward = rng.int_in(1, 28);
    let block = rng.int_in(1000, 9999);
    let parcel = rng.int_in(100, 999);
    let parcel_id = format!("{ward:02}{block}{parcel}");

    let is_building = rng.chance(0.4);
    let is_lra = rng.chance(if rate > 0.3 { 0.55 } else { 0.25 });
    let owner = if is_lra {
        Owner::Lra
    } else if rng.chance(0.1) {
        Owner::City
    } else {
        Owner::Private
    };

    let condition = if is_building {
        3.0 - rate * 4.0 + rng.float_in(-1.0, 1.5)
    } else {
        3.5 - rate * 2.0 + rng.float_in(-0.5, 1.0)
    };
    let condition_rating = clamped(condition, 1.0, 5.0) as u8;

    let lot_sq_ft = if is_building {
        rng.int_in(1200, 6000)
    } else {
        rng.int_in(1500, 15_000)
    };
    let tax_years_delinquent = if is_lra {
        rng.int_in(3, 15)
    } else {
        rng.int_in(0, 10)
    };
    let complaints_nearby = clamped(rate * 30.0 + rng.float_in(-5.0, 10.0), 0.0, f64::MAX);
    let proximity_score =
        clamped((1.0 - rate) * 80.0 + rng.float_in(-10.0, 10.0), 0.0, 100.0) as u8;
    let neighborhood_demand =
        clamped((1.0 - rate * 0.5) * 60.0 + rng.float_in(-15.0, 25.0), 0.0, 100.0) as u8;

    let board_up_status = if !is_building {
        BoardUpStatus::NotApplicable
    } else if rng.chance(0.6) {
        BoardUpStatus::Boarded
    } else if rng.chance(0.5) {
        BoardUpStatus::Open
    } else {
        BoardUpStatus::Secured
    };

    let violation_count = if is_building {
        rng.int_in(0, 12)
    } else {
        rng.int_in(0, 4)
    };
    let condemned = is_building && condition_rating <= 1 && rng.chance(0.7);
    let assessed_value = if is_building {
        rng.int_in(2000, 35_000)
    } else {
        rng.int_in(500, 8000)
    };
    let year_built = is_building.then(|| rng.int_in(1870, 1965) as u16);
    let stories = if is_building {
        rng.int_in(1, 3) as u8
    } else {
        0
    };

    let complaint_draws = rng.int_in(0, complaints_nearby.min(5));
    let recent_complaints = (0..complaint_draws)
        .map(|_| {
            let category = (*rng.pick(COMPLAINT_CATEGORIES)).to_string();
            let month = rng.int_in(1, 12);
            let day = rng.int_in(1, 28);
            let status = if rng.chance(0.6) {
                ComplaintStatus::Closed
            } else {
                ComplaintStatus::Open
            };
            RecentComplaint {
                category,
                date: format!("2025-{month:02}-{day:02}"),
                status,
            }
        })
        .collect();

    let house_number = rng.int_in(1000, 5999);
    let address = format!("{house_number} {}", rng.pick(STREET_NAMES));
    let zip = (*rng.pick(ZIP_CODES)).to_string();
    let zoning = (*rng.pick(ZONING_CODES)).to_string();

    let vacancy_category = if condemned || is_lra {
        VacancyCategory::Definite
    } else if tax_years_delinquent > 3 {
        VacancyCategory::VeryLikely
    } else if violation_count > 2 {
        VacancyCategory::Possibly
    } else {
        VacancyCategory::Indeterminant
    };

    RawProperty {
        id,
        parcel_id,
        address,
        zip,
        location: LatLng::new(round_coordinate(lat), round_coordinate(lng)),
        ward: ward as u8,
        neighborhood: hood.name.clone(),
        property_type: if is_building {
            PropertyType::Building
        } else {
            PropertyType::Lot
        },
        owner,
        condition_rating,
        lot_sq_ft,
        zoning,
        tax_years_delinquent,
        complaints_nearby,
        proximity_score,
        neighborhood_demand,
        board_up_status,
        violation_count,
        condemned,
        assessed_value,
        year_built,
        stories,
        recent_complaints,
        vacancy_category,
    }
}

/// Properties matching `filter`, in input order.
#[must_use]
pub fn filter_properties<'a>(
    properties: &'a [VacantProperty],
    filter: &PropertyFilter,
) -> Vec<&'a VacantProperty> {
    properties.iter().filter(|p| filter.matches(p)).collect()
}

/// Headline numbers for a set of properties.
#[must_use]
pub fn summarize_properties<'a>(
    properties: impl IntoIterator<Item = &'a VacantProperty>,
) -> VacancySummary {
    let mut count = 0usize;
    let mut score_sum = 0u64;
    let mut lra_count = 0usize;
    let mut high_priority_count = 0usize;
    let mut by_best_use = BTreeMap::new();

    for p in properties {
        count += 1;
        score_sum += u64::from(p.triage_score);
        if p.raw.owner == Owner::Lra {
            lra_count += 1;
        }
        if p.triage_score >= VacancySummary::HIGH_PRIORITY_SCORE {
            high_priority_count += 1;
        }
        *by_best_use.entry(p.best_use).or_insert(0) += 1;
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let average_triage_score = if count == 0 {
        0
    } else {
        round_half_up(score_sum as f64 / count as f64) as u8
    };

    VacancySummary {
        count,
        average_triage_score,
        lra_count,
        high_priority_count,
        by_best_use,
    }
}

/// Sorted, de-duplicated neighborhood labels.
#[must_use]
pub fn neighborhood_names(properties: &[VacantProperty]) -> Vec<String> {
    properties
        .iter()
        .map(|p| p.raw.neighborhood.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
