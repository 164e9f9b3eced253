#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood report card.
//!
//! Measures transit, grocery, and food-desert proximity from the
//! neighborhood centroid, pulls the neighborhood's 311 statistics and
//! vacant parcels, and condenses them into four sub-scores and a composite.

use std::collections::BTreeSet;

use civic_atlas_complaints_models::NeighborhoodComplaintStats;
use civic_atlas_equity::WALKSHED_MILES;
use civic_atlas_geometry::{GeometryError, LatLng, Polygon, centroid, round_half_up};
use civic_atlas_neighborhood_models::{
    FoodAccess, ReportCard, ReportCardScores, TransitAccess, VacancyCandidate,
};
use civic_atlas_transit_models::{
    FoodDesertTract, GroceryStore, StopStatisticsMap, TransitRoute, TransitStop,
};
use civic_atlas_vacancy::summarize_properties;
use civic_atlas_vacancy_models::VacantProperty;

/// Fallback measuring point when a neighborhood has no boundary: the
/// middle of the city.
pub const CITY_CENTER: LatLng = LatLng::new(38.635, -90.245);

/// Complaint sub-score when the neighborhood has no 311 statistics.
const UNKNOWN_COMPLAINT_SCORE: f64 = 50.0;
/// Requests that cost one point of the complaint sub-score.
const REQUESTS_PER_POINT: f64 = 50.0;
const TOP_CATEGORY_COUNT: usize = 4;
const TOP_CANDIDATE_COUNT: usize = 3;

/// Everything the report card reads. Collections are the full city-wide
/// datasets; the card picks out what is near or belongs to the
/// neighborhood.
#[derive(Debug, Clone, Copy)]
pub struct ReportCardInput<'a> {
    /// Neighborhood number.
    pub number: u32,
    /// Neighborhood name. Vacant parcels are matched on this label.
    pub name: &'a str,
    /// Boundary polygon, if known.
    pub boundary: Option<&'a Polygon<f64>>,
    /// The neighborhood's 311 statistics, if any.
    pub complaints: Option<&'a NeighborhoodComplaintStats>,
    /// All transit stops.
    pub stops: &'a [TransitStop],
    /// Per-stop service statistics.
    pub stop_stats: &'a StopStatisticsMap,
    /// Route table.
    pub routes: &'a [TransitRoute],
    /// All grocery stores.
    pub groceries: &'a [GroceryStore],
    /// All food-access tracts.
    pub tracts: &'a [FoodDesertTract],
    /// All vacant properties.
    pub properties: &'a [VacantProperty],
}

/// Builds the report card for one neighborhood.
///
/// # Errors
///
/// Returns [`GeometryError`] if the boundary polygon has no usable
/// vertices.
pub fn build_report_card(input: &ReportCardInput<'_>) -> Result<ReportCard, GeometryError> {
    let center = match input.boundary {
        Some(polygon) => centroid(polygon)?,
        None => CITY_CENTER,
    };

    let transit = transit_access(&center, input);
    let food = food_access(&center, input.groceries, input.tracts);

    let local: Vec<&VacantProperty> = input
        .properties
        .iter()
        .filter(|p| p.raw.neighborhood == input.name)
        .collect();
    let vacancy = summarize_properties(local.iter().copied());

    let mut ranked = local;
    ranked.sort_by(|a, b| b.triage_score.cmp(&a.triage_score));
    let top_candidates = ranked
        .into_iter()
        .take(TOP_CANDIDATE_COUNT)
        .map(|p| VacancyCandidate {
            id: p.raw.id,
            address: p.raw.address.clone(),
            triage_score: p.triage_score,
        })
        .collect();

    let scores = score(
        &transit,
        input.complaints,
        food.nearest_grocery_miles,
        vacancy.average_triage_score,
    );

    log::debug!(
        "Report card for {} ({}): composite {}",
        input.name,
        input.number,
        scores.composite
    );

    Ok(ReportCard {
        key: format!("{:02}", input.number),
        name: input.name.to_string(),
        centroid: center,
        scores,
        transit,
        food,
        complaints: input.complaints.cloned(),
        top_categories: input.complaints.map(top_categories).unwrap_or_default(),
        vacancy,
        top_candidates,
    })
}

fn transit_access(center: &LatLng, input: &ReportCardInput<'_>) -> TransitAccess {
    let mut stops_nearby = 0;
    let mut total_trips = 0;
    let mut route_ids = BTreeSet::new();

    for stop in input
        .stops
        .iter()
        .filter(|s| center.distance_to(&s.location) <= WALKSHED_MILES)
    {
        stops_nearby += 1;
        if let Some(stats) = input.stop_stats.get(&stop.stop_id) {
            total_trips += stats.trip_count;
            route_ids.extend(stats.route_ids.iter().map(String::as_str));
        }
    }

    TransitAccess {
        stops_nearby,
        routes: input
            .routes
            .iter()
            .filter(|r| route_ids.contains(r.route_id.as_str()))
            .cloned()
            .collect(),
        total_trips,
    }
}

fn food_access(
    center: &LatLng,
    groceries: &[GroceryStore],
    tracts: &[FoodDesertTract],
) -> FoodAccess {
    let nearest = groceries
        .iter()
        .map(|g| (g, center.distance_to(&g.location)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let in_food_desert = tracts.iter().filter(|t| t.is_lila).any(|tract| {
        match centroid(&tract.geometry) {
            Ok(c) => center.distance_to(&c) < WALKSHED_MILES,
            Err(e) => {
                log::warn!("Skipping tract {} in food-desert check: {e}", tract.tract_id);
                false
            }
        }
    });

    FoodAccess {
        nearest_grocery_name: nearest.map(|(g, _)| g.name.clone()),
        nearest_grocery_miles: nearest.map(|(_, d)| d),
        in_food_desert,
    }
}

fn top_categories(stats: &NeighborhoodComplaintStats) -> Vec<(String, u64)> {
    let mut categories: Vec<(String, u64)> = stats
        .top_categories
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1));
    categories.truncate(TOP_CATEGORY_COUNT);
    categories
}

/// Food sub-score banded on grocery distance. No known store scores as far.
fn food_score(nearest_miles: Option<f64>) -> u8 {
    match nearest_miles {
        Some(d) if d <= 0.5 => 90,
        Some(d) if d <= 1.0 => 60,
        Some(d) if d <= 2.0 => 30,
        _ => 10,
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn score(
    transit: &TransitAccess,
    complaints: Option<&NeighborhoodComplaintStats>,
    nearest_grocery_miles: Option<f64>,
    average_triage_score: u8,
) -> ReportCardScores {
    let transit_score = (transit.stops_nearby as f64)
        .mul_add(15.0, (transit.total_trips as f64 * 0.3).min(30.0))
        .min(100.0);
    let complaint_score = complaints.map_or(UNKNOWN_COMPLAINT_SCORE, |c| {
        (100.0 - c.total as f64 / REQUESTS_PER_POINT).max(0.0)
    });
    let food = food_score(nearest_grocery_miles);
    let vacancy = 100 - average_triage_score.min(100);

    let composite = round_half_up(
        (transit_score + complaint_score + f64::from(food) + f64::from(vacancy)) / 4.0,
    ) as u8;

    ReportCardScores {
        transit: transit_score,
        complaints: complaint_score,
        food,
        vacancy,
        composite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_atlas_geometry::{EARTH_RADIUS_MILES, LineString};
    use civic_atlas_scoring::score_property;
    use civic_atlas_transit_models::StopStatistics;
    use civic_atlas_vacancy::generate_vacancy_data;
    use std::collections::BTreeMap;

    fn north_of(point: LatLng, miles: f64) -> LatLng {
        LatLng::new(point.lat + (miles / EARTH_RADIUS_MILES).to_degrees(), point.lng)
    }

    fn square(center: LatLng, half: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (center.lng - half, center.lat - half),
                (center.lng + half, center.lat - half),
                (center.lng + half, center.lat + half),
                (center.lng - half, center.lat + half),
            ]),
            vec![],
        )
    }

    fn stop(id: &str, location: LatLng) -> TransitStop {
        TransitStop {
            stop_id: id.to_string(),
            location,
            name: None,
        }
    }

    fn route(id: &str) -> TransitRoute {
        TransitRoute {
            route_id: id.to_string(),
            route_short_name: id.to_string(),
            route_long_name: format!("Route {id}"),
            route_type: 3,
            route_color: String::new(),
        }
    }

    fn complaints(total: u64) -> NeighborhoodComplaintStats {
        NeighborhoodComplaintStats {
            name: "Fox Park".to_string(),
            total,
            closed: total,
            avg_resolution_days: 3.0,
            top_categories: BTreeMap::from([
                ("A".to_string(), 5),
                ("B".to_string(), 50),
                ("C".to_string(), 20),
                ("D".to_string(), 1),
                ("E".to_string(), 30),
            ]),
        }
    }

    struct Fixture {
        boundary: Polygon<f64>,
        stops: Vec<TransitStop>,
        stop_stats: StopStatisticsMap,
        routes: Vec<TransitRoute>,
        groceries: Vec<GroceryStore>,
        complaints: NeighborhoodComplaintStats,
    }

    fn fixture() -> Fixture {
        let center = LatLng::new(38.60, -90.22);
        Fixture {
            boundary: square(center, 0.001),
            stops: vec![
                stop("near", north_of(center, 0.2)),
                stop("edge", north_of(center, 0.45)),
                stop("far", north_of(center, 2.0)),
            ],
            stop_stats: BTreeMap::from([
                (
                    "near".to_string(),
                    StopStatistics {
                        trip_count: 40,
                        route_ids: BTreeSet::from(["70".to_string()]),
                    },
                ),
                (
                    "far".to_string(),
                    StopStatistics {
                        trip_count: 500,
                        route_ids: BTreeSet::from(["10".to_string()]),
                    },
                ),
            ]),
            routes: vec![route("10"), route("70"), route("95")],
            groceries: vec![GroceryStore {
                name: "Corner Market".to_string(),
                chain: None,
                location: north_of(center, 0.8),
            }],
            complaints: complaints(1_000),
        }
    }

    fn input<'a>(f: &'a Fixture, properties: &'a [VacantProperty]) -> ReportCardInput<'a> {
        ReportCardInput {
            number: 7,
            name: "Fox Park",
            boundary: Some(&f.boundary),
            complaints: Some(&f.complaints),
            stops: &f.stops,
            stop_stats: &f.stop_stats,
            routes: &f.routes,
            groceries: &f.groceries,
            tracts: &[],
            properties,
        }
    }

    #[test]
    fn scores_follow_the_signals() {
        let f = fixture();
        let card = build_report_card(&input(&f, &[])).unwrap();

        assert_eq!(card.key, "07");
        assert_eq!(card.transit.stops_nearby, 2);
        assert_eq!(card.transit.total_trips, 40);
        let route_ids: Vec<_> = card.transit.routes.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(route_ids, ["70"]);

        // 2 * 15 + min(40 * 0.3, 30) = 42
        assert!((card.scores.transit - 42.0).abs() < 1e-9);
        // 100 - 1000 / 50 = 80
        assert!((card.scores.complaints - 80.0).abs() < 1e-9);
        assert_eq!(card.scores.food, 60);
        assert_eq!(card.scores.vacancy, 100);
        // (42 + 80 + 60 + 100) / 4 = 70.5
        assert_eq!(card.scores.composite, 71);

        assert_eq!(card.food.nearest_grocery_name.as_deref(), Some("Corner Market"));
        assert!(!card.food.in_food_desert);
    }

    #[test]
    fn composite_is_rounded_mean_of_sub_scores() {
        let f = fixture();
        let properties = generate_vacancy_data();

        let card = build_report_card(&input(&f, &properties)).unwrap();
        let s = card.scores;
        let mean = (s.transit + s.complaints + f64::from(s.food) + f64::from(s.vacancy)) / 4.0;
        assert_eq!(f64::from(s.composite), round_half_up(mean));
        assert_eq!(s.vacancy, 100 - card.vacancy.average_triage_score);
    }

    #[test]
    fn vacancies_match_on_neighborhood_label() {
        let f = fixture();
        let properties = generate_vacancy_data();
        let card = build_report_card(&input(&f, &properties)).unwrap();

        let expected = properties
            .iter()
            .filter(|p| p.raw.neighborhood == "Fox Park")
            .count();
        assert!(expected > 0);
        assert_eq!(card.vacancy.count, expected);
        assert_eq!(card.top_candidates.len(), TOP_CANDIDATE_COUNT);
        assert!(
            card.top_candidates
                .windows(2)
                .all(|w| w[0].triage_score >= w[1].triage_score)
        );
    }

    #[test]
    fn top_categories_are_busiest_four() {
        let f = fixture();
        let card = build_report_card(&input(&f, &[])).unwrap();
        let names: Vec<_> = card.top_categories.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["B", "E", "C", "A"]);
    }

    #[test]
    fn missing_boundary_uses_city_center() {
        let f = fixture();
        let mut i = input(&f, &[]);
        i.boundary = None;
        i.complaints = None;

        let card = build_report_card(&i).unwrap();
        assert_eq!(card.centroid, CITY_CENTER);
        assert!((card.scores.complaints - UNKNOWN_COMPLAINT_SCORE).abs() < 1e-9);
        assert!(card.top_categories.is_empty());
    }

    #[test]
    fn empty_boundary_is_an_error() {
        let f = fixture();
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        let mut i = input(&f, &[]);
        i.boundary = Some(&empty);
        assert_eq!(build_report_card(&i), Err(GeometryError::EmptyRing));
    }

    #[test]
    fn nearby_lila_tract_marks_food_desert() {
        let f = fixture();
        let center = LatLng::new(38.60, -90.22);
        let tract = |is_lila| FoodDesertTract {
            tract_id: "29510".to_string(),
            name: "Tract".to_string(),
            population: 1_000,
            poverty_rate_pct: 40.0,
            median_income: None,
            pct_no_vehicle: 30.0,
            is_lila,
            geometry: square(north_of(center, 0.3), 0.002),
        };

        let lila = [tract(true)];
        let mut i = input(&f, &[]);
        i.tracts = &lila;
        assert!(build_report_card(&i).unwrap().food.in_food_desert);

        let not_lila = [tract(false)];
        i.tracts = &not_lila;
        assert!(!build_report_card(&i).unwrap().food.in_food_desert);
    }

    #[test]
    fn scores_saturate() {
        let transit = TransitAccess {
            stops_nearby: 20,
            routes: vec![],
            total_trips: 10_000,
        };
        let heavy = complaints(20_000);
        let s = score(&transit, Some(&heavy), None, 100);
        assert!((s.transit - 100.0).abs() < 1e-9);
        assert!(s.complaints.abs() < 1e-9);
        assert_eq!(s.food, 10);
        assert_eq!(s.vacancy, 0);
        assert_eq!(s.composite, 28);
    }

    #[test]
    fn food_bands() {
        assert_eq!(food_score(Some(0.5)), 90);
        assert_eq!(food_score(Some(0.51)), 60);
        assert_eq!(food_score(Some(2.0)), 30);
        assert_eq!(food_score(Some(2.5)), 10);
        assert_eq!(food_score(None), 10);
    }

    #[test]
    fn local_vacancy_drives_vacancy_score() {
        let f = fixture();
        let mut property = generate_vacancy_data().remove(0);
        property.raw.neighborhood = "Fox Park".to_string();
        property.raw.condition_rating = 1;
        let property = score_property(property.raw);
        let triage = property.triage_score;

        let properties = [property];
        let card = build_report_card(&input(&f, &properties)).unwrap();
        assert_eq!(card.vacancy.count, 1);
        assert_eq!(card.scores.vacancy, 100 - triage);
    }
}
