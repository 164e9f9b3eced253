#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transit-to-grocery equity gaps for food-desert tracts.
//!
//! For every LILA tract we look at the transit stops inside the walkshed of
//! the tract centroid, the nearest grocery store, and whether any of those
//! stops shares a route with a stop next to a grocery store. The four
//! signals are folded into a 0-100 score.
//!
//! Reachability is approximated as common route membership. There is no
//! transfer modelling, no direction or schedule awareness, and no travel
//! time search. The 25-point reachability band was tuned against this
//! definition, so a full graph search would need new band constants.

use std::collections::BTreeSet;

use civic_atlas_geometry::{GeometryError, LatLng, centroid, round_half_up};
use civic_atlas_transit_models::{
    EquityGapResult, EquitySummary, FoodDesertTract, GroceryStore, StopStatisticsMap,
    TransitStop,
};

/// Radius around a tract centroid that counts as walking distance.
pub const WALKSHED_MILES: f64 = 0.5;

/// Radius around a grocery store within which a stop serves the store.
pub const GROCERY_STOP_RADIUS_MILES: f64 = 0.25;

const WALK_SPEED_MPH: f64 = 3.0;
const BUS_SPEED_MPH: f64 = 12.0;
const SERVICE_DAY_MINUTES: f64 = 18.0 * 60.0;
const MAX_WAIT_MINUTES: f64 = 30.0;

/// Inputs shared by every tract in one analysis pass.
///
/// Route ids serving grocery-adjacent stops are collected once here so
/// each tract only has to scan its own walkshed.
pub struct EquityContext<'a> {
    stops: &'a [TransitStop],
    stop_stats: &'a StopStatisticsMap,
    groceries: &'a [GroceryStore],
    grocery_routes: BTreeSet<&'a str>,
}

impl<'a> EquityContext<'a> {
    /// Indexes the grocery-adjacent routes for a set of inputs.
    #[must_use]
    pub fn new(
        stops: &'a [TransitStop],
        stop_stats: &'a StopStatisticsMap,
        groceries: &'a [GroceryStore],
    ) -> Self {
        let mut grocery_routes = BTreeSet::new();

        for stop in stops {
            let Some(stats) = stop_stats.get(&stop.stop_id) else {
                continue;
            };
            let serves_grocery = groceries.iter().any(|store| {
                stop.location.distance_to(&store.location) <= GROCERY_STOP_RADIUS_MILES
            });
            if serves_grocery {
                grocery_routes.extend(stats.route_ids.iter().map(String::as_str));
            }
        }

        log::debug!(
            "{} routes serve stops within {GROCERY_STOP_RADIUS_MILES} mi of a grocery store",
            grocery_routes.len()
        );

        Self {
            stops,
            stop_stats,
            groceries,
            grocery_routes,
        }
    }

    fn nearest_grocery(&self, from: &LatLng) -> Option<(&'a GroceryStore, f64)> {
        self.groceries
            .iter()
            .map(|store| (store, from.distance_to(&store.location)))
            .fold(None, |best, (store, dist)| match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((store, dist)),
            })
    }

    fn nearest_stop_distance(&self, from: &LatLng) -> Option<f64> {
        self.stops
            .iter()
            .map(|stop| from.distance_to(&stop.location))
            .reduce(f64::min)
    }
}

/// Computes equity metrics for every LILA tract, in input order.
///
/// Tracts whose centroid can't be computed are skipped with a warning; use
/// [`analyze_tract`] to get the error for a single tract.
#[must_use]
pub fn compute_equity_gaps(
    tracts: &[FoodDesertTract],
    stops: &[TransitStop],
    stop_stats: &StopStatisticsMap,
    groceries: &[GroceryStore],
) -> Vec<EquityGapResult> {
    let ctx = EquityContext::new(stops, stop_stats, groceries);

    let results: Vec<EquityGapResult> = tracts
        .iter()
        .filter(|tract| tract.is_lila)
        .filter_map(|tract| match analyze_tract(tract, &ctx) {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("Skipping tract {}: {e}", tract.tract_id);
                None
            }
        })
        .collect();

    log::debug!(
        "Computed equity gaps for {} of {} tracts",
        results.len(),
        tracts.len()
    );

    results
}

/// Computes equity metrics for one tract, LILA or not.
///
/// # Errors
///
/// Returns [`GeometryError`] if the tract polygon has no usable outer ring.
pub fn analyze_tract(
    tract: &FoodDesertTract,
    ctx: &EquityContext<'_>,
) -> Result<EquityGapResult, GeometryError> {
    let center = centroid(&tract.geometry)?;

    let mut stops_nearby = 0u32;
    let mut total_trip_frequency = 0u64;
    let mut grocery_accessible = false;

    for stop in ctx.stops {
        if center.distance_to(&stop.location) > WALKSHED_MILES {
            continue;
        }
        stops_nearby += 1;

        if let Some(stats) = ctx.stop_stats.get(&stop.stop_id) {
            total_trip_frequency += stats.trip_count;
            grocery_accessible |= stats
                .route_ids
                .iter()
                .any(|route| ctx.grocery_routes.contains(route.as_str()));
        }
    }

    let nearest_stop_distance_miles = ctx.nearest_stop_distance(&center);
    let nearest_grocery = ctx.nearest_grocery(&center);
    let nearest_grocery_distance_miles = nearest_grocery.map(|(_, dist)| dist);

    let transit_time_estimate_minutes = if grocery_accessible {
        nearest_stop_distance_miles
            .zip(nearest_grocery_distance_miles)
            .map(|(stop_dist, grocery_dist)| {
                transit_time_estimate(stop_dist, total_trip_frequency, grocery_dist)
            })
    } else {
        None
    };

    Ok(EquityGapResult {
        tract_id: tract.tract_id.clone(),
        name: tract.name.clone(),
        population: tract.population,
        poverty_rate_pct: tract.poverty_rate_pct,
        pct_no_vehicle: tract.pct_no_vehicle,
        stops_nearby,
        total_trip_frequency,
        nearest_stop_distance_miles,
        nearest_grocery_distance_miles,
        nearest_grocery_name: nearest_grocery.map(|(store, _)| store.name.clone()),
        grocery_accessible,
        transit_time_estimate_minutes,
        score: equity_score(
            stops_nearby,
            total_trip_frequency,
            nearest_grocery_distance_miles,
            grocery_accessible,
        ),
        centroid: center,
    })
}

/// Sums the four capped bands: transit density (30), trip frequency (20),
/// grocery proximity (25), and shared-route reachability (25).
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn equity_score(
    stops_nearby: u32,
    total_trip_frequency: u64,
    nearest_grocery_distance_miles: Option<f64>,
    grocery_accessible: bool,
) -> u8 {
    let density = (f64::from(stops_nearby) * 10.0).min(30.0);

    let frequency = (total_trip_frequency as f64 * 0.5).min(20.0);

    let proximity = match nearest_grocery_distance_miles {
        Some(d) if d <= 0.5 => 25.0,
        Some(d) if d <= 1.0 => 15.0,
        Some(d) if d <= 2.0 => 5.0,
        _ => 0.0,
    };

    let reachability = if grocery_accessible { 25.0 } else { 0.0 };

    round_half_up(density + frequency + proximity + reachability).clamp(0.0, 100.0) as u8
}

/// Door-to-door minutes: walk to the nearest stop at 3 mph, wait half the
/// average headway of an 18-hour service day (at most 30 minutes), then
/// ride the straight-line grocery distance at 12 mph.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn transit_time_estimate(
    nearest_stop_miles: f64,
    total_trip_frequency: u64,
    grocery_miles: f64,
) -> u32 {
    let walk = nearest_stop_miles / WALK_SPEED_MPH * 60.0;

    let wait = if total_trip_frequency == 0 {
        MAX_WAIT_MINUTES
    } else {
        (SERVICE_DAY_MINUTES / total_trip_frequency as f64 / 2.0).min(MAX_WAIT_MINUTES)
    };

    let ride = grocery_miles / BUS_SPEED_MPH * 60.0;

    round_half_up(walk + wait + ride).max(0.0) as u32
}

/// Rolls an analysis pass up into citywide counts.
#[must_use]
pub fn summarize_equity(tracts: &[FoodDesertTract], results: &[EquityGapResult]) -> EquitySummary {
    let lila: Vec<&FoodDesertTract> = tracts.iter().filter(|t| t.is_lila).collect();

    let average_score = if results.is_empty() {
        0
    } else {
        let total: u64 = results.iter().map(|r| u64::from(r.score)).sum();
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let avg = round_half_up(total as f64 / results.len() as f64) as u8;
        avg
    };

    EquitySummary {
        lila_tracts: lila.len(),
        desert_population: lila.iter().map(|t| t.population).sum(),
        average_score,
        low_score_tracts: results
            .iter()
            .filter(|r| r.score < EquitySummary::LOW_SCORE_THRESHOLD)
            .count(),
        no_access_tracts: results.iter().filter(|r| !r.grocery_accessible).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_atlas_geometry::{EARTH_RADIUS_MILES, LineString, Polygon};
    use civic_atlas_transit_models::StopStatistics;

    fn tract(id: &str, lat: f64, lng: f64, is_lila: bool) -> FoodDesertTract {
        let d = 0.002;
        FoodDesertTract {
            tract_id: id.to_string(),
            name: format!("Census Tract {id}"),
            population: 2500,
            poverty_rate_pct: 38.0,
            median_income: Some(24_000.0),
            pct_no_vehicle: 31.0,
            is_lila,
            geometry: Polygon::new(
                LineString::from(vec![
                    (lng - d, lat - d),
                    (lng + d, lat - d),
                    (lng + d, lat + d),
                    (lng - d, lat + d),
                    (lng - d, lat - d),
                ]),
                vec![],
            ),
        }
    }

    fn north_of(p: LatLng, miles: f64) -> LatLng {
        LatLng::new(p.lat + (miles / EARTH_RADIUS_MILES).to_degrees(), p.lng)
    }

    fn stop(id: &str, location: LatLng) -> TransitStop {
        TransitStop {
            stop_id: id.to_string(),
            location,
            name: None,
        }
    }

    fn stats(trip_count: u64, routes: &[&str]) -> StopStatistics {
        StopStatistics {
            trip_count,
            route_ids: routes.iter().map(ToString::to_string).collect(),
        }
    }

    fn grocery(name: &str, location: LatLng) -> GroceryStore {
        GroceryStore {
            name: name.to_string(),
            chain: None,
            location,
        }
    }

    #[test]
    fn shared_route_makes_grocery_accessible() {
        let t = tract("1271", 38.6, -90.2, true);
        let center = centroid(&t.geometry).unwrap();

        let stops = vec![
            stop("A", north_of(center, 0.3)),
            stop("B", north_of(center, -0.55)),
        ];
        let mut stop_stats = StopStatisticsMap::new();
        stop_stats.insert("A".to_string(), stats(40, &["R1"]));
        stop_stats.insert("B".to_string(), stats(10, &["R1"]));
        let groceries = vec![grocery("Save-A-Lot", north_of(center, -0.35))];

        let results = compute_equity_gaps(&[t], &stops, &stop_stats, &groceries);
        assert_eq!(results.len(), 1);

        let r = &results[0];
        assert!(r.grocery_accessible);
        assert_eq!(r.stops_nearby, 1);
        assert_eq!(r.total_trip_frequency, 40);
        assert_eq!(r.nearest_grocery_name.as_deref(), Some("Save-A-Lot"));
        assert!((r.nearest_grocery_distance_miles.unwrap() - 0.35).abs() < 0.001);
        assert!((r.nearest_stop_distance_miles.unwrap() - 0.3).abs() < 0.001);
        assert_eq!(r.score, 10 + 20 + 25 + 25);
        assert!(r.transit_time_estimate_minutes.is_some());
    }

    #[test]
    fn no_shared_route_means_no_access() {
        let t = tract("1272", 38.6, -90.2, true);
        let center = centroid(&t.geometry).unwrap();

        let stops = vec![
            stop("A", north_of(center, 0.3)),
            stop("B", north_of(center, -1.5)),
        ];
        let mut stop_stats = StopStatisticsMap::new();
        stop_stats.insert("A".to_string(), stats(10, &["R1"]));
        stop_stats.insert("B".to_string(), stats(10, &["R2"]));
        let groceries = vec![grocery("Schnucks", north_of(center, -1.6))];

        let r = &compute_equity_gaps(&[t], &stops, &stop_stats, &groceries)[0];
        assert!(!r.grocery_accessible);
        assert_eq!(r.transit_time_estimate_minutes, None);
        // density 10 + frequency 5 + proximity 5 (1.6 mi)
        assert_eq!(r.score, 20);
    }

    #[test]
    fn grocery_side_stop_must_be_within_quarter_mile() {
        let t = tract("1274", 38.6, -90.2, true);
        let center = centroid(&t.geometry).unwrap();
        let store = north_of(center, -1.0);

        let run = |grocery_side_miles: f64| {
            let stops = vec![
                stop("A", north_of(center, 0.3)),
                stop("B", north_of(store, grocery_side_miles)),
            ];
            let mut stop_stats = StopStatisticsMap::new();
            stop_stats.insert("A".to_string(), stats(10, &["R1"]));
            stop_stats.insert("B".to_string(), stats(10, &["R1"]));
            let groceries = vec![grocery("Schnucks", store)];
            compute_equity_gaps(&[t.clone()], &stops, &stop_stats, &groceries)
                .remove(0)
                .grocery_accessible
        };

        assert!(run(0.24));
        assert!(!run(0.26));
    }

    #[test]
    fn non_lila_tracts_are_excluded() {
        let tracts = vec![
            tract("1", 38.60, -90.20, false),
            tract("2", 38.61, -90.21, true),
            tract("3", 38.62, -90.22, true),
        ];
        let results = compute_equity_gaps(&tracts, &[], &StopStatisticsMap::new(), &[]);
        let ids: Vec<&str> = results.iter().map(|r| r.tract_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn missing_statistics_contribute_nothing() {
        let t = tract("1273", 38.6, -90.2, true);
        let center = centroid(&t.geometry).unwrap();
        let stops = vec![stop("A", north_of(center, 0.1)), stop("B", north_of(center, 0.2))];
        let groceries = vec![grocery("Aldi", north_of(center, 0.2))];

        let r = &compute_equity_gaps(&[t], &stops, &StopStatisticsMap::new(), &groceries)[0];
        assert_eq!(r.stops_nearby, 2);
        assert_eq!(r.total_trip_frequency, 0);
        assert!(!r.grocery_accessible);
        assert_eq!(r.score, 20 + 25);
    }

    #[test]
    fn empty_inputs_yield_zero_score() {
        let r = &compute_equity_gaps(
            &[tract("1274", 38.6, -90.2, true)],
            &[],
            &StopStatisticsMap::new(),
            &[],
        )[0];
        assert_eq!(r.score, 0);
        assert_eq!(r.nearest_grocery_distance_miles, None);
        assert_eq!(r.nearest_grocery_name, None);
        assert_eq!(r.nearest_stop_distance_miles, None);
    }

    #[test]
    fn empty_tract_set_yields_empty_result() {
        let results = compute_equity_gaps(&[], &[], &StopStatisticsMap::new(), &[]);
        assert!(results.is_empty());
    }

    #[test]
    fn invalid_geometry_is_skipped_but_reported_per_tract() {
        let mut bad = tract("bad", 38.6, -90.2, true);
        bad.geometry = Polygon::new(LineString::new(vec![]), vec![]);
        let good = tract("good", 38.6, -90.2, true);

        let stop_stats = StopStatisticsMap::new();
        let results = compute_equity_gaps(&[bad.clone(), good], &[], &stop_stats, &[]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tract_id, "good");

        let ctx = EquityContext::new(&[], &stop_stats, &[]);
        assert_eq!(analyze_tract(&bad, &ctx), Err(GeometryError::EmptyRing));
    }

    #[test]
    fn score_stays_in_bounds() {
        for stops in [0, 1, 2, 3, 10, 1000] {
            for trips in [0, 1, 39, 40, 10_000] {
                for dist in [None, Some(0.1), Some(0.9), Some(1.9), Some(50.0)] {
                    for accessible in [false, true] {
                        let s = equity_score(stops, trips, dist, accessible);
                        assert!(s <= 100);
                    }
                }
            }
        }
        assert_eq!(equity_score(1000, 10_000, Some(0.0), true), 100);
    }

    #[test]
    fn score_is_monotonic_in_each_band() {
        let score =
            |stops, trips, grocery_miles| equity_score(stops, trips, Some(grocery_miles), false);

        for stops in 0..10 {
            assert!(score(stops + 1, 5, 1.5) >= score(stops, 5, 1.5));
        }
        for trips in 0..100 {
            assert!(score(2, trips + 1, 1.5) >= score(2, trips, 1.5));
        }
        assert!(equity_score(2, 5, Some(1.5), true) >= equity_score(2, 5, Some(1.5), false));

        let distances = [0.1, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0];
        for pair in distances.windows(2) {
            assert!(score(2, 5, pair[0]) >= score(2, 5, pair[1]));
        }
    }

    #[test]
    fn transit_time_decreases_with_frequency() {
        let mut previous = transit_time_estimate(0.3, 0, 1.2);
        for trips in 1..500 {
            let current = transit_time_estimate(0.3, trips, 1.2);
            assert!(current <= previous, "{trips} trips: {current} > {previous}");
            previous = current;
        }
    }

    #[test]
    fn transit_time_components() {
        // 0.3 mi walk = 6 min, 36 trips over 18h = 30 min headway -> 15 min
        // wait, 1.2 mi ride = 6 min.
        assert_eq!(transit_time_estimate(0.3, 36, 1.2), 27);
        // No trips caps the wait at 30 minutes.
        assert_eq!(transit_time_estimate(0.0, 0, 0.0), 30);
    }

    #[test]
    fn summary_counts_gaps() {
        let tracts = vec![
            tract("1", 38.60, -90.20, true),
            tract("2", 38.61, -90.21, true),
            tract("3", 38.62, -90.22, false),
        ];
        let t = tracts[0].clone();
        let center = centroid(&t.geometry).unwrap();
        let stops = vec![stop("A", north_of(center, 0.1))];
        let mut stop_stats = StopStatisticsMap::new();
        stop_stats.insert("A".to_string(), stats(100, &["R9"]));
        let groceries = vec![grocery("Aldi", north_of(center, 0.05))];

        let results = compute_equity_gaps(&tracts, &stops, &stop_stats, &groceries);
        let summary = summarize_equity(&tracts, &results);

        assert_eq!(summary.lila_tracts, 2);
        assert_eq!(summary.desert_population, 5000);
        assert_eq!(results[0].score, 80);
        assert_eq!(summary.no_access_tracts, 1);
        assert_eq!(
            summary.low_score_tracts,
            results.iter().filter(|r| r.score < 30).count()
        );
    }
}
