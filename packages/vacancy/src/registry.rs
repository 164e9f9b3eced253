//! Compile-time table of neighborhood profiles for data synthesis.
//!
//! The table is embedded via `include_str!` from `neighborhoods.toml`.
//! Adding a neighborhood shifts the ids of every record generated after it.

use serde::{Deserialize, Serialize};

/// Number of neighborhood profiles. Enforced by a test.
#[cfg(test)]
const EXPECTED_NEIGHBORHOOD_COUNT: usize = 46;

const NEIGHBORHOODS_TOML: &str = include_str!("../neighborhoods.toml");

/// A neighborhood used to seed synthetic vacancy records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodProfile {
    /// Neighborhood name, copied onto every generated record.
    pub name: String,
    /// Approximate centroid latitude.
    pub lat: f64,
    /// Approximate centroid longitude.
    pub lng: f64,
    /// Share of parcels that are vacant, 0-1.
    pub vacancy_rate: f64,
}

#[derive(Deserialize)]
struct NeighborhoodTable {
    neighborhood: Vec<NeighborhoodProfile>,
}

/// Returns every neighborhood profile in table order.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests.
#[must_use]
pub fn all_neighborhoods() -> Vec<NeighborhoodProfile> {
    toml::de::from_str::<NeighborhoodTable>(NEIGHBORHOODS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse neighborhood profiles: {e}"))
        .neighborhood
}
