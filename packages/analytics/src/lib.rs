#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate analytics over pre-aggregated 311 complaint statistics.
//!
//! Every function is a pure reducer: it takes the in-memory statistics and
//! returns a fresh result. Nothing here touches raw event streams.

pub mod hotspots;
pub mod kpis;
pub mod series;
pub mod weather;

pub use hotspots::{detect_slow_hotspots, detect_volume_hotspots};
pub use kpis::{compute_kpis, neighborhood_complaint_count};
pub use series::moving_average;
pub use weather::weather_insights;

/// Default number of hotspots returned.
pub const DEFAULT_HOTSPOT_LIMIT: usize = 5;

/// Default moving-average window, in days.
pub const DEFAULT_WINDOW_DAYS: usize = 7;
