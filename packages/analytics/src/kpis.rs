//! City-wide headline numbers and per-neighborhood lookups.

use civic_atlas_complaints_models::{
    CityKpis, ComplaintData, NeighborhoodComplaintStats, PeakDay,
};
use civic_atlas_geometry::{round_half_up, round_to};

/// Days per year used for the per-day rate.
const DAYS_PER_YEAR: f64 = 365.0;
/// Neighborhoods need more than this many requests to be named slowest.
const SLOWEST_MIN_REQUESTS: u64 = 100;
/// Category name that selects a neighborhood's total.
pub const ALL_CATEGORIES: &str = "all";

/// Computes the city KPI strip. `None` when there are no daily counts to
/// pick a peak day from.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn compute_kpis(data: &ComplaintData) -> Option<CityKpis> {
    let peak_day = data
        .daily_counts
        .iter()
        .fold(None::<(&String, u64)>, |best, (date, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((date, *count)),
        })
        .map(|(date, count)| PeakDay {
            date: date.clone(),
            count,
        })?;

    let hoods = data.neighborhoods.values();
    let closed_count: u64 = hoods.clone().map(|h| h.closed).sum();

    let resolutions: Vec<f64> = hoods
        .clone()
        .map(|h| h.avg_resolution_days)
        .filter(|days| *days > 0.0)
        .collect();
    let avg_resolution = if resolutions.is_empty() {
        0.0
    } else {
        resolutions.iter().sum::<f64>() / resolutions.len() as f64
    };

    let slowest = hoods
        .filter(|h| h.total > SLOWEST_MIN_REQUESTS)
        .fold(None::<&NeighborhoodComplaintStats>, |best, h| match best {
            Some(b) if b.avg_resolution_days >= h.avg_resolution_days => best,
            _ => Some(h),
        })
        .cloned();

    let total = data.total_requests;
    let closed_pct = if total == 0 {
        0.0
    } else {
        round_to(closed_count as f64 / total as f64 * 100.0, 1)
    };

    log::debug!("KPIs over {total} requests, peak {}", peak_day.date);

    Some(CityKpis {
        total_requests: total,
        per_day: round_half_up(total as f64 / DAYS_PER_YEAR) as u64,
        closed_pct,
        closed_count,
        avg_resolution: round_to(avg_resolution, 1),
        slowest,
        peak_day,
    })
}

/// Requests filed in neighborhood `number` under `category`, or the
/// neighborhood total for [`ALL_CATEGORIES`].
///
/// Neighborhood keys are two-digit zero-padded numbers. Unknown
/// neighborhoods and categories outside the neighborhood's top categories
/// count as 0.
#[must_use]
pub fn neighborhood_complaint_count(data: &ComplaintData, number: u32, category: &str) -> u64 {
    let key = format!("{number:02}");
    let Some(hood) = data.neighborhoods.get(&key) else {
        return 0;
    };

    if category == ALL_CATEGORIES {
        hood.total
    } else {
        hood.top_categories.get(category).copied().unwrap_or(0)
    }
}
