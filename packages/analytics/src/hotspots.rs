//! Neighborhoods whose complaint volume or resolution time is far above
//! the city mean.

use civic_atlas_complaints_models::{ComplaintData, ComplaintHotspot, NeighborhoodComplaintStats};
use civic_atlas_geometry::round_to;

/// Neighborhoods at or below this many requests are too small to rank.
const MIN_REQUESTS: u64 = 50;
/// Volume hotspots exceed this multiple of the mean.
const VOLUME_MULTIPLE: f64 = 2.0;
/// Slow hotspots need at least this many requests.
const SLOW_MIN_REQUESTS: u64 = 200;
/// Slow hotspots exceed this multiple of the mean resolution time.
const SLOW_MULTIPLE: f64 = 1.5;

fn ranked(data: &ComplaintData) -> impl Iterator<Item = (&String, &NeighborhoodComplaintStats)> {
    data.neighborhoods
        .iter()
        .filter(|(_, stats)| stats.total > MIN_REQUESTS)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn hotspot(id: &str, stats: &NeighborhoodComplaintStats, ratio: f64) -> ComplaintHotspot {
    ComplaintHotspot {
        id: id.to_string(),
        stats: stats.clone(),
        ratio: round_to(ratio, 1),
    }
}

/// Neighborhoods filing more than twice the mean request volume, busiest
/// first, at most `limit` of them.
///
/// The mean is taken over neighborhoods with more than 50 requests, and
/// only those neighborhoods are candidates.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_volume_hotspots(data: &ComplaintData, limit: usize) -> Vec<ComplaintHotspot> {
    let Some(mean_total) = mean(ranked(data).map(|(_, s)| s.total as f64)) else {
        return vec![];
    };

    let mut hotspots: Vec<ComplaintHotspot> = ranked(data)
        .filter(|(_, s)| s.total as f64 > mean_total * VOLUME_MULTIPLE)
        .map(|(id, s)| hotspot(id, s, s.total as f64 / mean_total))
        .collect();

    hotspots.sort_by(|a, b| b.stats.total.cmp(&a.stats.total));
    hotspots.truncate(limit);

    log::debug!(
        "Found {} volume hotspots (mean {mean_total:.1} requests)",
        hotspots.len()
    );

    hotspots
}

/// Neighborhoods resolving requests much slower than the city mean, slowest
/// first, at most `limit` of them.
///
/// The mean is taken over neighborhoods with more than 50 requests and a
/// positive resolution time. Candidates need at least 200 requests and a
/// resolution time above 1.5 times that mean.
#[must_use]
pub fn detect_slow_hotspots(data: &ComplaintData, limit: usize) -> Vec<ComplaintHotspot> {
    let Some(mean_days) = mean(
        ranked(data)
            .map(|(_, s)| s.avg_resolution_days)
            .filter(|days| *days > 0.0),
    ) else {
        return vec![];
    };

    let mut hotspots: Vec<ComplaintHotspot> = ranked(data)
        .filter(|(_, s)| {
            s.total >= SLOW_MIN_REQUESTS && s.avg_resolution_days > mean_days * SLOW_MULTIPLE
        })
        .map(|(id, s)| hotspot(id, s, s.avg_resolution_days / mean_days))
        .collect();

    hotspots.sort_by(|a, b| {
        b.stats
            .avg_resolution_days
            .total_cmp(&a.stats.avg_resolution_days)
    });
    hotspots.truncate(limit);

    log::debug!(
        "Found {} slow-resolution hotspots (mean {mean_days:.1} days)",
        hotspots.len()
    );

    hotspots
}
