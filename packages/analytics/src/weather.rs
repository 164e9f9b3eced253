//! How daily complaint volume moves with rain and temperature.

use civic_atlas_complaints_models::{
    AfterRainComparison, Counts, RainComparison, TemperatureComparison, WeatherInsights,
    WeatherSeries,
};
use civic_atlas_geometry::round_half_up;

/// Inches of precipitation above which a day counts as rainy.
const RAIN_INCHES: f64 = 0.1;
/// Inches of precipitation above which the following day is "after heavy rain".
const HEAVY_RAIN_INCHES: f64 = 0.5;
/// High temperature (°F) above which a day is hot.
const HOT_F: f64 = 90.0;
/// High temperature (°F) below which a day is cool.
const COOL_F: f64 = 70.0;

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn rounded_mean(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    round_half_up(values.iter().sum::<u64>() as f64 / values.len() as f64) as u64
}

/// `(a - b) / b` as a whole percent, 0 when `b` is 0.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn percent_diff(a: u64, b: u64) -> i64 {
    if b == 0 {
        return 0;
    }
    ((a as f64 - b as f64) / b as f64 * 100.0).round() as i64
}

/// Splits the days of `daily` by the weather on each day and compares the
/// mean request counts of each pair of groups.
///
/// Days are visited in date order. A day without a weather record is
/// skipped entirely. The "after rain" comparison looks at the next day in
/// `daily`, and the last day contributes nothing to it. Days between 70 °F
/// and 90 °F fall in neither temperature group, and neither do days with
/// no recorded high; those still count toward the rain comparisons.
#[must_use]
pub fn weather_insights(daily: &Counts, weather: &WeatherSeries) -> WeatherInsights {
    let days: Vec<(&str, u64)> = daily.iter().map(|(d, c)| (d.as_str(), *c)).collect();

    let mut rainy = vec![];
    let mut dry = vec![];
    let mut after_heavy = vec![];
    let mut after_normal = vec![];
    let mut hot = vec![];
    let mut cool = vec![];

    for (i, (date, count)) in days.iter().enumerate() {
        let Some(w) = weather.get(*date) else {
            continue;
        };

        if w.precip > RAIN_INCHES {
            rainy.push(*count);
        } else {
            dry.push(*count);
        }

        if let Some((_, next)) = days.get(i + 1) {
            if w.precip > HEAVY_RAIN_INCHES {
                after_heavy.push(*next);
            } else {
                after_normal.push(*next);
            }
        }

        match w.high {
            Some(high) if high > HOT_F => hot.push(*count),
            Some(high) if high < COOL_F => cool.push(*count),
            _ => {}
        }
    }

    log::debug!(
        "Weather split: {} rainy / {} dry, {} hot / {} cool",
        rainy.len(),
        dry.len(),
        hot.len(),
        cool.len()
    );

    let (avg_rainy, avg_dry) = (rounded_mean(&rainy), rounded_mean(&dry));
    let (avg_after_heavy, avg_normal) = (rounded_mean(&after_heavy), rounded_mean(&after_normal));
    let (avg_hot, avg_cool) = (rounded_mean(&hot), rounded_mean(&cool));

    WeatherInsights {
        rain: RainComparison {
            avg_rainy,
            avg_dry,
            diff: percent_diff(avg_rainy, avg_dry),
        },
        after_rain: AfterRainComparison {
            avg_after_heavy,
            avg_normal,
            diff: percent_diff(avg_after_heavy, avg_normal),
        },
        temp: TemperatureComparison {
            avg_hot,
            avg_cool,
            diff: percent_diff(avg_hot, avg_cool),
        },
    }
}
