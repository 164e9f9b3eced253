//! Time-series smoothing.

use civic_atlas_geometry::round_half_up;

/// Trailing `window`-point mean of `values`, rounded half-up.
///
/// The first `window - 1` positions have no full window and are `None`. A
/// window of 0 yields all `None`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn moving_average(values: &[u64], window: usize) -> Vec<Option<u64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut sum = 0u64;
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            sum += value;
            if i >= window {
                sum -= values[i - window];
            }
            (i + 1 >= window).then(|| round_half_up(sum as f64 / window as f64) as u64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_window_at_the_end() {
        assert_eq!(
            moving_average(&[1, 2, 3, 4, 5, 6, 7], 7),
            [None, None, None, None, None, None, Some(4)]
        );
    }

    #[test]
    fn window_slides() {
        assert_eq!(
            moving_average(&[2, 4, 6, 8], 2),
            [None, Some(3), Some(5), Some(7)]
        );
    }

    #[test]
    fn means_round_half_up() {
        assert_eq!(moving_average(&[1, 2], 2), [None, Some(2)]);
        assert_eq!(moving_average(&[1, 1, 2], 3), [None, None, Some(1)]);
    }

    #[test]
    fn window_longer_than_series() {
        assert_eq!(moving_average(&[5, 5], 7), [None, None]);
    }

    #[test]
    fn degenerate_windows() {
        assert_eq!(moving_average(&[3, 9], 1), [Some(3), Some(9)]);
        assert_eq!(moving_average(&[3, 9], 0), [None, None]);
        assert!(moving_average(&[], 7).is_empty());
    }
}
