//! Trend classification
//!
//! Two variants:
//! - dense series (daily logs): compare the mean of the first and last windows
//! - sparse series (a few lab draws or scans a year): compare first and last values
//!
//! The classifier only reports direction. Whether a direction is good or bad is decided
//! by the caller through [`Polarity`](crate::types::Polarity).

use tracing::debug;

use crate::error::MetricError;
use crate::types::TrendDirection;

/// Window size used by the dense classifier (one week of daily samples)
pub const DEFAULT_TREND_WINDOW: usize = 7;

/// Default noise threshold for 1-10 check-in scales
pub const DEFAULT_NOISE_THRESHOLD: f64 = 0.3;

/// Minimum percent change for the sparse classifier to leave `Stable`
pub const SPARSE_PERCENT_THRESHOLD: f64 = 2.0;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn direction_from_delta(delta: f64, threshold: f64) -> TrendDirection {
    if delta > threshold {
        TrendDirection::Increasing
    } else if delta < -threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Classify a dense series using 7-point windows.
///
/// Fewer than 14 points is not enough signal and always yields `Stable`.
pub fn classify_trend(series: &[f64], noise_threshold: f64) -> TrendDirection {
    classify_windows(series, DEFAULT_TREND_WINDOW, noise_threshold)
}

/// Classify a dense series with an explicit window size.
pub fn classify_trend_with_window(
    series: &[f64],
    window: usize,
    noise_threshold: f64,
) -> Result<TrendDirection, MetricError> {
    if window == 0 {
        return Err(MetricError::InvalidArgument(
            "trend window must be greater than zero".to_string(),
        ));
    }
    Ok(classify_windows(series, window, noise_threshold))
}

fn classify_windows(series: &[f64], window: usize, noise_threshold: f64) -> TrendDirection {
    // `window * 2` can overflow
    if series.len() / 2 < window {
        debug!(len = series.len(), window, "series too short for trend");
        return TrendDirection::Stable;
    }
    let first_avg = mean(&series[..window]);
    let last_avg = mean(&series[series.len() - window..]);
    direction_from_delta(last_avg - first_avg, noise_threshold.abs())
}

/// Classify a sparse series by comparing first and last values.
pub fn classify_sparse_trend(series: &[f64]) -> TrendDirection {
    classify_sparse_trend_with_threshold(series, SPARSE_PERCENT_THRESHOLD)
}

/// Sparse classification with a custom percent-change threshold.
///
/// A first value of zero has no meaningful percent change and yields `Stable`.
pub fn classify_sparse_trend_with_threshold(
    series: &[f64],
    percent_threshold: f64,
) -> TrendDirection {
    let (first, last) = match (series.first(), series.last()) {
        (Some(&first), Some(&last)) if series.len() >= 2 => (first, last),
        _ => return TrendDirection::Stable,
    };
    if first == 0.0 {
        debug!("sparse trend baseline is zero");
        return TrendDirection::Stable;
    }

    let delta = last - first;
    let percent_change = (delta / first).abs() * 100.0;
    if !percent_change.is_finite() || percent_change < percent_threshold {
        return TrendDirection::Stable;
    }
    direction_from_delta(delta, 0.0)
}
