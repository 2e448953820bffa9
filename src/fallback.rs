//! Synthetic demo series
//!
//! Deterministic placeholder data for demo screens and empty states. Output is a
//! [`SyntheticSeries`], a separate type from [`MetricSeries`](crate::types::MetricSeries),
//! and every summary built from it is flagged `synthetic`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::metrics::{MetricId, MetricProfile};
use crate::types::MetricSample;

/// Pseudo-random value in `[0, 1)` from a sine hash of `seed`
pub fn seeded_unit(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    let unit = x - x.floor();
    // tiny negative x rounds up to exactly 1.0
    if unit >= 1.0 {
        0.0
    } else {
        unit
    }
}

/// Placeholder series for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSeries {
    pub metric_id: MetricId,
    pub samples: Vec<MetricSample>,
    /// Always true; lets consumers badge the data as demo data
    pub synthetic: bool,
}

impl SyntheticSeries {
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

/// Longest synthetic series (about ten years of daily samples)
pub const MAX_SYNTHETIC_DAYS: usize = 3660;

/// Generate `days` daily samples ending at `end`, around the profile's fallback base.
pub fn synthetic_series(
    profile: &MetricProfile,
    days: usize,
    seed: u64,
    end: DateTime<Utc>,
) -> Result<SyntheticSeries, MetricError> {
    if days > MAX_SYNTHETIC_DAYS {
        return Err(MetricError::InvalidArgument(format!(
            "synthetic series is limited to {} days, got {}",
            MAX_SYNTHETIC_DAYS, days
        )));
    }

    let samples = (0..days)
        .map(|i| {
            let unit = seeded_unit(seed as f64 + i as f64);
            let value = profile.fallback_base + (unit - 0.5) * 2.0 * profile.fallback_variance;
            let offset = (days - 1 - i) as i64;
            let timestamp = end
                .checked_sub_signed(Duration::days(offset))
                .ok_or_else(|| {
                    MetricError::OutOfRange(format!("{} days before {} is out of range", offset, end))
                })?;
            Ok::<_, MetricError>(MetricSample::new(timestamp, value))
        })
        .collect::<Result<Vec<_>, MetricError>>()?;

    Ok(SyntheticSeries {
        metric_id: profile.id,
        samples,
        synthetic: true,
    })
}
