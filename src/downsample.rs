//! Series downsampling
//!
//! Reduces an arbitrarily long series to a fixed display resolution by averaging
//! contiguous chunks. Chart width is fixed, so a year of daily samples and a week of
//! samples both render at the same canonical resolution.

use tracing::debug;

use crate::error::MetricError;
use crate::types::MetricSample;

/// Canonical number of points a sparkline or trend chart renders
pub const DEFAULT_DISPLAY_POINTS: usize = 30;

/// Chunk `index` of `target` over a series of `len` values.
///
/// Boundaries use floor division, so chunk sizes differ by at most one.
fn chunk_bounds(index: usize, len: usize, target: usize) -> (usize, usize) {
    (index * len / target, (index + 1) * len / target)
}

/// Downsample `series` to `target_points` values by chunked averaging.
///
/// Series no longer than `target_points` are returned unchanged.
pub fn downsample(series: &[f64], target_points: usize) -> Result<Vec<f64>, MetricError> {
    if target_points == 0 {
        return Err(MetricError::InvalidArgument(
            "target_points must be greater than zero".to_string(),
        ));
    }
    if series.len() <= target_points {
        return Ok(series.to_vec());
    }

    debug!(len = series.len(), target_points, "downsampling series");

    let len = series.len();
    let out = (0..target_points)
        .map(|i| {
            let (start, end) = chunk_bounds(i, len, target_points);
            let chunk = &series[start..end];
            chunk.iter().sum::<f64>() / chunk.len() as f64
        })
        .collect();

    Ok(out)
}

/// Downsample timestamped samples; each chunk keeps its last timestamp.
pub fn downsample_samples(
    samples: &[MetricSample],
    target_points: usize,
) -> Result<Vec<MetricSample>, MetricError> {
    if target_points == 0 {
        return Err(MetricError::InvalidArgument(
            "target_points must be greater than zero".to_string(),
        ));
    }
    if samples.len() <= target_points {
        return Ok(samples.to_vec());
    }

    let len = samples.len();
    let out = (0..target_points)
        .map(|i| {
            let (start, end) = chunk_bounds(i, len, target_points);
            let chunk = &samples[start..end];
            let mean = chunk.iter().map(|s| s.value).sum::<f64>() / chunk.len() as f64;
            MetricSample::new(chunk[chunk.len() - 1].timestamp, mean)
        })
        .collect();

    Ok(out)
}
