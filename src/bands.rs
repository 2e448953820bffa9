//! Band/threshold mapping
//!
//! A band table is an ordered list of `min_inclusive` thresholds, highest first. A score
//! maps to the first band whose minimum it meets; anything below every band falls into
//! the lowest one. Tables are validated on construction and never re-sorted.

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::types::{ColorToken, ScoreBand};

/// A validated, descending band table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BandTable {
    bands: Vec<ScoreBand>,
}

impl BandTable {
    /// Build a table, rejecting empty or non-descending input
    pub fn new(bands: Vec<ScoreBand>) -> Result<Self, MetricError> {
        validate_bands(&bands)?;
        Ok(Self { bands })
    }

    /// Map a score to its band. NaN falls to the lowest band.
    pub fn map(&self, score: f64) -> &ScoreBand {
        scan(&self.bands, score)
    }

    /// Position of the matched band counted from the bottom (0 = lowest band)
    pub fn rank(&self, score: f64) -> usize {
        let top_index = self
            .bands
            .iter()
            .position(|band| band.min_inclusive <= score)
            .unwrap_or(self.bands.len() - 1);
        self.bands.len() - 1 - top_index
    }

    pub fn bands(&self) -> &[ScoreBand] {
        &self.bands
    }

    /// Vitality bands on the 0-100 scale
    pub fn vitality() -> Self {
        Self {
            bands: vec![
                ScoreBand::new(90.0, "Optimal", ColorToken::Success),
                ScoreBand::new(80.0, "High", ColorToken::Success),
                ScoreBand::new(60.0, "Good", ColorToken::Info),
                ScoreBand::new(40.0, "Moderate", ColorToken::Warning),
                ScoreBand::new(0.0, "Low", ColorToken::Error),
            ],
        }
    }

    /// Generic three-level risk status, scored by rank (2 = on target)
    pub fn risk_status() -> Self {
        Self {
            bands: vec![
                ScoreBand::new(2.0, "on-target", ColorToken::Success),
                ScoreBand::new(1.0, "attention", ColorToken::Warning),
                ScoreBand::new(0.0, "alert", ColorToken::Error),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for BandTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bands = Vec::<ScoreBand>::deserialize(deserializer)?;
        BandTable::new(bands).map_err(serde::de::Error::custom)
    }
}

fn validate_bands(bands: &[ScoreBand]) -> Result<(), MetricError> {
    if bands.is_empty() {
        return Err(MetricError::InvalidArgument(
            "band table must contain at least one band".to_string(),
        ));
    }
    if let Some(band) = bands.iter().find(|b| !b.min_inclusive.is_finite()) {
        return Err(MetricError::InvalidArgument(format!(
            "band '{}' has a non-finite threshold",
            band.label
        )));
    }
    if let Some(pair) = bands
        .windows(2)
        .find(|pair| pair[0].min_inclusive <= pair[1].min_inclusive)
    {
        return Err(MetricError::InvalidArgument(format!(
            "bands must be strictly descending: '{}' ({}) precedes '{}' ({})",
            pair[0].label, pair[0].min_inclusive, pair[1].label, pair[1].min_inclusive
        )));
    }
    Ok(())
}

fn scan(bands: &[ScoreBand], score: f64) -> &ScoreBand {
    bands
        .iter()
        .find(|band| band.min_inclusive <= score)
        .unwrap_or(&bands[bands.len() - 1])
}

/// Validate `bands` and map `score` in one call
pub fn map_to_band(score: f64, bands: &[ScoreBand]) -> Result<&ScoreBand, MetricError> {
    validate_bands(bands)?;
    Ok(scan(bands, score))
}
