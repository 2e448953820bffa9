//! Core types for the health-trends engine
//!
//! These are the transient values that flow between the engine stages: raw samples in,
//! trend labels, score bands and semantic colors out. None of them is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped reading for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Observation time (UTC). Accepts RFC 3339 or `YYYY-MM-DD` on input.
    #[serde(deserialize_with = "crate::series::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Observed value, always finite once validated
    pub value: f64,
}

impl MetricSample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An ordered sequence of samples tied to one metric id (e.g. `"ldl"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric_id: String,
    #[serde(default)]
    pub samples: Vec<MetricSample>,
}

/// Direction of a series relative to a noise threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }

    /// Combine a direction with the metric's polarity.
    pub fn outcome(self, polarity: Polarity) -> TrendOutcome {
        match (self, polarity) {
            (TrendDirection::Stable, _) => TrendOutcome::Neutral,
            (TrendDirection::Increasing, Polarity::HigherIsBetter)
            | (TrendDirection::Decreasing, Polarity::LowerIsBetter) => TrendOutcome::Improving,
            (TrendDirection::Increasing, Polarity::LowerIsBetter)
            | (TrendDirection::Decreasing, Polarity::HigherIsBetter) => TrendOutcome::Worsening,
        }
    }
}

/// Whether a rising value is clinically good or bad for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl From<bool> for Polarity {
    fn from(higher_is_better: bool) -> Self {
        if higher_is_better {
            Polarity::HigherIsBetter
        } else {
            Polarity::LowerIsBetter
        }
    }
}

/// Direction interpreted through polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendOutcome {
    Improving,
    Worsening,
    Neutral,
}

impl TrendOutcome {
    pub fn color(&self) -> ColorToken {
        match self {
            TrendOutcome::Improving => ColorToken::Success,
            TrendOutcome::Worsening => ColorToken::Error,
            TrendOutcome::Neutral => ColorToken::Neutral,
        }
    }
}

/// Semantic color identifier, resolved to a real color by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Success,
    Warning,
    Error,
    Info,
    Neutral,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Success => "success",
            ColorToken::Warning => "warning",
            ColorToken::Error => "error",
            ColorToken::Info => "info",
            ColorToken::Neutral => "neutral",
        }
    }
}

/// One threshold band: scores at or above `min_inclusive` get this label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub min_inclusive: f64,
    pub label: String,
    pub color: ColorToken,
}

impl ScoreBand {
    pub fn new(min_inclusive: f64, label: impl Into<String>, color: ColorToken) -> Self {
        Self {
            min_inclusive,
            label: label.into(),
            color,
        }
    }
}
