//! Metric catalog
//!
//! Typed per-metric configuration. Opaque metric id strings from the fetch layer are
//! resolved to a [`MetricId`] once at the boundary; everything after that works with a
//! [`MetricProfile`] value and never matches on strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::types::Polarity;

/// Known dashboard metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    Mood,
    Energy,
    SleepQuality,
    Stress,
    Steps,
    Rhr,
    Hrv,
    Systolic,
    Diastolic,
    Weight,
    Glucose,
    Ldl,
    Hdl,
    Triglycerides,
    Hba1c,
}

impl MetricId {
    pub const ALL: [MetricId; 15] = [
        MetricId::Mood,
        MetricId::Energy,
        MetricId::SleepQuality,
        MetricId::Stress,
        MetricId::Steps,
        MetricId::Rhr,
        MetricId::Hrv,
        MetricId::Systolic,
        MetricId::Diastolic,
        MetricId::Weight,
        MetricId::Glucose,
        MetricId::Ldl,
        MetricId::Hdl,
        MetricId::Triglycerides,
        MetricId::Hba1c,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::Mood => "mood",
            MetricId::Energy => "energy",
            MetricId::SleepQuality => "sleep_quality",
            MetricId::Stress => "stress",
            MetricId::Steps => "steps",
            MetricId::Rhr => "rhr",
            MetricId::Hrv => "hrv",
            MetricId::Systolic => "systolic",
            MetricId::Diastolic => "diastolic",
            MetricId::Weight => "weight",
            MetricId::Glucose => "glucose",
            MetricId::Ldl => "ldl",
            MetricId::Hdl => "hdl",
            MetricId::Triglycerides => "triglycerides",
            MetricId::Hba1c => "hba1c",
        }
    }

    /// Default profile for this metric
    pub fn profile(self) -> MetricProfile {
        use Polarity::{HigherIsBetter as Up, LowerIsBetter as Down};

        // (label, unit, polarity, noise threshold, sparse, fallback base, fallback variance)
        let (label, unit, polarity, noise_threshold, sparse, base, variance) = match self {
            MetricId::Mood => ("Mood", "/10", Up, 0.3, false, 7.0, 1.5),
            MetricId::Energy => ("Energy", "/10", Up, 0.3, false, 6.5, 1.5),
            MetricId::SleepQuality => ("Sleep quality", "/10", Up, 0.3, false, 7.0, 1.0),
            MetricId::Stress => ("Stress", "/10", Down, 0.3, false, 4.0, 1.5),
            MetricId::Steps => ("Steps", "steps", Up, 500.0, false, 7500.0, 2500.0),
            MetricId::Rhr => ("Resting heart rate", "bpm", Down, 1.0, false, 64.0, 4.0),
            MetricId::Hrv => ("Heart rate variability", "ms", Up, 2.0, false, 45.0, 8.0),
            MetricId::Systolic => ("Systolic", "mmHg", Down, 2.0, false, 122.0, 6.0),
            MetricId::Diastolic => ("Diastolic", "mmHg", Down, 2.0, false, 78.0, 4.0),
            MetricId::Weight => ("Weight", "kg", Down, 0.3, false, 72.0, 1.0),
            MetricId::Glucose => ("Glucose", "mg/dL", Down, 2.0, false, 95.0, 8.0),
            MetricId::Ldl => ("LDL cholesterol", "mg/dL", Down, 0.0, true, 120.0, 12.0),
            MetricId::Hdl => ("HDL cholesterol", "mg/dL", Up, 0.0, true, 55.0, 5.0),
            MetricId::Triglycerides => ("Triglycerides", "mg/dL", Down, 0.0, true, 140.0, 20.0),
            MetricId::Hba1c => ("HbA1c", "%", Down, 0.0, true, 5.6, 0.3),
        };

        MetricProfile {
            id: self,
            label: label.to_string(),
            unit: unit.to_string(),
            polarity,
            noise_threshold,
            sparse,
            fallback_base: base,
            fallback_variance: variance,
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricId {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        MetricId::ALL
            .into_iter()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| MetricError::UnknownMetric(s.to_string()))
    }
}

/// How the engine treats one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricProfile {
    pub id: MetricId,
    pub label: String,
    pub unit: String,
    pub polarity: Polarity,
    /// Minimum window-mean delta for a dense trend to leave `Stable`
    pub noise_threshold: f64,
    /// Few samples per year (labs, scans): classify first-vs-last instead of by window
    pub sparse: bool,
    /// Center of the synthetic demo series
    pub fallback_base: f64,
    /// Spread of the synthetic demo series
    pub fallback_variance: f64,
}

impl MetricProfile {
    pub fn higher_is_better(&self) -> bool {
        self.polarity == Polarity::HigherIsBetter
    }
}
