//! Engine configuration
//!
//! Display resolution, chart geometry and smoothing parameters shared by every metric.
//! Per-metric settings live in [`MetricProfile`](crate::metrics::MetricProfile).

use serde::{Deserialize, Serialize};

use crate::curve::{AutoRange, CurveOptions, DEFAULT_TENSION};
use crate::downsample::DEFAULT_DISPLAY_POINTS;
use crate::error::MetricError;
use crate::trend::DEFAULT_TREND_WINDOW;

/// Largest accepted trend window (one year of daily samples)
pub const MAX_TREND_WINDOW: usize = 366;

/// Chart box in rendering units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartBox {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartBox {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 100.0,
        }
    }
}

/// Shared engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Points a chart renders after downsampling
    pub display_points: usize,
    pub chart: ChartBox,
    pub tension: f64,
    pub auto_range: AutoRange,
    /// Window size of the dense trend classifier
    pub trend_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_points: DEFAULT_DISPLAY_POINTS,
            chart: ChartBox::default(),
            tension: DEFAULT_TENSION,
            auto_range: AutoRange::default(),
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), MetricError> {
        if self.display_points == 0 {
            return Err(MetricError::InvalidArgument(
                "display_points must be greater than zero".to_string(),
            ));
        }
        if self.trend_window == 0 || self.trend_window > MAX_TREND_WINDOW {
            return Err(MetricError::InvalidArgument(format!(
                "trend_window must be within 1-{}, got {}",
                MAX_TREND_WINDOW, self.trend_window
            )));
        }
        self.curve_options().validate()
    }

    /// Curve options for this configuration with auto-ranged values
    pub fn curve_options(&self) -> CurveOptions {
        CurveOptions {
            auto_range: self.auto_range,
            ..CurveOptions::new(self.chart.width, self.chart.height).with_tension(self.tension)
        }
    }

    /// Load and validate configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, MetricError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
