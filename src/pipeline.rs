//! Pipeline orchestration
//!
//! This module provides the public API for health-trends.
//! It runs one metric series through every engine stage and returns a render-ready
//! [`MetricSummary`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::curve::{build_area_path, build_smooth_path};
use crate::downsample::downsample;
use crate::error::MetricError;
use crate::fallback::SyntheticSeries;
use crate::metrics::{MetricId, MetricProfile};
use crate::score::{period_change, PeriodChange};
use crate::trend::{classify_sparse_trend, classify_trend_with_window};
use crate::types::{ColorToken, MetricSample, MetricSeries, TrendDirection, TrendOutcome};
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Everything a chart card needs for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric_id: MetricId,
    pub label: String,
    pub unit: String,
    pub sample_count: usize,
    pub latest: Option<MetricSample>,
    /// Downsampled values for sparkline consumers
    pub display_points: Vec<f64>,
    pub trend: TrendDirection,
    pub outcome: TrendOutcome,
    pub color: ColorToken,
    /// Last trend window compared with the one before it
    pub change: Option<PeriodChange>,
    /// Smooth curve path; empty when there is nothing to plot
    pub path: String,
    pub area_path: String,
    /// Built from placeholder data rather than real samples
    pub synthetic: bool,
}

/// Producer metadata attached to report envelopes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// A batch of summaries with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub summaries: Vec<MetricSummary>,
}

/// Run one series through the engine.
///
/// Stages:
/// 1. validate and sort chronologically
/// 2. classify the trend on the raw series
/// 3. compare the last two trend windows
/// 4. downsample to the display resolution
/// 5. build curve and area paths
pub fn summarize_series(
    series: &MetricSeries,
    profile: &MetricProfile,
    config: &EngineConfig,
) -> Result<MetricSummary, MetricError> {
    series.validate()?;
    let sorted = series.clone().into_sorted();
    summarize_samples(&sorted.samples, profile, config, false)
}

/// Summarize placeholder data; the result is flagged `synthetic`.
pub fn summarize_synthetic(
    series: &SyntheticSeries,
    config: &EngineConfig,
) -> Result<MetricSummary, MetricError> {
    summarize_samples(&series.samples, &series.metric_id.profile(), config, true)
}

fn summarize_samples(
    samples: &[MetricSample],
    profile: &MetricProfile,
    config: &EngineConfig,
    synthetic: bool,
) -> Result<MetricSummary, MetricError> {
    config.validate()?;
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

    let trend = if profile.sparse {
        classify_sparse_trend(&values)
    } else {
        classify_trend_with_window(&values, config.trend_window, profile.noise_threshold)?
    };
    let outcome = trend.outcome(profile.polarity);

    let change = window_change(&values, config.trend_window);
    let display_points = downsample(&values, config.display_points)?;

    let options = config.curve_options();
    let path = build_smooth_path(&display_points, &options)?.to_string();
    let area_path = build_area_path(&display_points, &options)?.to_string();

    debug!(
        metric = %profile.id,
        samples = values.len(),
        trend = trend.as_str(),
        "summarized series"
    );

    Ok(MetricSummary {
        metric_id: profile.id,
        label: profile.label.clone(),
        unit: profile.unit.clone(),
        sample_count: values.len(),
        latest: samples.last().copied(),
        display_points,
        trend,
        outcome,
        color: outcome.color(),
        change,
        path,
        area_path,
        synthetic,
    })
}

/// Last `window` values against the `window` before them; `None` without a previous window
fn window_change(values: &[f64], window: usize) -> Option<PeriodChange> {
    let split = values.len().saturating_sub(window);
    if split == 0 {
        return None;
    }
    let current = &values[split..];
    let previous = &values[split.saturating_sub(window)..split];
    Some(period_change(current, previous))
}

/// Stateless processor bound to one engine configuration.
pub struct MetricProcessor {
    config: EngineConfig,
}

impl Default for MetricProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProcessor {
    /// Create a processor with default settings
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create a processor with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, MetricError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve the series' metric id against the catalog and summarize it
    pub fn summarize(&self, series: &MetricSeries) -> Result<MetricSummary, MetricError> {
        let id: MetricId = series.metric_id.parse()?;
        summarize_series(series, &id.profile(), &self.config)
    }

    /// Summarize with a caller-supplied profile
    pub fn summarize_with_profile(
        &self,
        series: &MetricSeries,
        profile: &MetricProfile,
    ) -> Result<MetricSummary, MetricError> {
        summarize_series(series, profile, &self.config)
    }

    pub fn summarize_all(&self, all: &[MetricSeries]) -> Result<Vec<MetricSummary>, MetricError> {
        all.iter().map(|series| self.summarize(series)).collect()
    }

    pub fn summarize_synthetic(
        &self,
        series: &SyntheticSeries,
    ) -> Result<MetricSummary, MetricError> {
        summarize_synthetic(series, &self.config)
    }
}

/// Convert a series JSON object into a summary JSON object.
///
/// # Arguments
/// * `series_json` - `{ "metric_id": "...", "samples": [{ "timestamp", "value" }] }`
/// * `config_json` - optional [`EngineConfig`] JSON; defaults apply when `None`
///
/// # Example
/// ```ignore
/// let summary = series_to_summary_json(
///     r#"{"metric_id":"mood","samples":[]}"#.to_string(),
///     None,
/// )?;
/// ```
pub fn series_to_summary_json(
    series_json: String,
    config_json: Option<String>,
) -> Result<String, MetricError> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json(&json)?,
        None => EngineConfig::default(),
    };
    let series = crate::series::parse_series(&series_json)?;
    let summary = MetricProcessor::with_config(config)?.summarize(&series)?;
    Ok(serde_json::to_string(&summary)?)
}

/// Wrap summaries in a report envelope with producer provenance
pub fn build_report(summaries: Vec<MetricSummary>) -> SummaryReport {
    SummaryReport {
        producer: ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: Uuid::new_v4().to_string(),
        },
        computed_at_utc: Utc::now().to_rfc3339(),
        summaries,
    }
}

pub fn summaries_to_report_json(summaries: Vec<MetricSummary>) -> Result<String, MetricError> {
    Ok(serde_json::to_string(&build_report(summaries))?)
}
