//! health-trends - Time-series engine for patient dashboard health metrics
//!
//! Turns already-fetched arrays of timestamped samples into render-ready values through a
//! deterministic pipeline: downsampling → trend classification → scoring → band mapping →
//! curve path building.
//!
//! ## Modules
//!
//! - **Engine**: `downsample`, `trend`, `score`, `bands`, `curve`
//! - **Inputs**: `series` (parsing, validation, ordering), `metrics` (typed metric catalog)
//! - **Orchestration**: `pipeline`, `config`
//! - **Demo data**: `fallback` (synthetic series, always flagged as such)

pub mod bands;
pub mod config;
pub mod curve;
pub mod downsample;
pub mod error;
pub mod fallback;
pub mod metrics;
pub mod pipeline;
pub mod score;
pub mod series;
pub mod trend;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use bands::{map_to_band, BandTable};
pub use config::EngineConfig;
pub use curve::{build_area_path, build_smooth_path, CurveOptions, CurvePath};
pub use downsample::downsample;
pub use error::MetricError;
pub use metrics::{MetricId, MetricProfile};
pub use pipeline::{series_to_summary_json, summarize_series, MetricProcessor, MetricSummary};
pub use score::{dass21_subscale_label, period_change, vitality_score};
pub use trend::{classify_sparse_trend, classify_trend};
pub use types::{
    ColorToken, MetricSample, MetricSeries, Polarity, ScoreBand, TrendDirection, TrendOutcome,
};

/// Engine version embedded in report envelopes
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "health-trends";
