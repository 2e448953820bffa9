//! Error types for health-trends

use thiserror::Error;

/// Errors that can occur while processing metric series
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Non-finite sample value: {0}")]
    NonFiniteValue(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
