//! Series handling
//!
//! Parsing, validation and ordering of metric series as they arrive from the fetch
//! layer. Everything downstream works on plain `f64` slices; this module is where
//! timestamps and non-finite values are dealt with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::error::MetricError;
use crate::types::{MetricSample, MetricSeries};

/// Parse an RFC 3339 date-time or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MetricError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| MetricError::DateParseError(format!("unrecognized timestamp '{trimmed}'")))
}

/// Serde hook used by [`MetricSample`] so inputs may carry either timestamp form.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

impl MetricSeries {
    pub fn new(metric_id: impl Into<String>, samples: Vec<MetricSample>) -> Self {
        Self {
            metric_id: metric_id.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Reject any sample whose value is NaN or infinite
    pub fn validate(&self) -> Result<(), MetricError> {
        if let Some((index, sample)) = self
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| !s.value.is_finite())
        {
            warn!(metric = %self.metric_id, index, "rejecting non-finite sample");
            return Err(MetricError::NonFiniteValue(format!(
                "{} sample {} at {} is {}",
                self.metric_id, index, sample.timestamp, sample.value
            )));
        }
        Ok(())
    }

    pub fn is_chronological(&self) -> bool {
        self.samples
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// Stable sort by timestamp, in place
    pub fn sort_chronological(&mut self) {
        if !self.is_chronological() {
            debug!(metric = %self.metric_id, "sorting out-of-order series");
            self.samples.sort_by_key(|s| s.timestamp);
        }
    }

    /// Consume the series and return it in chronological order
    pub fn into_sorted(mut self) -> Self {
        self.sort_chronological();
        self
    }

    /// Values in current sample order
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn first(&self) -> Option<&MetricSample> {
        self.samples.first()
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.iter().max_by_key(|s| s.timestamp)
    }
}

/// Parse a single series from a JSON object
pub fn parse_series(json: &str) -> Result<MetricSeries, MetricError> {
    let series: MetricSeries = serde_json::from_str(json)?;
    series.validate()?;
    Ok(series)
}

/// Parse a JSON array of series
pub fn parse_series_array(json: &str) -> Result<Vec<MetricSeries>, MetricError> {
    let all: Vec<MetricSeries> = serde_json::from_str(json)?;
    for series in &all {
        series.validate()?;
    }
    Ok(all)
}

/// Parse newline-delimited JSON, one series per line; blank lines are skipped
pub fn parse_series_ndjson(ndjson: &str) -> Result<Vec<MetricSeries>, MetricError> {
    let mut all = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let series: MetricSeries = serde_json::from_str(trimmed).map_err(|e| {
            MetricError::InvalidArgument(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;
        series.validate()?;
        all.push(series);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let full = parse_timestamp("2024-01-15T08:30:00Z").unwrap();
        assert_eq!(full, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());

        let offset = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(offset, full);

        let date_only = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());

        assert!(matches!(
            parse_timestamp("15/01/2024"),
            Err(MetricError::DateParseError(_))
        ));
    }

    #[test]
    fn test_sort_chronological() {
        let mut series = MetricSeries::new(
            "mood",
            vec![
                MetricSample::new(at(3), 3.0),
                MetricSample::new(at(1), 1.0),
                MetricSample::new(at(2), 2.0),
            ],
        );
        assert!(!series.is_chronological());
        series.sort_chronological();
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.latest().map(|s| s.value), Some(3.0));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let series = MetricSeries::new(
            "ldl",
            vec![
                MetricSample::new(at(1), 120.0),
                MetricSample::new(at(2), f64::NAN),
            ],
        );
        assert!(matches!(
            series.validate(),
            Err(MetricError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_parse_series_json() {
        let json = r#"{
            "metric_id": "ldl",
            "samples": [
                { "timestamp": "2024-01-15", "value": 130.0 },
                { "timestamp": "2024-06-15T09:00:00Z", "value": 118.5 }
            ]
        }"#;
        let series = parse_series(json).unwrap();
        assert_eq!(series.metric_id, "ldl");
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), vec![130.0, 118.5]);
    }

    #[test]
    fn test_parse_series_missing_samples_is_empty() {
        let series = parse_series(r#"{ "metric_id": "steps" }"#).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let input = "{\"metric_id\":\"mood\",\"samples\":[]}\n\n{not json}\n";
        let err = parse_series_ndjson(input).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_ndjson() {
        let input = concat!(
            "{\"metric_id\":\"mood\",\"samples\":[{\"timestamp\":\"2024-01-01\",\"value\":7}]}\n",
            "{\"metric_id\":\"stress\",\"samples\":[]}\n"
        );
        let all = parse_series_ndjson(input).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].metric_id, "stress");
    }
}
