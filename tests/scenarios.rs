//! End-to-end checks through the public API

use health_trends::bands::BandTable;
use health_trends::curve::{build_smooth_path, CurveOptions};
use health_trends::pipeline::{summaries_to_report_json, MetricProcessor};
use health_trends::score::{dass21_subscale_label, Dass21Severity, Dass21Thresholds};
use health_trends::series::parse_series_ndjson;
use health_trends::{
    classify_trend, downsample, map_to_band, vitality_score, ColorToken, MetricId, ScoreBand,
    TrendDirection, TrendOutcome,
};
use pretty_assertions::assert_eq;

#[test]
fn downsample_constant_series() {
    assert_eq!(downsample(&[1.0; 10], 5).unwrap(), vec![1.0; 5]);
}

#[test]
fn decreasing_week_over_week() {
    let series = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0];
    assert_eq!(classify_trend(&series, 0.3), TrendDirection::Decreasing);
}

#[test]
fn vitality_high() {
    let score = vitality_score(8.0, 7.0, 9.0, 3.0);
    assert_eq!(score, 80);
    assert_eq!(BandTable::vitality().map(score as f64).label, "High");
}

#[test]
fn band_lookup_good() {
    let bands = vec![
        ScoreBand::new(90.0, "Optimal", ColorToken::Success),
        ScoreBand::new(80.0, "High", ColorToken::Success),
        ScoreBand::new(60.0, "Good", ColorToken::Info),
        ScoreBand::new(40.0, "Moderate", ColorToken::Warning),
        ScoreBand::new(0.0, "Low", ColorToken::Error),
    ];
    assert_eq!(map_to_band(72.0, &bands).unwrap().label, "Good");
}

#[test]
fn empty_path_is_empty_string() {
    let path = build_smooth_path(&[], &CurveOptions::new(320.0, 120.0)).unwrap();
    assert_eq!(path.to_string(), "");
}

#[test]
fn dass21_mild() {
    let thresholds = Dass21Thresholds {
        normal: 9.0,
        mild: 13.0,
        moderate: 20.0,
    };
    assert_eq!(dass21_subscale_label(10.0, &thresholds), Dass21Severity::Mild);
    assert_eq!(dass21_subscale_label(10.0, &Dass21Thresholds::DEPRESSION).as_str(), "Mild");
}

#[test]
fn ndjson_batch_to_report() {
    let mut lines = Vec::new();
    let hdl: Vec<String> = [("2024-01-10", 48.0), ("2024-05-10", 52.0), ("2024-09-10", 57.0)]
        .iter()
        .map(|(d, v)| format!(r#"{{"timestamp":"{d}","value":{v}}}"#))
        .collect();
    lines.push(format!(r#"{{"metric_id":"hdl","samples":[{}]}}"#, hdl.join(",")));

    let mood: Vec<String> = (1..=28)
        .map(|day| {
            let v = if day <= 14 { 5.0 } else { 7.5 };
            format!(r#"{{"timestamp":"2024-02-{day:02}","value":{v}}}"#)
        })
        .collect();
    lines.push(format!(r#"{{"metric_id":"mood","samples":[{}]}}"#, mood.join(",")));

    let all = parse_series_ndjson(&lines.join("\n")).unwrap();
    let summaries = MetricProcessor::new().summarize_all(&all).unwrap();

    assert_eq!(summaries[0].metric_id, MetricId::Hdl);
    assert_eq!(summaries[0].trend, TrendDirection::Increasing);
    assert_eq!(summaries[0].outcome, TrendOutcome::Improving);

    assert_eq!(summaries[1].metric_id, MetricId::Mood);
    assert_eq!(summaries[1].trend, TrendDirection::Increasing);
    assert_eq!(summaries[1].display_points.len(), 28);
    assert!(!summaries[1].path.is_empty());

    let report: serde_json::Value =
        serde_json::from_str(&summaries_to_report_json(summaries).unwrap()).unwrap();
    assert_eq!(report["producer"]["name"], "health-trends");
    assert_eq!(report["summaries"].as_array().unwrap().len(), 2);
    assert_eq!(report["summaries"][0]["color"], "success");
}
