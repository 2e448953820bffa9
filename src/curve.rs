//! Curve path building
//!
//! Turns a value series into a smooth, rendering-agnostic path inside a fixed
//! `width x height` box. Consecutive points are joined by cubic Bézier segments whose
//! control points are pushed horizontally by a tension fraction and held at their
//! endpoint's y, so monotonic data never overshoots.
//!
//! The result is a list of [`PathCommand`]s; `Display` renders it as an SVG-style `d`
//! string with two-decimal coordinates.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MetricError;

/// Default horizontal control-point offset, as a fraction of the segment width
pub const DEFAULT_TENSION: f64 = 0.3;

/// A point in chart coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single drawing command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// A declarative path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    pub commands: Vec<PathCommand>,
}

impl CurvePath {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl fmt::Display for CurvePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match command {
                PathCommand::MoveTo(p) => write!(out, "M {:.2} {:.2}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(out, "L {:.2} {:.2}", p.x, p.y)?,
                PathCommand::CubicTo { c1, c2, to } => write!(
                    out,
                    "C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                )?,
                PathCommand::Close => out.push('Z'),
            }
        }
        f.write_str(&out)
    }
}

/// Padding applied to the series extremes when no explicit range is given
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRange {
    pub lower_factor: f64,
    pub upper_factor: f64,
}

impl Default for AutoRange {
    fn default() -> Self {
        Self {
            lower_factor: 0.9,
            upper_factor: 1.1,
        }
    }
}

/// Geometry and scaling options for a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveOptions {
    pub width: f64,
    pub height: f64,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub tension: f64,
    pub auto_range: AutoRange,
}

impl CurveOptions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            min_value: None,
            max_value: None,
            tension: DEFAULT_TENSION,
            auto_range: AutoRange::default(),
        }
    }

    pub fn with_range(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = Some(min_value);
        self.max_value = Some(max_value);
        self
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    pub fn validate(&self) -> Result<(), MetricError> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(MetricError::InvalidArgument(format!(
                "chart box must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.tension) {
            return Err(MetricError::InvalidArgument(format!(
                "tension must be within 0-1, got {}",
                self.tension
            )));
        }
        let AutoRange {
            lower_factor,
            upper_factor,
        } = self.auto_range;
        if !(lower_factor.is_finite() && upper_factor.is_finite()) {
            return Err(MetricError::InvalidArgument(format!(
                "auto range factors must be finite, got {} and {}",
                lower_factor, upper_factor
            )));
        }
        if let Some(bound) = [self.min_value, self.max_value]
            .into_iter()
            .flatten()
            .find(|v| !v.is_finite())
        {
            return Err(MetricError::InvalidArgument(format!(
                "value range bounds must be finite, got {}",
                bound
            )));
        }
        Ok(())
    }

    /// Value range used for the y axis: explicit bounds win, otherwise padded extremes.
    ///
    /// Padding always widens the range, so negative extremes swap factors.
    fn value_range(&self, values: &[f64]) -> (f64, f64) {
        let AutoRange {
            lower_factor,
            upper_factor,
        } = self.auto_range;
        let data_min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = self.min_value.unwrap_or_else(|| {
            data_min * if data_min >= 0.0 { lower_factor } else { upper_factor }
        });
        let max = self.max_value.unwrap_or_else(|| {
            data_max * if data_max >= 0.0 { upper_factor } else { lower_factor }
        });
        (min, max)
    }
}

fn check_finite(values: &[f64]) -> Result<(), MetricError> {
    match values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, value)) => Err(MetricError::NonFiniteValue(format!(
            "curve value {} is {}",
            index, value
        ))),
        None => Ok(()),
    }
}

/// Map values into the chart box. Non-finite values are rejected.
pub fn normalize_points(
    values: &[f64],
    options: &CurveOptions,
) -> Result<Vec<Point>, MetricError> {
    check_finite(values)?;
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let (min, max) = options.value_range(values);
    let mut range = max - min;
    if range == 0.0 || !range.is_finite() {
        debug!(min, max, "degenerate value range, substituting 1");
        range = 1.0;
    }

    let step = if values.len() > 1 {
        options.width / (values.len() - 1) as f64
    } else {
        0.0
    };

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let y = options.height - (v - min) / range * options.height;
            Point::new(i as f64 * step, y)
        })
        .collect())
}

fn smooth_commands(points: &[Point], tension: f64) -> Vec<PathCommand> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(*first));
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let dx = (p1.x - p0.x) * tension;
        commands.push(PathCommand::CubicTo {
            c1: Point::new(p0.x + dx, p0.y),
            c2: Point::new(p1.x - dx, p1.y),
            to: p1,
        });
    }
    commands
}

/// Smooth curve through `values`. Empty input gives an empty path.
pub fn build_smooth_path(
    values: &[f64],
    options: &CurveOptions,
) -> Result<CurvePath, MetricError> {
    let points = normalize_points(values, options)?;
    Ok(CurvePath {
        commands: smooth_commands(&points, options.tension),
    })
}

/// The smooth curve closed down to the chart baseline, for filled areas
pub fn build_area_path(
    values: &[f64],
    options: &CurveOptions,
) -> Result<CurvePath, MetricError> {
    let points = normalize_points(values, options)?;
    let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) else {
        return Ok(CurvePath::default());
    };

    let mut commands = smooth_commands(&points, options.tension);
    commands.push(PathCommand::LineTo(Point::new(last.x, options.height)));
    commands.push(PathCommand::LineTo(Point::new(first.x, options.height)));
    commands.push(PathCommand::Close);
    Ok(CurvePath { commands })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_empty_path() {
        let options = CurveOptions::new(300.0, 100.0);
        let path = build_smooth_path(&[], &options).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
        assert_eq!(build_area_path(&[], &options).unwrap().to_string(), "");
    }

    #[test]
    fn test_single_point_is_move_only() {
        let options = CurveOptions::new(300.0, 100.0).with_range(0.0, 10.0);
        let path = build_smooth_path(&[5.0], &options).unwrap();
        assert_eq!(path.commands, vec![PathCommand::MoveTo(Point::new(0.0, 50.0))]);
        assert_eq!(path.to_string(), "M 0.00 50.00");
    }

    #[test]
    fn test_two_points_explicit_range() {
        let options = CurveOptions::new(100.0, 50.0)
            .with_range(0.0, 10.0)
            .with_tension(0.25);
        let path = build_smooth_path(&[0.0, 10.0], &options).unwrap();
        assert_eq!(
            path.to_string(),
            "M 0.00 50.00 C 25.00 50.00, 75.00 0.00, 100.00 0.00"
        );
    }

    #[test]
    fn test_flat_series_does_not_divide_by_zero() {
        let options = CurveOptions::new(100.0, 50.0).with_range(4.0, 4.0);
        let path = build_smooth_path(&[4.0, 4.0, 4.0], &options).unwrap();
        assert_eq!(path.len(), 3);
        for command in &path.commands {
            if let PathCommand::CubicTo { to, .. } = command {
                assert_eq!(to.y, 50.0);
            }
        }
        assert!(!path.to_string().contains("NaN"));
    }

    #[test]
    fn test_all_zero_series_auto_range() {
        let options = CurveOptions::new(100.0, 50.0);
        let path = build_smooth_path(&[0.0, 0.0], &options).unwrap();
        assert!(!path.to_string().contains("NaN"));
        assert!(!path.to_string().contains("inf"));
    }

    #[test]
    fn test_auto_range_padding() {
        let options = CurveOptions::new(100.0, 100.0);
        let points = normalize_points(&[10.0, 20.0], &options).unwrap();
        // range 9..22
        assert!((points[0].y - (100.0 - 1.0 / 13.0 * 100.0)).abs() < 1e-9);
        assert!((points[1].y - (100.0 - 11.0 / 13.0 * 100.0)).abs() < 1e-9);
        assert_eq!(points[1].x, 100.0);
    }

    #[test]
    fn test_area_path_closes_to_baseline() {
        let options = CurveOptions::new(100.0, 50.0).with_range(0.0, 10.0);
        let area = build_area_path(&[2.0, 8.0], &options).unwrap();
        let n = area.commands.len();
        assert_eq!(area.commands[n - 1], PathCommand::Close);
        assert_eq!(
            area.commands[n - 2],
            PathCommand::LineTo(Point::new(0.0, 50.0))
        );
        assert_eq!(
            area.commands[n - 3],
            PathCommand::LineTo(Point::new(100.0, 50.0))
        );
        assert!(area.to_string().ends_with("L 100.00 50.00 L 0.00 50.00 Z"));
    }

    #[test]
    fn test_validate_options() {
        assert!(CurveOptions::new(0.0, 10.0).validate().is_err());
        assert!(CurveOptions::new(10.0, 10.0).with_tension(1.5).validate().is_err());
        assert!(CurveOptions::new(10.0, 10.0).validate().is_ok());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let options = CurveOptions::new(100.0, 50.0);
        assert!(matches!(
            build_smooth_path(&[1.0, f64::NAN, 3.0], &options),
            Err(MetricError::NonFiniteValue(_))
        ));
        assert!(matches!(
            build_area_path(&[1.0, f64::INFINITY], &options),
            Err(MetricError::NonFiniteValue(_))
        ));
        assert!(matches!(
            normalize_points(&[f64::NEG_INFINITY], &options),
            Err(MetricError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_settings() {
        let options = CurveOptions::new(10.0, 10.0).with_range(0.0, f64::INFINITY);
        assert!(options.validate().is_err());
        let options = CurveOptions {
            auto_range: AutoRange {
                lower_factor: 0.9,
                upper_factor: f64::NAN,
            },
            ..CurveOptions::new(10.0, 10.0)
        };
        assert!(options.validate().is_err());
        assert!(CurveOptions::new(f64::NAN, 10.0).validate().is_err());
    }

    #[test]
    fn test_commands_serialize_tagged() {
        let json = serde_json::to_string(&PathCommand::MoveTo(Point::new(1.0, 2.0))).unwrap();
        assert_eq!(json, r#"{"op":"move_to","x":1.0,"y":2.0}"#);
    }

    proptest! {
        #[test]
        fn prop_path_is_deterministic(
            values in prop::collection::vec(-500.0f64..500.0, 0..60),
            width in 10.0f64..1000.0,
            height in 10.0f64..500.0,
        ) {
            let options = CurveOptions::new(width, height);
            let a = build_smooth_path(&values, &options).unwrap().to_string();
            let b = build_smooth_path(&values, &options).unwrap().to_string();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_auto_range_keeps_points_in_box(
            values in prop::collection::vec(-500.0f64..500.0, 1..60),
        ) {
            let options = CurveOptions::new(300.0, 100.0);
            for p in normalize_points(&values, &options).unwrap() {
                prop_assert!((-1e-9..=100.0 + 1e-9).contains(&p.y));
            }
        }

        #[test]
        fn prop_points_stay_in_box_with_explicit_range(
            values in prop::collection::vec(0.0f64..100.0, 1..60),
        ) {
            let options = CurveOptions::new(300.0, 100.0).with_range(0.0, 100.0);
            for p in normalize_points(&values, &options).unwrap() {
                prop_assert!((0.0..=300.0).contains(&p.x));
                prop_assert!((-1e-9..=100.0 + 1e-9).contains(&p.y));
            }
        }
    }
}
