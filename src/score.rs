//! Score calculation
//!
//! Fixed-arity aggregate scores computed from correlated check-in inputs:
//! - vitality (0-100) from mood, energy, sleep quality and inverted stress
//! - wellness heatmap cell (0-10)
//! - DASS-21 sub-scale severity
//! - blood pressure category
//! - period-over-period change
//!
//! Every function clamps its output into the documented range and never returns NaN.

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::types::ColorToken;

/// Lower bound of the 1-10 check-in scale
pub const CHECK_IN_MIN: f64 = 1.0;
/// Upper bound of the 1-10 check-in scale
pub const CHECK_IN_MAX: f64 = 10.0;

/// Clamp a check-in value onto the 1-10 scale. NaN becomes the scale minimum.
fn clamp_check_in(value: f64) -> f64 {
    if value.is_nan() {
        CHECK_IN_MIN
    } else {
        value.clamp(CHECK_IN_MIN, CHECK_IN_MAX)
    }
}

/// Stress inverted onto the same orientation as the other inputs (1 -> 10, 10 -> 1)
fn inverted_stress(stress: f64) -> f64 {
    (CHECK_IN_MAX + CHECK_IN_MIN) - clamp_check_in(stress)
}

/// One day's self-reported check-in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub mood: f64,
    pub energy: f64,
    pub sleep_quality: f64,
    pub stress: f64,
}

/// Vitality score on 0-100.
///
/// `round(((mood + energy + sleep + (11 - stress)) / 4) / 10 * 100)`, inputs clamped to 1-10.
pub fn vitality_score(mood: f64, energy: f64, sleep_quality: f64, stress: f64) -> u8 {
    let sum = clamp_check_in(mood)
        + clamp_check_in(energy)
        + clamp_check_in(sleep_quality)
        + inverted_stress(stress);
    let score = (sum / 4.0) / 10.0 * 100.0;
    score.clamp(0.0, 100.0).round() as u8
}

/// Vitality over several days of check-ins; `None` when there are none.
pub fn vitality_from_check_ins(check_ins: &[CheckIn]) -> Option<u8> {
    if check_ins.is_empty() {
        return None;
    }
    let n = check_ins.len() as f64;
    let avg = |f: fn(&CheckIn) -> f64| check_ins.iter().map(f).map(clamp_check_in).sum::<f64>() / n;
    Some(vitality_score(
        avg(|c| c.mood),
        avg(|c| c.energy),
        avg(|c| c.sleep_quality),
        avg(|c| c.stress),
    ))
}

/// Wellness heatmap score on 0-10: positive inputs weighted 70/30 against inverted stress
pub fn wellness_score(mood: f64, energy: f64, sleep_quality: f64, stress: f64) -> f64 {
    let positive =
        (clamp_check_in(mood) + clamp_check_in(energy) + clamp_check_in(sleep_quality)) / 3.0;
    (positive * 0.7 + inverted_stress(stress) * 0.3).clamp(0.0, 10.0)
}

/// Average of the current window compared with the previous one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub avg: f64,
    pub previous_avg: f64,
    pub delta: f64,
}

fn window_mean(window: &[f64]) -> f64 {
    if window.is_empty() {
        0.0
    } else {
        window.iter().sum::<f64>() / window.len() as f64
    }
}

/// Compare two windows; empty windows average to zero
pub fn period_change(current: &[f64], previous: &[f64]) -> PeriodChange {
    let avg = window_mean(current);
    let previous_avg = window_mean(previous);
    PeriodChange {
        avg,
        previous_avg,
        delta: avg - previous_avg,
    }
}

// ============================================================================
// DASS-21
// ============================================================================

/// Upper bounds (inclusive) of the Normal, Mild and Moderate ranges on the 0-42 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dass21Thresholds {
    pub normal: f64,
    pub mild: f64,
    pub moderate: f64,
}

impl Dass21Thresholds {
    pub const DEPRESSION: Self = Self {
        normal: 9.0,
        mild: 13.0,
        moderate: 20.0,
    };
    pub const ANXIETY: Self = Self {
        normal: 7.0,
        mild: 9.0,
        moderate: 14.0,
    };
    pub const STRESS: Self = Self {
        normal: 14.0,
        mild: 18.0,
        moderate: 25.0,
    };
}

/// DASS-21 severity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dass21Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Dass21Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dass21Severity::Normal => "Normal",
            Dass21Severity::Mild => "Mild",
            Dass21Severity::Moderate => "Moderate",
            Dass21Severity::Severe => "Severe",
        }
    }

    pub fn color(&self) -> ColorToken {
        match self {
            Dass21Severity::Normal => ColorToken::Success,
            Dass21Severity::Mild => ColorToken::Info,
            Dass21Severity::Moderate => ColorToken::Warning,
            Dass21Severity::Severe => ColorToken::Error,
        }
    }
}

/// Label a sub-scale score against its thresholds. Negative or NaN scores count as 0.
pub fn dass21_subscale_label(score: f64, thresholds: &Dass21Thresholds) -> Dass21Severity {
    let score = if score.is_nan() { 0.0 } else { score.max(0.0) };
    if score <= thresholds.normal {
        Dass21Severity::Normal
    } else if score <= thresholds.mild {
        Dass21Severity::Mild
    } else if score <= thresholds.moderate {
        Dass21Severity::Moderate
    } else {
        Dass21Severity::Severe
    }
}

/// Number of DASS-21 items
pub const DASS21_ITEMS: usize = 21;

// 1-based item numbers per sub-scale
const DEPRESSION_ITEMS: [usize; 7] = [3, 5, 10, 13, 16, 17, 21];
const ANXIETY_ITEMS: [usize; 7] = [2, 4, 7, 9, 15, 19, 20];
const STRESS_ITEMS: [usize; 7] = [1, 6, 8, 11, 12, 14, 18];

/// Sub-scale scores on the 0-42 scale (raw item sums doubled)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dass21Scores {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
}

/// Severity labels for all three sub-scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dass21Assessment {
    pub depression: Dass21Severity,
    pub anxiety: Dass21Severity,
    pub stress: Dass21Severity,
}

impl Dass21Scores {
    /// Score 21 answers, each 0-3, in questionnaire order
    pub fn from_answers(answers: &[u8]) -> Result<Self, MetricError> {
        if answers.len() != DASS21_ITEMS {
            return Err(MetricError::OutOfRange(format!(
                "expected {} DASS-21 answers, got {}",
                DASS21_ITEMS,
                answers.len()
            )));
        }
        if let Some((i, a)) = answers.iter().enumerate().find(|(_, a)| **a > 3) {
            return Err(MetricError::OutOfRange(format!(
                "DASS-21 item {} answer {} is outside 0-3",
                i + 1,
                a
            )));
        }
        let subscale = |items: &[usize]| {
            items.iter().map(|&item| answers[item - 1] as f64).sum::<f64>() * 2.0
        };
        Ok(Self {
            depression: subscale(&DEPRESSION_ITEMS),
            anxiety: subscale(&ANXIETY_ITEMS),
            stress: subscale(&STRESS_ITEMS),
        })
    }

    pub fn assess(&self) -> Dass21Assessment {
        Dass21Assessment {
            depression: dass21_subscale_label(self.depression, &Dass21Thresholds::DEPRESSION),
            anxiety: dass21_subscale_label(self.anxiety, &Dass21Thresholds::ANXIETY),
            stress: dass21_subscale_label(self.stress, &Dass21Thresholds::STRESS),
        }
    }
}

// ============================================================================
// Blood pressure
// ============================================================================

/// Blood pressure category from a systolic/diastolic pair (mmHg)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BpCategory {
    Normal,
    Elevated,
    Stage1,
    Stage2,
    Crisis,
}

impl BpCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BpCategory::Normal => "Normal",
            BpCategory::Elevated => "Elevated",
            BpCategory::Stage1 => "Stage 1 Hypertension",
            BpCategory::Stage2 => "Stage 2 Hypertension",
            BpCategory::Crisis => "Hypertensive Crisis",
        }
    }

    /// Rank on the risk-status scale: 2 on target, 1 attention, 0 alert
    pub fn risk_rank(&self) -> f64 {
        match self {
            BpCategory::Normal => 2.0,
            BpCategory::Elevated | BpCategory::Stage1 => 1.0,
            BpCategory::Stage2 | BpCategory::Crisis => 0.0,
        }
    }
}

pub fn blood_pressure_status(systolic: f64, diastolic: f64) -> BpCategory {
    if systolic > 180.0 || diastolic > 120.0 {
        BpCategory::Crisis
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        BpCategory::Stage2
    } else if systolic >= 130.0 || diastolic >= 80.0 {
        BpCategory::Stage1
    } else if systolic >= 120.0 {
        BpCategory::Elevated
    } else {
        BpCategory::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandTable;
    use proptest::prelude::*;

    #[test]
    fn test_vitality_example() {
        let score = vitality_score(8.0, 7.0, 9.0, 3.0);
        assert_eq!(score, 80);
        assert_eq!(BandTable::vitality().map(score as f64).label, "High");
    }

    #[test]
    fn test_vitality_extremes() {
        assert_eq!(vitality_score(10.0, 10.0, 10.0, 1.0), 100);
        assert_eq!(vitality_score(1.0, 1.0, 1.0, 10.0), 10);
    }

    #[test]
    fn test_vitality_clamps_inputs() {
        assert_eq!(vitality_score(25.0, 10.0, 10.0, -4.0), 100);
        assert_eq!(vitality_score(f64::NAN, 1.0, 1.0, f64::NAN), 10);
    }

    #[test]
    fn test_vitality_from_check_ins() {
        assert_eq!(vitality_from_check_ins(&[]), None);
        let days = [
            CheckIn {
                mood: 8.0,
                energy: 6.0,
                sleep_quality: 9.0,
                stress: 2.0,
            },
            CheckIn {
                mood: 8.0,
                energy: 8.0,
                sleep_quality: 9.0,
                stress: 4.0,
            },
        ];
        assert_eq!(vitality_from_check_ins(&days), Some(80));
    }

    #[test]
    fn test_wellness_score() {
        // positive avg 8, inverted stress 8 -> 8
        assert!((wellness_score(8.0, 7.0, 9.0, 3.0) - 8.0).abs() < 1e-9);
        assert!((wellness_score(10.0, 10.0, 10.0, 1.0) - 10.0).abs() < 1e-9);
        assert!((wellness_score(1.0, 1.0, 1.0, 10.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dass21_mild() {
        let thresholds = Dass21Thresholds {
            normal: 9.0,
            mild: 13.0,
            moderate: 20.0,
        };
        assert_eq!(dass21_subscale_label(10.0, &thresholds), Dass21Severity::Mild);
        assert_eq!(dass21_subscale_label(9.0, &thresholds), Dass21Severity::Normal);
        assert_eq!(dass21_subscale_label(20.0, &thresholds), Dass21Severity::Moderate);
        assert_eq!(dass21_subscale_label(21.0, &thresholds), Dass21Severity::Severe);
        assert_eq!(dass21_subscale_label(-5.0, &thresholds), Dass21Severity::Normal);
    }

    #[test]
    fn test_dass21_from_answers() {
        let mut answers = [0u8; DASS21_ITEMS];
        // depression items answered 2 -> raw 14, scaled 28 -> Severe
        for item in DEPRESSION_ITEMS {
            answers[item - 1] = 2;
        }
        // anxiety item 2 answered 3 -> scaled 6 -> Normal
        answers[1] = 3;
        let scores = Dass21Scores::from_answers(&answers).unwrap();
        assert_eq!(scores.depression, 28.0);
        assert_eq!(scores.anxiety, 6.0);
        assert_eq!(scores.stress, 0.0);

        let assessment = scores.assess();
        assert_eq!(assessment.depression, Dass21Severity::Severe);
        assert_eq!(assessment.anxiety, Dass21Severity::Normal);
        assert_eq!(assessment.stress, Dass21Severity::Normal);
    }

    #[test]
    fn test_dass21_rejects_bad_answers() {
        assert!(matches!(
            Dass21Scores::from_answers(&[0; 20]),
            Err(MetricError::OutOfRange(_))
        ));
        let mut answers = [1u8; DASS21_ITEMS];
        answers[5] = 4;
        assert!(Dass21Scores::from_answers(&answers).is_err());
    }

    #[test]
    fn test_item_keys_cover_questionnaire() {
        let mut all: Vec<usize> = DEPRESSION_ITEMS
            .iter()
            .chain(ANXIETY_ITEMS.iter())
            .chain(STRESS_ITEMS.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (1..=DASS21_ITEMS).collect::<Vec<_>>());
    }

    #[test]
    fn test_period_change() {
        let change = period_change(&[6.0, 8.0], &[5.0, 5.0]);
        assert_eq!(change.avg, 7.0);
        assert_eq!(change.previous_avg, 5.0);
        assert_eq!(change.delta, 2.0);

        let empty = period_change(&[], &[]);
        assert_eq!(empty.avg, 0.0);
        assert_eq!(empty.delta, 0.0);
    }

    #[test]
    fn test_blood_pressure_status() {
        assert_eq!(blood_pressure_status(115.0, 75.0), BpCategory::Normal);
        assert_eq!(blood_pressure_status(124.0, 78.0), BpCategory::Elevated);
        assert_eq!(blood_pressure_status(118.0, 84.0), BpCategory::Stage1);
        assert_eq!(blood_pressure_status(142.0, 70.0), BpCategory::Stage2);
        assert_eq!(blood_pressure_status(185.0, 100.0), BpCategory::Crisis);

        let table = BandTable::risk_status();
        assert_eq!(table.map(BpCategory::Stage1.risk_rank()).label, "attention");
    }

    proptest! {
        #[test]
        fn prop_vitality_bounded(
            mood in -100.0f64..100.0,
            energy in -100.0f64..100.0,
            sleep in -100.0f64..100.0,
            stress in -100.0f64..100.0,
        ) {
            let score = vitality_score(mood, energy, sleep, stress);
            prop_assert!(score <= 100);
            let w = wellness_score(mood, energy, sleep, stress);
            prop_assert!((0.0..=10.0).contains(&w));
        }

        #[test]
        fn prop_dass21_any_non_negative(score in 0.0f64..1000.0) {
            let label = dass21_subscale_label(score, &Dass21Thresholds::STRESS);
            prop_assert!(matches!(
                label,
                Dass21Severity::Normal | Dass21Severity::Mild | Dass21Severity::Moderate | Dass21Severity::Severe
            ));
        }
    }
}
