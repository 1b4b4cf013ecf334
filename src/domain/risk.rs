//! Rule-based risk scoring of an indicator snapshot.
//!
//! Score starts at 50 and each present indicator adjusts it:
//!
//! | Condition                        | Adjustment |
//! |----------------------------------|------------|
//! | oscillator > 70                  | +25        |
//! | 60 < oscillator <= 70            | +10        |
//! | oscillator < 30                  | -20        |
//! | 30 <= oscillator < 40            | -10        |
//! | short average < long average     | +20        |
//! | short average >= long average    | -10        |
//! | momentum < 0                     | +10        |
//! | momentum >= 0                    | -5         |
//!
//! The result is clamped to [0, 100]; >= 70 is HIGH, >= 50 MODERATE, else LOW.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const BASELINE: i32 = 50;
const MISSING_REASON: &str = "missing indicators";
const SCORED_REASON: &str = "Calculated from RSI, SMA, MACD.";

/// Indicator values the scorer reads; absent or non-finite values are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub oscillator: Option<f64>,
    pub short_average: Option<f64>,
    pub long_average: Option<f64>,
    pub momentum: Option<f64>,
}

impl RiskSnapshot {
    /// Read a snapshot from a loosely typed JSON object.
    ///
    /// Accepts both the field names above and the short keys `rsi`, `sma_short`,
    /// `sma_long`, `macd`. Returns `None` for anything that is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let field = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k).and_then(Value::as_f64));
        Some(RiskSnapshot {
            oscillator: field(&["oscillator", "rsi"]),
            short_average: field(&["short_average", "sma_short"]),
            long_average: field(&["long_average", "sma_long"]),
            momentum: field(&["momentum", "macd"]),
        })
    }

    fn usable(value: Option<f64>) -> Option<f64> {
        value.filter(|v| v.is_finite())
    }

    fn is_empty(&self) -> bool {
        [
            self.oscillator,
            self.short_average,
            self.long_average,
            self.momentum,
        ]
        .into_iter()
        .all(|v| Self::usable(v).is_none())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRating {
    #[serde(rename = "LOW RISK")]
    Low,
    #[serde(rename = "MODERATE RISK")]
    Moderate,
    #[serde(rename = "HIGH RISK")]
    High,
    #[serde(rename = "unknown")]
    Unknown,
}

impl RiskRating {
    fn from_score(score: u8) -> Self {
        if score >= 70 {
            RiskRating::High
        } else if score >= 50 {
            RiskRating::Moderate
        } else {
            RiskRating::Low
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskRating::Low => write!(f, "LOW RISK"),
            RiskRating::Moderate => write!(f, "MODERATE RISK"),
            RiskRating::High => write!(f, "HIGH RISK"),
            RiskRating::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: Option<u8>,
    pub rating: RiskRating,
    pub reason: String,
}

impl RiskAssessment {
    fn unknown() -> Self {
        RiskAssessment {
            score: None,
            rating: RiskRating::Unknown,
            reason: MISSING_REASON.to_string(),
        }
    }
}

fn oscillator_adjustment(oscillator: f64) -> i32 {
    if oscillator > 70.0 {
        25
    } else if oscillator > 60.0 {
        10
    } else if oscillator < 30.0 {
        -20
    } else if oscillator < 40.0 {
        -10
    } else {
        0
    }
}

/// Score `snapshot`; missing or empty input yields an `Unknown` rating.
pub fn score_risk(snapshot: Option<&RiskSnapshot>) -> RiskAssessment {
    let snapshot = match snapshot {
        Some(s) if !s.is_empty() => s,
        _ => return RiskAssessment::unknown(),
    };

    let mut score = BASELINE;

    if let Some(oscillator) = RiskSnapshot::usable(snapshot.oscillator) {
        score += oscillator_adjustment(oscillator);
    }

    if let (Some(short), Some(long)) = (
        RiskSnapshot::usable(snapshot.short_average),
        RiskSnapshot::usable(snapshot.long_average),
    ) {
        score += if short < long { 20 } else { -10 };
    }

    if let Some(momentum) = RiskSnapshot::usable(snapshot.momentum) {
        score += if momentum < 0.0 { 10 } else { -5 };
    }

    let score = score.clamp(0, 100) as u8;

    RiskAssessment {
        score: Some(score),
        rating: RiskRating::from_score(score),
        reason: SCORED_REASON.to_string(),
    }
}

/// Score an arbitrary JSON value; non-objects are treated as missing input.
///
/// An object with no recognized numeric key is also unknown rather than
/// scoring the neutral baseline.
pub fn score_risk_json(value: &Value) -> RiskAssessment {
    score_risk(RiskSnapshot::from_json(value).as_ref())
}
