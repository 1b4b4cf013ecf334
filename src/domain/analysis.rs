//! Latest-point market analysis: indicator summary, risk and a heuristic
//! recommendation.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::StockerError;
use crate::domain::indicator::{compute_indicators, IndicatorRow, IndicatorSpec};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::risk::{score_risk, RiskAssessment};

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;
const SIGNAL_CONFIDENCE: u8 = 65;
const NEUTRAL_CONFIDENCE: u8 = 50;
const TARGET_MULTIPLIER: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::Sell => write!(f, "SELL"),
            Recommendation::Hold => write!(f, "HOLD"),
        }
    }
}

/// Indicator values at the most recent point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub short_window: usize,
    pub long_window: usize,
    pub sma_short: f64,
    pub sma_long: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd: f64,
}

impl IndicatorSummary {
    fn from_row(symbol: &str, spec: &IndicatorSpec, row: &IndicatorRow) -> Self {
        IndicatorSummary {
            symbol: symbol.to_uppercase(),
            timestamp: row.timestamp,
            close: row.close,
            short_window: spec.short_window,
            long_window: spec.long_window,
            sma_short: row.short_ma,
            sma_long: row.long_ma,
            ema: row.ema,
            rsi: row.rsi,
            macd: row.macd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub indicators: IndicatorSummary,
    pub risk: RiskAssessment,
    pub recommendation: Recommendation,
    pub confidence: u8,
    pub price_target: f64,
}

/// Oscillator-driven call: oversold buys, overbought sells, else hold.
pub fn recommend(rsi: f64) -> (Recommendation, u8) {
    if rsi < OVERSOLD {
        (Recommendation::Buy, SIGNAL_CONFIDENCE)
    } else if rsi > OVERBOUGHT {
        (Recommendation::Sell, SIGNAL_CONFIDENCE)
    } else {
        (Recommendation::Hold, NEUTRAL_CONFIDENCE)
    }
}

/// Indicator summary of the latest point of `series`.
pub fn summarize(series: &PriceSeries, spec: &IndicatorSpec) -> Result<IndicatorSummary, StockerError> {
    let indicators = compute_indicators(series, spec)?;
    let row = indicators
        .latest()
        .ok_or_else(|| StockerError::invalid_input("no indicator rows"))?;
    Ok(IndicatorSummary::from_row(&series.symbol, spec, row))
}

pub fn analyze(series: &PriceSeries, spec: &IndicatorSpec) -> Result<Analysis, StockerError> {
    let indicators = compute_indicators(series, spec)?;
    let row = indicators
        .latest()
        .ok_or_else(|| StockerError::invalid_input("no indicator rows"))?;

    let summary = IndicatorSummary::from_row(&series.symbol, spec, row);
    let risk = score_risk(indicators.snapshot().as_ref());
    let (recommendation, confidence) = recommend(row.rsi);

    Ok(Analysis {
        summary: format!("Heuristic analysis for {}.", summary.symbol),
        price_target: row.close * TARGET_MULTIPLIER,
        indicators: summary,
        risk,
        recommendation,
        confidence,
    })
}
