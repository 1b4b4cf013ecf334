//! Technical indicator engine.
//!
//! This module turns a price series into an aligned set of derived rows:
//! - `IndicatorSpec`: window parameters for every derived column
//! - `IndicatorRow`: all derived values for one price point
//! - `IndicatorSeries`: rows indexed by position, aligned 1:1 with the sorted series
//!
//! Every value handed out is finite; non-finite intermediates are replaced by
//! the neutral value of their column before they leave this module.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::StockerError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::risk::RiskSnapshot;

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;
pub const DEFAULT_EMA_SPAN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub short_window: usize,
    pub long_window: usize,
    pub ema_span: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorSpec {
    fn default() -> Self {
        IndicatorSpec {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            ema_span: DEFAULT_EMA_SPAN,
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
        }
    }
}

impl IndicatorSpec {
    /// Default spec with the moving-average windows replaced.
    pub fn with_windows(short_window: usize, long_window: usize) -> Self {
        IndicatorSpec {
            short_window,
            long_window,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), StockerError> {
        let windows = [
            ("short_window", self.short_window),
            ("long_window", self.long_window),
            ("ema_span", self.ema_span),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        match windows.iter().find(|(_, w)| *w == 0) {
            Some((name, _)) => Err(StockerError::invalid_input(format!(
                "{} must be at least 1",
                name
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub spec: IndicatorSpec,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Latest row mapped to the risk scorer's input.
    pub fn snapshot(&self) -> Option<RiskSnapshot> {
        self.latest().map(|row| RiskSnapshot {
            oscillator: Some(row.rsi),
            short_average: Some(row.short_ma),
            long_average: Some(row.long_ma),
            momentum: Some(row.macd),
        })
    }
}

/// Replace a non-finite value with `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Compute every derived column for `series`.
///
/// The series is sorted ascending by timestamp before computing; empty
/// series, duplicate timestamps, non-finite prices and zero windows are
/// rejected with `InvalidInput`.
pub fn compute_indicators(
    series: &PriceSeries,
    spec: &IndicatorSpec,
) -> Result<IndicatorSeries, StockerError> {
    spec.validate()?;
    let series = series.validated()?;
    let closes = series.closes();

    let short_ma = calculate_sma(&closes, spec.short_window);
    let long_ma = calculate_sma(&closes, spec.long_window);
    let ema = calculate_ema(&closes, spec.ema_span);
    let rsi = calculate_rsi(&closes, spec.rsi_period);
    let macd = calculate_macd(&closes, spec.macd_fast, spec.macd_slow, spec.macd_signal);

    let rows: Vec<IndicatorRow> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            timestamp: point.timestamp,
            close: point.close,
            short_ma: finite_or(short_ma[i], point.close),
            long_ma: finite_or(long_ma[i], point.close),
            ema: finite_or(ema[i], point.close),
            rsi: finite_or(rsi[i], rsi::NEUTRAL),
            macd: finite_or(macd.line[i], 0.0),
            macd_signal: finite_or(macd.signal[i], 0.0),
            macd_histogram: finite_or(macd.histogram[i], 0.0),
        })
        .collect();

    tracing::debug!(
        symbol = %series.symbol,
        rows = rows.len(),
        short_window = spec.short_window,
        long_window = spec.long_window,
        "computed indicators"
    );

    Ok(IndicatorSeries { spec: *spec, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PricePoint;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    #[test]
    fn rows_align_with_points() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0]);
        let indicators = compute_indicators(&series, &IndicatorSpec::with_windows(2, 3)).unwrap();

        assert_eq!(indicators.len(), 4);
        for (row, point) in indicators.rows.iter().zip(&series.points) {
            assert_eq!(row.timestamp, point.timestamp);
            assert_eq!(row.close, point.close);
        }
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let mut series = make_series(&[10.0, 11.0, 12.0]);
        series.points.reverse();
        let indicators = compute_indicators(&series, &IndicatorSpec::with_windows(2, 3)).unwrap();

        let closes: Vec<f64> = indicators.rows.iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
        assert!((indicators.rows[2].short_ma - 11.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_series_is_invalid_input() {
        let series = make_series(&[]);
        let err = compute_indicators(&series, &IndicatorSpec::default()).unwrap_err();
        assert!(matches!(err, StockerError::InvalidInput { .. }));
    }

    #[test]
    fn zero_window_is_invalid_input() {
        let series = make_series(&[10.0, 11.0]);
        let err = compute_indicators(&series, &IndicatorSpec::with_windows(0, 3)).unwrap_err();
        assert!(err.to_string().contains("short_window"));
    }

    #[test]
    fn single_point_is_fully_populated() {
        let series = make_series(&[42.0]);
        let indicators = compute_indicators(&series, &IndicatorSpec::default()).unwrap();
        let row = &indicators.rows[0];
        assert_eq!(row.short_ma, 42.0);
        assert_eq!(row.long_ma, 42.0);
        assert_eq!(row.ema, 42.0);
        assert_eq!(row.rsi, rsi::NEUTRAL);
        assert_eq!(row.macd, 0.0);
    }

    #[test]
    fn snapshot_uses_latest_row() {
        let series = make_series(&[10.0, 12.0, 11.0]);
        let indicators = compute_indicators(&series, &IndicatorSpec::with_windows(2, 3)).unwrap();
        let snapshot = indicators.snapshot().unwrap();
        let last = indicators.latest().unwrap();

        assert_eq!(snapshot.oscillator, Some(last.rsi));
        assert_eq!(snapshot.short_average, Some(last.short_ma));
        assert_eq!(snapshot.long_average, Some(last.long_ma));
        assert_eq!(snapshot.momentum, Some(last.macd));
    }

    #[test]
    fn finite_or_replaces_non_finite() {
        assert_eq!(finite_or(f64::NAN, 50.0), 50.0);
        assert_eq!(finite_or(f64::INFINITY, 0.0), 0.0);
        assert_eq!(finite_or(f64::NEG_INFINITY, 1.0), 1.0);
        assert_eq!(finite_or(3.5, 0.0), 3.5);
    }

    #[test]
    fn default_spec_matches_conventional_windows() {
        let spec = IndicatorSpec::default();
        assert_eq!(spec.short_window, 50);
        assert_eq!(spec.long_window, 200);
        assert_eq!(spec.ema_span, 20);
        assert_eq!(spec.rsi_period, 14);
    }
}
