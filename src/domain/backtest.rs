//! Single-strategy backtest simulator.
//!
//! `run_backtest` validates its inputs, computes the indicators the strategy
//! needs, runs the signal state machine and hands the events to `simulate`,
//! which replays them against an all-in/all-out ledger.

use serde::{Deserialize, Serialize};

use crate::domain::error::StockerError;
use crate::domain::indicator::{compute_indicators, IndicatorSeries};
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::portfolio::{EquityPoint, Ledger};
use crate::domain::signal::{generate_signals, SignalEvent, SignalKind};
use crate::domain::strategy::StrategyConfig;
use crate::domain::trade::Trade;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub strategy: StrategyConfig,
    pub initial_capital: f64,
    pub final_balance: f64,
    #[serde(flatten)]
    pub metrics: Metrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

/// Replay `signals` over `series` starting from `initial_capital` in cash.
///
/// `series` and `indicators` must be the aligned output of
/// [`compute_indicators`]; any open position is closed at the last close.
/// Signal indexes must be non-decreasing.
pub fn simulate(
    series: &PriceSeries,
    indicators: &IndicatorSeries,
    signals: &[SignalEvent],
    strategy: &StrategyConfig,
    initial_capital: f64,
) -> Result<BacktestResult, StockerError> {
    validate_capital(initial_capital)?;

    if indicators.len() != series.len() {
        return Err(StockerError::invalid_input(format!(
            "indicator rows ({}) not aligned with price points ({})",
            indicators.len(),
            series.len()
        )));
    }
    if let Some(event) = signals.iter().find(|e| e.index >= series.len()) {
        return Err(StockerError::invalid_input(format!(
            "signal index {} outside series of {} points",
            event.index,
            series.len()
        )));
    }
    if let Some(pair) = signals.windows(2).find(|w| w[1].index < w[0].index) {
        return Err(StockerError::invalid_input(format!(
            "signal at index {} follows signal at index {}",
            pair[1].index, pair[0].index
        )));
    }

    let mut ledger = Ledger::new(initial_capital);
    let mut pending = signals.iter().peekable();
    let last_index = series.len().saturating_sub(1);

    for (i, point) in series.points.iter().enumerate() {
        while let Some(event) = pending.next_if(|e| e.index == i) {
            let applied = match event.kind {
                SignalKind::EnterLong => ledger.buy(event.timestamp, event.price),
                SignalKind::ExitLong => ledger.sell(event.timestamp, event.price),
            };
            if !applied {
                tracing::warn!(
                    index = event.index,
                    kind = ?event.kind,
                    "signal ignored by ledger"
                );
            }
        }

        if i == last_index && ledger.is_invested() {
            ledger.sell(point.timestamp, point.close);
        }

        ledger.record_equity(point.timestamp, point.close);
    }

    let metrics = Metrics::compute(&ledger);

    Ok(BacktestResult {
        symbol: series.symbol.clone(),
        strategy: *strategy,
        initial_capital,
        final_balance: ledger.balance,
        metrics,
        trades: ledger.trades,
        equity_curve: ledger.equity_curve,
    })
}

/// Backtest `strategy` over `series` with `initial_capital` in cash.
///
/// Fails with `InvalidInput` for an unusable series or capital,
/// `InvalidStrategy` for bad parameters and `InsufficientData` when the
/// series is shorter than [`StrategyConfig::min_bars`].
pub fn run_backtest(
    series: &PriceSeries,
    strategy: &StrategyConfig,
    initial_capital: f64,
) -> Result<BacktestResult, StockerError> {
    validate_capital(initial_capital)?;
    strategy.validate()?;
    let series = series.validated()?;

    let minimum = strategy.min_bars();
    if series.len() < minimum {
        return Err(StockerError::InsufficientData {
            symbol: series.symbol.clone(),
            bars: series.len(),
            minimum,
        });
    }

    let indicators = compute_indicators(&series, &strategy.indicator_spec())?;
    let signals = generate_signals(&indicators, strategy);
    let result = simulate(&series, &indicators, &signals, strategy, initial_capital)?;

    tracing::debug!(
        symbol = %result.symbol,
        strategy = strategy.name(),
        trades = result.metrics.trade_count,
        final_balance = result.final_balance,
        "backtest complete"
    );

    Ok(result)
}

fn validate_capital(initial_capital: f64) -> Result<(), StockerError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(StockerError::invalid_input(format!(
            "initial_capital must be positive, got {}",
            initial_capital
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorSpec;
    use crate::domain::ohlcv::PricePoint;
    use crate::domain::trade::TradeKind;
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

    fn event(series: &PriceSeries, index: usize, kind: SignalKind) -> SignalEvent {
        SignalEvent {
            index,
            timestamp: series.points[index].timestamp,
            kind,
            price: series.points[index].close,
        }
    }

    const STRATEGY: StrategyConfig = StrategyConfig::Crossover {
        short_window: 2,
        long_window: 3,
    };

    fn indicators_for(series: &PriceSeries) -> IndicatorSeries {
        compute_indicators(series, &IndicatorSpec::with_windows(2, 3)).unwrap()
    }

    #[test]
    fn simulate_round_trip() {
        let series = make_series(&[100.0, 100.0, 120.0, 150.0, 140.0]);
        let indicators = indicators_for(&series);
        let signals = vec![
            event(&series, 2, SignalKind::EnterLong),
            event(&series, 3, SignalKind::ExitLong),
        ];

        let result = simulate(&series, &indicators, &signals, &STRATEGY, 12_000.0).unwrap();

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].kind, TradeKind::Buy);
        assert_eq!(result.trades[1].kind, TradeKind::Sell);
        assert!((result.trades[1].pnl.unwrap() - 30.0).abs() < 1e-9);
        assert!((result.final_balance - 15_000.0).abs() < 1e-6);
        assert!((result.metrics.total_profit - 3_000.0).abs() < 1e-6);
        assert_eq!(result.metrics.win_count, 1);
        assert_eq!(result.metrics.loss_count, 0);
        assert_eq!(result.equity_curve.len(), 5);
    }

    #[test]
    fn simulate_force_closes_at_last_close() {
        let series = make_series(&[100.0, 100.0, 100.0, 80.0]);
        let indicators = indicators_for(&series);
        let signals = vec![event(&series, 1, SignalKind::EnterLong)];

        let result = simulate(&series, &indicators, &signals, &STRATEGY, 10_000.0).unwrap();

        assert_eq!(result.trades.len(), 2);
        let sell = &result.trades[1];
        assert_eq!(sell.kind, TradeKind::Sell);
        assert_eq!(sell.timestamp, series.points[3].timestamp);
        assert!((sell.pnl.unwrap() + 20.0).abs() < 1e-9);
        assert!((result.final_balance - 8_000.0).abs() < 1e-6);
        assert_eq!(result.metrics.loss_count, 1);

        let last = result.equity_curve.last().unwrap();
        assert_eq!(last.shares, 0.0);
        assert!((last.balance - 8_000.0).abs() < 1e-6);
    }

    #[test]
    fn simulate_ignores_exit_when_flat() {
        let series = make_series(&[100.0, 110.0, 120.0]);
        let indicators = indicators_for(&series);
        let signals = vec![event(&series, 1, SignalKind::ExitLong)];

        let result = simulate(&series, &indicators, &signals, &STRATEGY, 10_000.0).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.final_balance, 10_000.0);
    }

    #[test]
    fn simulate_rejects_misaligned_indicators() {
        let series = make_series(&[100.0, 110.0, 120.0]);
        let indicators = indicators_for(&make_series(&[100.0, 110.0]));
        let err = simulate(&series, &indicators, &[], &STRATEGY, 10_000.0).unwrap_err();
        assert!(matches!(err, StockerError::InvalidInput { .. }));
    }

    #[test]
    fn simulate_rejects_out_of_range_signal() {
        let series = make_series(&[100.0, 110.0]);
        let indicators = indicators_for(&series);
        let mut bad = event(&series, 1, SignalKind::EnterLong);
        bad.index = 7;
        assert!(simulate(&series, &indicators, &[bad], &STRATEGY, 10_000.0).is_err());
    }

    #[test]
    fn simulate_rejects_unordered_signals() {
        let series = make_series(&[100.0, 100.0, 120.0, 150.0, 140.0]);
        let indicators = indicators_for(&series);
        let signals = vec![
            event(&series, 3, SignalKind::ExitLong),
            event(&series, 1, SignalKind::EnterLong),
        ];

        let err = simulate(&series, &indicators, &signals, &STRATEGY, 10_000.0).unwrap_err();
        assert!(matches!(err, StockerError::InvalidInput { .. }));
    }

    #[test]
    fn simulate_applies_same_index_signals_in_order() {
        let series = make_series(&[100.0, 100.0, 120.0, 150.0, 140.0]);
        let indicators = indicators_for(&series);
        let signals = vec![
            event(&series, 1, SignalKind::EnterLong),
            event(&series, 3, SignalKind::ExitLong),
            event(&series, 3, SignalKind::EnterLong),
        ];

        let result = simulate(&series, &indicators, &signals, &STRATEGY, 10_000.0).unwrap();
        let kinds: Vec<_> = result.trades.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TradeKind::Buy, TradeKind::Sell, TradeKind::Buy, TradeKind::Sell]
        );
    }

    #[test]
    fn run_backtest_rejects_non_positive_capital() {
        let series = make_series(&[100.0; 40]);
        for capital in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = run_backtest(&series, &STRATEGY, capital).unwrap_err();
            assert!(matches!(err, StockerError::InvalidInput { .. }));
        }
    }

    #[test]
    fn run_backtest_rejects_empty_series() {
        let err = run_backtest(&make_series(&[]), &STRATEGY, 10_000.0).unwrap_err();
        assert!(matches!(err, StockerError::InvalidInput { .. }));
    }

    #[test]
    fn run_backtest_insufficient_data() {
        let strategy = StrategyConfig::Crossover {
            short_window: 20,
            long_window: 50,
        };
        let err = run_backtest(&make_series(&[100.0; 10]), &strategy, 10_000.0).unwrap_err();
        match err {
            StockerError::InsufficientData {
                symbol,
                bars,
                minimum,
            } => {
                assert_eq!(symbol, "TEST");
                assert_eq!(bars, 10);
                assert_eq!(minimum, 52);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn run_backtest_rejects_invalid_strategy() {
        let strategy = StrategyConfig::Crossover {
            short_window: 30,
            long_window: 10,
        };
        let err = run_backtest(&make_series(&[100.0; 40]), &strategy, 10_000.0).unwrap_err();
        assert!(matches!(err, StockerError::InvalidStrategy { .. }));
    }

    #[test]
    fn run_backtest_threshold_strategy() {
        // steady decline drives RSI to 0, then a rally pushes it back to 50+
        let mut prices: Vec<f64> = (0..20).map(|i| 120.0 - i as f64).collect();
        prices.extend((0..20).map(|i| 101.0 + 2.0 * i as f64));
        let strategy = StrategyConfig::Threshold {
            oversold: 30.0,
            overbought: 40.0,
        };

        let result = run_backtest(&make_series(&prices), &strategy, 10_000.0).unwrap();

        assert_eq!(result.trades[0].kind, TradeKind::Buy);
        assert!((result.trades[0].price - 119.0).abs() < f64::EPSILON);
        assert_eq!(result.trades.len() % 2, 0);
        assert_eq!(result.trades.last().unwrap().kind, TradeKind::Sell);
    }

    #[test]
    fn result_serializes_flat_metrics() {
        let result = run_backtest(&make_series(&[100.0; 10]), &STRATEGY, 10_000.0).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["trade_count"], 0);
        assert_eq!(json["final_balance"], 10_000.0);
        assert_eq!(json["strategy"]["kind"], "crossover");
    }
}
