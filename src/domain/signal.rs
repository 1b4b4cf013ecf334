//! Position state machine and signal generation.
//!
//! # Evaluation Semantics
//!
//! - Starts `Flat`; each consecutive pair of rows (i-1, i) with i >= 1 is
//!   evaluated once
//! - Crossover: upward cross of short over long average enters, downward
//!   cross exits
//! - Threshold: oscillator strictly below `oversold` enters, strictly above
//!   `overbought` exits
//! - At most one event per step; entry is checked first, so a step that
//!   enters never also exits

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::indicator::{IndicatorRow, IndicatorSeries};
use crate::domain::strategy::StrategyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    EnterLong,
    ExitLong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub kind: SignalKind,
    pub price: f64,
}

/// Output of one pass of the state machine over an indicator series.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRun {
    /// Position state after each row.
    pub states: Vec<PositionState>,
    pub events: Vec<SignalEvent>,
}

fn crossed_above(prev: &IndicatorRow, curr: &IndicatorRow) -> bool {
    prev.short_ma <= prev.long_ma && curr.short_ma > curr.long_ma
}

fn crossed_below(prev: &IndicatorRow, curr: &IndicatorRow) -> bool {
    prev.short_ma >= prev.long_ma && curr.short_ma < curr.long_ma
}

fn entry_fires(strategy: &StrategyConfig, prev: &IndicatorRow, curr: &IndicatorRow) -> bool {
    match strategy {
        StrategyConfig::Crossover { .. } => crossed_above(prev, curr),
        StrategyConfig::Threshold { oversold, .. } => curr.rsi < *oversold,
    }
}

fn exit_fires(strategy: &StrategyConfig, prev: &IndicatorRow, curr: &IndicatorRow) -> bool {
    match strategy {
        StrategyConfig::Crossover { .. } => crossed_below(prev, curr),
        StrategyConfig::Threshold { overbought, .. } => curr.rsi > *overbought,
    }
}

/// Run the FLAT/LONG machine over `indicators`.
pub fn run_state_machine(indicators: &IndicatorSeries, strategy: &StrategyConfig) -> SignalRun {
    let rows = &indicators.rows;
    let mut state = PositionState::Flat;
    let mut states = Vec::with_capacity(rows.len());
    let mut events = Vec::new();

    if !indicators.is_empty() {
        states.push(state);
    }

    for i in 1..rows.len() {
        let prev = &rows[i - 1];
        let curr = &rows[i];

        let kind = match state {
            PositionState::Flat if entry_fires(strategy, prev, curr) => {
                state = PositionState::Long;
                Some(SignalKind::EnterLong)
            }
            PositionState::Long if exit_fires(strategy, prev, curr) => {
                state = PositionState::Flat;
                Some(SignalKind::ExitLong)
            }
            _ => None,
        };

        if let Some(kind) = kind {
            events.push(SignalEvent {
                index: i,
                timestamp: curr.timestamp,
                kind,
                price: curr.close,
            });
        }
        states.push(state);
    }

    SignalRun { states, events }
}

/// Signal events for `strategy` over `indicators`.
pub fn generate_signals(indicators: &IndicatorSeries, strategy: &StrategyConfig) -> Vec<SignalEvent> {
    let run = run_state_machine(indicators, strategy);
    tracing::debug!(
        strategy = strategy.name(),
        events = run.events.len(),
        "generated signals"
    );
    run.events
}
