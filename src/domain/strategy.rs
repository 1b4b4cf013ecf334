//! Strategy configuration.

use serde::{Deserialize, Serialize};

use crate::domain::error::StockerError;
use crate::domain::indicator::{rsi, IndicatorSpec};

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

/// Points needed beyond the largest window before a backtest is meaningful.
pub const WARMUP_MARGIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrategyConfig {
    /// Enter when the short average crosses above the long average, exit on
    /// the downward cross.
    Crossover {
        short_window: usize,
        long_window: usize,
    },
    /// Enter when the oscillator drops below `oversold`, exit when it rises
    /// above `overbought`.
    Threshold { oversold: f64, overbought: f64 },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Crossover {
            short_window: crate::domain::indicator::DEFAULT_SHORT_WINDOW,
            long_window: crate::domain::indicator::DEFAULT_LONG_WINDOW,
        }
    }
}

impl StrategyConfig {
    /// Pick a preset from a free-text request: anything mentioning RSI or
    /// momentum gets the oscillator strategy, everything else the crossover.
    pub fn from_prompt(prompt: &str) -> Self {
        let text = prompt.to_lowercase();
        if text.contains("rsi") || text.contains("momentum") {
            StrategyConfig::Threshold {
                oversold: DEFAULT_OVERSOLD,
                overbought: DEFAULT_OVERBOUGHT,
            }
        } else {
            StrategyConfig::default()
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::Crossover { .. } => "crossover",
            StrategyConfig::Threshold { .. } => "threshold",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StrategyConfig::Crossover {
                short_window,
                long_window,
            } => format!(
                "Moving-average crossover: buy when SMA{} rises above SMA{}, sell on the cross back below.",
                short_window, long_window
            ),
            StrategyConfig::Threshold {
                oversold,
                overbought,
            } => format!(
                "RSI threshold: buy when RSI < {}, sell when RSI > {}.",
                oversold, overbought
            ),
        }
    }

    /// Indicator windows the strategy reads.
    pub fn indicator_spec(&self) -> IndicatorSpec {
        match self {
            StrategyConfig::Crossover {
                short_window,
                long_window,
            } => IndicatorSpec::with_windows(*short_window, *long_window),
            StrategyConfig::Threshold { .. } => IndicatorSpec::default(),
        }
    }

    /// Minimum series length for a backtest: the largest window plus a margin.
    pub fn min_bars(&self) -> usize {
        let window = match self {
            StrategyConfig::Crossover {
                short_window,
                long_window,
            } => (*short_window).max(*long_window),
            StrategyConfig::Threshold { .. } => rsi::DEFAULT_PERIOD,
        };
        window + WARMUP_MARGIN
    }

    pub fn validate(&self) -> Result<(), StockerError> {
        match *self {
            StrategyConfig::Crossover {
                short_window,
                long_window,
            } => {
                if short_window == 0 || long_window == 0 {
                    return Err(StockerError::invalid_strategy(
                        "crossover windows must be at least 1",
                    ));
                }
                if short_window >= long_window {
                    return Err(StockerError::invalid_strategy(format!(
                        "short_window ({}) must be less than long_window ({})",
                        short_window, long_window
                    )));
                }
                Ok(())
            }
            StrategyConfig::Threshold {
                oversold,
                overbought,
            } => {
                for (name, value) in [("oversold", oversold), ("overbought", overbought)] {
                    if !(0.0..=100.0).contains(&value) {
                        return Err(StockerError::invalid_strategy(format!(
                            "{} must be between 0 and 100, got {}",
                            name, value
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}
