//! Result output port.

use serde::Serialize;

use crate::domain::analysis::{Analysis, IndicatorSummary};
use crate::domain::backtest::BacktestResult;
use crate::domain::error::StockerError;
use crate::domain::indicator::IndicatorSpec;
use crate::domain::risk::RiskAssessment;
use crate::domain::strategy::StrategyConfig;

/// Everything a command can hand back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Indicators(IndicatorSummary),
    Backtest(Box<BacktestResult>),
    Risk(RiskAssessment),
    Analysis(Box<Analysis>),
    Symbols { symbols: Vec<String> },
    Config {
        valid: bool,
        strategy: StrategyConfig,
        description: String,
        indicators: IndicatorSpec,
        period: String,
        initial_capital: f64,
    },
    Error { error: String },
}

impl From<&StockerError> for Report {
    fn from(err: &StockerError) -> Self {
        Report::Error {
            error: err.to_string(),
        }
    }
}

/// Port for writing command results.
pub trait ReportPort {
    fn write(&self, report: &Report) -> Result<(), StockerError>;
}
