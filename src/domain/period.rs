//! Lookback periods for price history (`1mo`, `6mo`, `1y`, `max`, ...).

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDateTime};

use crate::domain::error::StockerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl Period {
    fn months(&self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::TwoYears => Some(24),
            Period::FiveYears => Some(60),
            Period::Max => None,
        }
    }

    /// Earliest timestamp covered by the period ending at `end`, or `None`
    /// when the period is unbounded.
    pub fn start_from(&self, end: NaiveDateTime) -> Option<NaiveDateTime> {
        self.months()
            .and_then(|m| end.checked_sub_months(Months::new(m)))
    }
}

impl FromStr for Period {
    type Err = StockerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "max" => Ok(Period::Max),
            other => Err(StockerError::invalid_input(format!(
                "unknown period '{}' (expected 1mo, 3mo, 6mo, 1y, 2y, 5y or max)",
                other
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        };
        write!(f, "{}", s)
    }
}
