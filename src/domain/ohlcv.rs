//! OHLCV price points and the per-symbol price series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::StockerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}

/// Ordered OHLCV points for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Sorted copy of the series, ascending by timestamp.
    ///
    /// Rejects empty series, duplicate timestamps, non-finite prices and
    /// non-positive closes.
    pub fn validated(&self) -> Result<PriceSeries, StockerError> {
        if self.is_empty() {
            return Err(StockerError::invalid_input(format!(
                "empty price series for {}",
                self.symbol
            )));
        }

        if let Some(bad) = self.points.iter().find(|p| !p.is_finite()) {
            return Err(StockerError::invalid_input(format!(
                "non-finite price at {} for {}",
                bad.timestamp, self.symbol
            )));
        }

        if let Some(bad) = self.points.iter().find(|p| p.close <= 0.0) {
            return Err(StockerError::invalid_input(format!(
                "non-positive close {} at {} for {}",
                bad.close, bad.timestamp, self.symbol
            )));
        }

        let mut points = self.points.clone();
        points.sort_by_key(|p| p.timestamp);

        if let Some(pair) = points.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(StockerError::invalid_input(format!(
                "duplicate timestamp {} for {}",
                pair[0].timestamp, self.symbol
            )));
        }

        Ok(PriceSeries {
            symbol: self.symbol.clone(),
            points,
        })
    }
}
