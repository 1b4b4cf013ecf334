//! Simulated trades.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub timestamp: NaiveDateTime,
    pub price: f64,
    /// Per-share P&L against the last buy; only set on sells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,
}

impl Trade {
    pub fn buy(timestamp: NaiveDateTime, price: f64) -> Self {
        Trade {
            kind: TradeKind::Buy,
            timestamp,
            price,
            pnl: None,
        }
    }

    pub fn sell(timestamp: NaiveDateTime, price: f64, entry_price: f64) -> Self {
        Trade {
            kind: TradeKind::Sell,
            timestamp,
            price,
            pnl: Some(price - entry_price),
        }
    }

    pub fn is_sell(&self) -> bool {
        self.kind == TradeKind::Sell
    }
}
