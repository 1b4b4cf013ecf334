//! All-in/all-out cash ledger and equity tracking.
//!
//! The ledger is either fully in cash or fully invested: after every
//! operation exactly one of `balance` and `shares` is zero.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub balance: f64,
    pub shares: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub balance: f64,
    pub shares: f64,
    pub initial_capital: f64,
    pub entry_price: Option<f64>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Ledger {
    pub fn new(initial_capital: f64) -> Self {
        Ledger {
            balance: initial_capital,
            shares: 0.0,
            initial_capital,
            entry_price: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn is_invested(&self) -> bool {
        self.shares > 0.0
    }

    pub fn equity(&self, price: f64) -> f64 {
        self.balance + self.shares * price
    }

    /// Convert the whole balance to shares. No-op when there is no cash or
    /// the price is not positive.
    pub fn buy(&mut self, timestamp: NaiveDateTime, price: f64) -> bool {
        if self.balance <= 0.0 || price <= 0.0 {
            return false;
        }
        self.shares = self.balance / price;
        self.balance = 0.0;
        self.entry_price = Some(price);
        self.trades.push(Trade::buy(timestamp, price));
        true
    }

    /// Convert all shares back to cash and record the sell with its pnl.
    pub fn sell(&mut self, timestamp: NaiveDateTime, price: f64) -> bool {
        if self.shares <= 0.0 {
            return false;
        }
        let entry_price = self.entry_price.take().unwrap_or(price);
        self.balance = self.shares * price;
        self.shares = 0.0;
        self.trades.push(Trade::sell(timestamp, price, entry_price));
        true
    }

    pub fn record_equity(&mut self, timestamp: NaiveDateTime, price: f64) {
        self.equity_curve.push(EquityPoint {
            timestamp,
            balance: self.balance,
            shares: self.shares,
            equity: self.equity(price),
        });
    }
}
