//! Core domain types and logic.

pub mod ohlcv;
pub mod period;
pub mod indicator;
pub mod strategy;
pub mod signal;
pub mod trade;
pub mod portfolio;
pub mod metrics;
pub mod backtest;
pub mod risk;
pub mod analysis;
pub mod config_validation;
pub mod error;
