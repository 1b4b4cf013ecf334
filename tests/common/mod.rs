#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use stocker::domain::error::StockerError;
pub use stocker::domain::ohlcv::{PricePoint, PriceSeries};
use stocker::domain::period::Period;
use stocker::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, symbol: &str, _period: Period) -> Result<PriceSeries, StockerError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockerError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(StockerError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockerError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_point(day: usize, close: f64) -> PricePoint {
    PricePoint {
        timestamp: start() + Duration::days(day as i64),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000.0,
    }
}

/// Daily series starting 2024-01-01 with the given closes.
pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_point(i, c))
        .collect();
    PriceSeries::new(symbol, points)
}

pub fn flat(n: usize, value: f64) -> Vec<f64> {
    vec![value; n]
}

/// Linear rise from 100 to 150 over the first half, then back to 100.
pub fn rise_then_fall(n: usize) -> Vec<f64> {
    let half = n / 2;
    let up = (0..half).map(|i| 100.0 + 50.0 * i as f64 / (half - 1) as f64);
    let down = (0..n - half).map(|i| 150.0 - 50.0 * (i + 1) as f64 / (n - half) as f64);
    up.chain(down).collect()
}

/// Dips below the oscillator floor, then rallies well above the ceiling.
pub fn dip_then_rally() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - 2.0 * i as f64).collect();
    closes.extend((1..=20).map(|i| 62.0 + 3.0 * i as f64));
    closes
}

/// Write `<SYMBOL>.csv` files for `series` into `dir`.
pub fn write_csv(dir: &std::path::Path, series: &PriceSeries) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for p in &series.points {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            p.timestamp.format("%Y-%m-%d"),
            p.open,
            p.high,
            p.low,
            p.close,
            p.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", series.symbol)), content).unwrap();
}
