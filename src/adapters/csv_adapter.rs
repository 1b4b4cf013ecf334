//! CSV file data adapter: one `<SYMBOL>.csv` per symbol under a base directory.
//!
//! Expected columns: `date,open,high,low,close,volume`. Dates may be plain
//! `YYYY-MM-DD` or carry a time of day.

use crate::domain::error::StockerError;
use crate::domain::ohlcv::{PricePoint, PriceSeries};
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", symbol.trim().to_uppercase()))
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, StockerError> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| StockerError::Data {
            reason: format!("invalid date '{}'", value),
        })
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, StockerError> {
    record
        .get(index)
        .ok_or_else(|| StockerError::Data {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| StockerError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_record(record: &csv::StringRecord) -> Result<PricePoint, StockerError> {
    let date = record.get(0).ok_or_else(|| StockerError::Data {
        reason: "missing date column".into(),
    })?;

    Ok(PricePoint {
        timestamp: parse_timestamp(date)?,
        open: parse_field(record, 1, "open")?,
        high: parse_field(record, 2, "high")?,
        low: parse_field(record, 3, "low")?,
        close: parse_field(record, 4, "close")?,
        volume: parse_field(record, 5, "volume")?,
    })
}

/// Keep the points of a sorted series inside `period`, counted back from
/// the newest point.
fn filter_period(mut series: PriceSeries, period: Period) -> PriceSeries {
    if let Some(start) = series.last().and_then(|p| period.start_from(p.timestamp)) {
        series.points.retain(|p| p.timestamp >= start);
    }
    series
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str, period: Period) -> Result<PriceSeries, StockerError> {
        let symbol = symbol.trim().to_uppercase();
        let path = self.csv_path(&symbol);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StockerError::NoData {
                symbol: symbol.clone(),
            },
            _ => StockerError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockerError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            points.push(parse_record(&record)?);
        }

        points.sort_by_key(|p| p.timestamp);
        let series = filter_period(PriceSeries::new(symbol.clone(), points), period);

        if series.is_empty() {
            return Err(StockerError::NoData { symbol });
        }

        tracing::debug!(
            symbol = %symbol,
            period = %period,
            points = series.len(),
            "loaded price series"
        );

        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockerError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StockerError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
