//! Price-series provider port.

use crate::domain::error::StockerError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::period::Period;

pub trait DataPort {
    /// OHLCV history for `symbol` covering `period`, ascending by timestamp.
    ///
    /// Unavailable data is `StockerError::NoData`, never an empty series.
    fn fetch_series(&self, symbol: &str, period: Period) -> Result<PriceSeries, StockerError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockerError>;
}
