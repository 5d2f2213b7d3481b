//! Data access port trait.

use crate::domain::error::QuantbtError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` sorted by date, restricted to the inclusive range.
    /// An open bound means no restriction on that side.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, QuantbtError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantbtError>;

    /// First date, last date and bar count; `None` for an empty history.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantbtError> {
        let bars = self.fetch_ohlcv(symbol, None, None)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
