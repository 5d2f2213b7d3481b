//! OHLCV bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// close * volume
    pub fn dollar_volume(&self) -> f64 {
        self.close * self.volume
    }

    /// Single-bar Garman-Klass variance estimate:
    /// ((ln H - ln L) / 2)^2 - (2 ln 2 - 1) * (ln C - ln O)^2
    ///
    /// Non-positive prices yield NaN.
    pub fn garman_klass(&self) -> f64 {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return f64::NAN;
        }
        let hl = (self.high.ln() - self.low.ln()) / 2.0;
        let co = self.close.ln() - self.open.ln();
        hl * hl - (2.0 * std::f64::consts::LN_2 - 1.0) * co * co
    }
}
