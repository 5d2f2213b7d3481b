//! Garman-Klass volatility estimator.
//!
//! Closed-form, per bar, no rolling window; see [`OhlcvBar::garman_klass`].
//! Every bar is valid; bars with non-positive prices carry NaN.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_garman_klass(bars: &[OhlcvBar]) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::GarmanKlass,
        values: bars
            .iter()
            .map(|bar| IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(bar.garman_klass()),
            })
            .collect(),
    }
}
