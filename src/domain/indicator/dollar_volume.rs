//! Dollar volume: close × volume per bar, no rolling window.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_dollar_volume(bars: &[OhlcvBar]) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::DollarVolume,
        values: bars
            .iter()
            .map(|bar| IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(bar.dollar_volume()),
            })
            .collect(),
    }
}
