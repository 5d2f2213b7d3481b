//! ATR (Average True Range) indicator.
//!
//! The true range needs a previous close, so it is undefined on the first bar.
//! ATR is seeded with the mean of the first n true ranges (bars 1..=n) and then
//! Wilder-smoothed: ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n.
//!
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values: Vec<IndicatorPoint> = bars
        .iter()
        .map(|b| IndicatorPoint {
            date: b.date,
            valid: false,
            value: IndicatorValue::Simple(0.0),
        })
        .collect();

    if period == 0 || bars.len() <= period {
        return IndicatorSeries {
            indicator_type: IndicatorType::Atr(period),
            values,
        };
    }

    let tr_values: Vec<f64> = bars
        .windows(2)
        .map(|w| w[1].true_range(w[0].close))
        .collect();

    let mut atr = tr_values[..period].iter().sum::<f64>() / period as f64;
    for i in period..bars.len() {
        if i > period {
            atr = (atr * (period - 1) as f64 + tr_values[i - 1]) / period as f64;
        }
        values[i].valid = true;
        values[i].value = IndicatorValue::Simple(atr);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}
