//! ROC (Rate of Change) indicator.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0: ROC = 0
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_roc(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i >= period;

        let value = if valid {
            let prev_close = bars[i - period].close;
            if prev_close == 0.0 {
                0.0
            } else {
                ((bar.close - prev_close) / prev_close) * 100.0
            }
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn roc_warmup() {
        let series = calculate_roc(&make_bars(&[100.0, 105.0, 110.0, 115.0, 120.0]), 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(!series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn roc_basic_calculation() {
        let series = calculate_roc(&make_bars(&[100.0, 105.0, 110.0, 115.0]), 2);

        assert_eq!(series.value_at(1), None);
        let expected = ((110.0 - 100.0) / 100.0) * 100.0;
        assert!((series.value_at(2).unwrap() - expected).abs() < f64::EPSILON);
        let expected = ((115.0 - 105.0) / 105.0) * 100.0;
        assert!((series.value_at(3).unwrap() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn roc_zero_division() {
        let series = calculate_roc(&make_bars(&[0.0, 100.0, 110.0]), 2);
        assert_eq!(series.value_at(2), Some(0.0));
    }

    #[test]
    fn roc_negative_change() {
        let series = calculate_roc(&make_bars(&[100.0, 90.0, 80.0]), 2);
        let v = series.value_at(2).unwrap();
        assert!((v - (-20.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn roc_zero_period_is_unavailable() {
        let series = calculate_roc(&make_bars(&[100.0, 90.0]), 0);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn roc_indicator_type() {
        let series = calculate_roc(&make_bars(&[100.0, 105.0]), 10);
        assert_eq!(series.indicator_type, IndicatorType::Roc(10));
    }
}
