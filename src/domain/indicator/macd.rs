//! MACD (Moving Average Convergence Divergence) line.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//!
//! Default parameters: fast=12, slow=26
//! Warmup: max(fast, slow) - 1 bars.

use crate::domain::indicator::{
    calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;

pub fn calculate_macd(bars: &[OhlcvBar], fast: usize, slow: usize) -> IndicatorSeries {
    let ema_fast = calculate_ema(bars, fast);
    let ema_slow = calculate_ema(bars, slow);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let line = ema_fast
                .value_at(i)
                .zip(ema_slow.value_at(i))
                .map(|(f, s)| f - s);
            IndicatorPoint {
                date: bar.date,
                valid: line.is_some(),
                value: IndicatorValue::Simple(line.unwrap_or(0.0)),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Macd { fast, slow },
        values,
    }
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW)
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
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn trending(count: usize) -> Vec<OhlcvBar> {
        let prices: Vec<f64> = (0..count).map(|i| 100.0 + i as f64).collect();
        make_bars(&prices)
    }

    #[test]
    fn macd_warmup_default() {
        let series = calculate_macd_default(&trending(40));

        let warmup = DEFAULT_SLOW - 1;
        for i in 0..warmup {
            assert!(!series.values[i].valid, "Index {} should not be valid", i);
        }
        assert!(series.values[warmup].valid);
        assert_eq!(series.len(), 40);
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        let series = calculate_macd(&bars, 3, 5);

        let ema_fast = calculate_ema(&bars, 3);
        let ema_slow = calculate_ema(&bars, 5);

        for i in 4..bars.len() {
            let expected = ema_fast.value_at(i).unwrap() - ema_slow.value_at(i).unwrap();
            assert!(
                (series.value_at(i).unwrap() - expected).abs() < f64::EPSILON,
                "MACD line mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let series = calculate_macd_default(&trending(40));
        assert!(series.value_at(39).unwrap() > 0.0);
    }

    #[test]
    fn macd_short_input_is_unavailable() {
        let series = calculate_macd_default(&trending(10));
        assert_eq!(series.len(), 10);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd(&trending(3), 5, 10);
        assert_eq!(series.indicator_type, IndicatorType::Macd { fast: 5, slow: 10 });
    }

    #[test]
    fn macd_empty_bars() {
        let series = calculate_macd_default(&[]);
        assert!(series.is_empty());
    }
}
