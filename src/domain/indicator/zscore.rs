//! Whole-series z-score normalization.
//!
//! z[i] = (x[i] - mean) / stddev, where mean and the sample stddev (n-1) are
//! taken over the valid points only. Warmup points stay invalid. A zero or
//! undefined stddev turns every valid point into NaN.

use statrs::statistics::Statistics;

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn zscore_normalize(series: &IndicatorSeries) -> IndicatorSeries {
    let valid: Vec<f64> = series.values.iter().filter_map(|p| p.simple()).collect();
    let mean = valid.iter().mean();
    let stddev = valid.iter().std_dev();
    let degenerate = !(stddev.is_finite() && stddev > 0.0);

    let values = series
        .values
        .iter()
        .map(|point| {
            let value = match point.simple() {
                Some(_) if degenerate => f64::NAN,
                Some(x) => (x - mean) / stddev,
                None => 0.0,
            };
            IndicatorPoint {
                date: point.date,
                valid: point.valid,
                value: IndicatorValue::Simple(value),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::ZScore(Box::new(series.indicator_type.clone())),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(points: &[Option<f64>]) -> IndicatorSeries {
        IndicatorSeries {
            indicator_type: IndicatorType::Atr(3),
            values: points
                .iter()
                .enumerate()
                .map(|(i, v)| IndicatorPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    valid: v.is_some(),
                    value: IndicatorValue::Simple(v.unwrap_or(0.0)),
                })
                .collect(),
        }
    }

    #[test]
    fn zscore_has_zero_mean_unit_sample_stddev() {
        let normalized = zscore_normalize(&series(&[None, Some(1.0), Some(2.0), Some(3.0)]));

        assert_eq!(normalized.value_at(0), None);
        // mean 2, sample stddev 1
        assert!((normalized.value_at(1).unwrap() + 1.0).abs() < 1e-12);
        assert!(normalized.value_at(2).unwrap().abs() < 1e-12);
        assert!((normalized.value_at(3).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zscore_zero_stddev_is_nan() {
        let normalized = zscore_normalize(&series(&[None, Some(5.0), Some(5.0)]));
        assert_eq!(normalized.value_at(0), None);
        assert!(normalized.value_at(1).unwrap().is_nan());
        assert!(normalized.value_at(2).unwrap().is_nan());
    }

    #[test]
    fn zscore_single_valid_point_is_nan() {
        let normalized = zscore_normalize(&series(&[None, Some(5.0)]));
        assert!(normalized.value_at(1).unwrap().is_nan());
    }

    #[test]
    fn zscore_wraps_indicator_type() {
        let normalized = zscore_normalize(&series(&[Some(1.0)]));
        assert_eq!(
            normalized.indicator_type,
            IndicatorType::ZScore(Box::new(IndicatorType::Atr(3)))
        );
    }
}
