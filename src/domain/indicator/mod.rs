//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values aligned with the bars
//!
//! Points inside an indicator's warmup window carry `valid == false` and are
//! surfaced as `None` by the accessors; their stored value is a placeholder.

pub mod atr;
pub mod bollinger;
pub mod dollar_volume;
pub mod ema;
pub mod garman_klass;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod technical;
pub mod zscore;

pub use ema::calculate_ema;
pub use technical::{IndicatorSet, TechnicalIndicators};

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    /// The scalar value, if this point is valid and holds one.
    pub fn simple(&self) -> Option<f64> {
        match (self.valid, &self.value) {
            (true, IndicatorValue::Simple(v)) => Some(*v),
            _ => None,
        }
    }

    /// `(lower, middle, upper)` for a valid Bollinger point.
    pub fn bands(&self) -> Option<(f64, f64, f64)> {
        match (self.valid, &self.value) {
            (
                true,
                IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            ) => Some((*lower, *middle, *upper)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Roc(usize),
    Atr(usize),
    Macd { fast: usize, slow: usize },
    Bollinger { period: usize, stddev_mult_x100: u32 },
    GarmanKlass,
    DollarVolume,
    ZScore(Box<IndicatorType>),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(IndicatorPoint::simple)
    }

    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::simple).collect()
    }

    /// Splits a Bollinger series into `(lower, middle, upper)` columns.
    pub fn band_values(&self) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
        let mut lower = Vec::with_capacity(self.values.len());
        let mut middle = Vec::with_capacity(self.values.len());
        let mut upper = Vec::with_capacity(self.values.len());
        for point in &self.values {
            let bands = point.bands();
            lower.push(bands.map(|b| b.0));
            middle.push(bands.map(|b| b.1));
            upper.push(bands.map(|b| b.2));
        }
        (lower, middle, upper)
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::GarmanKlass => write!(f, "GARMAN_KLASS"),
            IndicatorType::DollarVolume => write!(f, "DOLLAR_VOLUME"),
            IndicatorType::ZScore(inner) => write!(f, "ZSCORE({})", inner),
        }
    }
}
