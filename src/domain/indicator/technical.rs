//! Indicator engine over one validated bar sequence.
//!
//! `TechnicalIndicators` binds a bar slice to a rolling window length and
//! exposes every derived series the strategy and the indicator export use.
//! ATR and MACD are z-score normalized over the whole series so they are
//! comparable in scale with the other signal inputs.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::error::QuantbtError;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::bollinger::{calculate_bollinger, DEFAULT_STDDEV_MULT_X100};
use crate::domain::indicator::dollar_volume::calculate_dollar_volume;
use crate::domain::indicator::garman_klass::calculate_garman_klass;
use crate::domain::indicator::macd::calculate_macd_default;
use crate::domain::indicator::roc::calculate_roc;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::zscore::zscore_normalize;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy)]
pub struct TechnicalIndicators<'a> {
    bars: &'a [OhlcvBar],
    length: usize,
}

impl<'a> TechnicalIndicators<'a> {
    /// Fails with `NoData` for an empty slice and `InvalidParameter` unless
    /// `1 <= length <= bars.len()`.
    pub fn new(bars: &'a [OhlcvBar], length: usize) -> Result<Self, QuantbtError> {
        if bars.is_empty() {
            return Err(QuantbtError::NoData {
                context: "empty bar sequence".to_string(),
            });
        }
        if length == 0 {
            return Err(QuantbtError::invalid_parameter(
                "length",
                "must be at least 1",
            ));
        }
        if length > bars.len() {
            return Err(QuantbtError::invalid_parameter(
                "length",
                format!("{} exceeds series length {}", length, bars.len()),
            ));
        }
        Ok(Self { bars, length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn bars(&self) -> &'a [OhlcvBar] {
        self.bars
    }

    pub fn rsi(&self) -> IndicatorSeries {
        calculate_rsi(self.bars, self.length)
    }

    pub fn roc(&self) -> IndicatorSeries {
        calculate_roc(self.bars, self.length)
    }

    /// Bollinger series; split into columns with [`IndicatorSeries::band_values`].
    pub fn bollinger_bands(&self) -> IndicatorSeries {
        calculate_bollinger(self.bars, self.length, DEFAULT_STDDEV_MULT_X100)
    }

    pub fn atr(&self) -> IndicatorSeries {
        zscore_normalize(&calculate_atr(self.bars, self.length))
    }

    pub fn macd(&self) -> IndicatorSeries {
        zscore_normalize(&calculate_macd_default(self.bars))
    }

    pub fn garman_klass_volatility(&self) -> IndicatorSeries {
        calculate_garman_klass(self.bars)
    }

    pub fn dollar_volume(&self) -> IndicatorSeries {
        calculate_dollar_volume(self.bars)
    }

    /// Computes every series. Independent indicators run on the rayon pool.
    pub fn compute_all(&self) -> IndicatorSet {
        let ((rsi, roc), (bollinger, (atr, macd))) = rayon::join(
            || rayon::join(|| self.rsi(), || self.roc()),
            || {
                rayon::join(
                    || self.bollinger_bands(),
                    || rayon::join(|| self.atr(), || self.macd()),
                )
            },
        );
        let (bb_lower, bb_mid, bb_upper) = bollinger.band_values();

        IndicatorSet {
            length: self.length,
            dates: self.bars.iter().map(|b| b.date).collect(),
            rsi: rsi.simple_values(),
            roc: roc.simple_values(),
            bb_lower,
            bb_mid,
            bb_upper,
            atr: atr.simple_values(),
            macd: macd.simple_values(),
            garman_klass_volatility: self.garman_klass_volatility().simple_values(),
            dollar_volume: self.dollar_volume().simple_values(),
        }
    }
}

/// Every indicator column for one bar sequence, aligned index-for-index with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub length: usize,
    pub dates: Vec<NaiveDate>,
    pub rsi: Vec<Option<f64>>,
    pub roc: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub bb_mid: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub garman_klass_volatility: Vec<Option<f64>>,
    pub dollar_volume: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub const COLUMN_NAMES: [&'static str; 9] = [
        "rsi",
        "roc",
        "bb_lower",
        "bb_mid",
        "bb_upper",
        "atr",
        "macd",
        "garman_klass_volatility",
        "dollar_volume",
    ];

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        let column = match name {
            "rsi" => &self.rsi,
            "roc" => &self.roc,
            "bb_lower" => &self.bb_lower,
            "bb_mid" => &self.bb_mid,
            "bb_upper" => &self.bb_upper,
            "atr" => &self.atr,
            "macd" => &self.macd,
            "garman_klass_volatility" => &self.garman_klass_volatility,
            "dollar_volume" => &self.dollar_volume,
            _ => return None,
        };
        Some(column.as_slice())
    }

    pub fn columns(&self) -> Vec<(&'static str, &[Option<f64>])> {
        Self::COLUMN_NAMES
            .iter()
            .filter_map(|name| self.get(name).map(|col| (*name, col)))
            .collect()
    }

    /// Indices of defined-but-NaN values per column, such as a z-score over a
    /// zero-variance window. Columns without any are left out.
    pub fn nan_indices(&self) -> BTreeMap<&'static str, Vec<usize>> {
        self.columns()
            .into_iter()
            .filter_map(|(name, col)| {
                let indices: Vec<usize> = col
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_some_and(f64::is_nan))
                    .map(|(i, _)| i)
                    .collect();
                (!indices.is_empty()).then_some((name, indices))
            })
            .collect()
    }
}
