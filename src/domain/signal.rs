//! Entry/exit signal generation.
//!
//! One signal per bar from the RSI, Bollinger, MACD and ROC columns:
//!
//! - Buy:  RSI < oversold   AND (close < lower band OR ΔMACD > 0 OR ROC > 0)
//! - Sell: RSI > overbought AND (close > upper band OR ΔMACD < 0 OR ROC < 0)
//!
//! ΔMACD is the day-over-day change of the (z-scored) MACD line. Unavailable
//! inputs make their comparison false. Both conditions are evaluated on every
//! bar; when both hold, Sell wins.

use serde::{Deserialize, Serialize};

use crate::domain::indicator::IndicatorSet;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_RSI_OVERSOLD: f64 = 35.0;
pub const DEFAULT_RSI_OVERBOUGHT: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Combines independently evaluated conditions. Sell takes precedence
    /// over Buy when both are true on the same bar.
    pub fn resolve(buy: bool, sell: bool) -> Signal {
        if sell {
            Signal::Sell
        } else if buy {
            Signal::Buy
        } else {
            Signal::Hold
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
        }
    }
}

/// Per-bar inputs of the rule, read from the bars and an indicator set.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs {
    pub close: f64,
    pub rsi: Option<f64>,
    pub roc: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_upper: Option<f64>,
    pub macd_delta: Option<f64>,
}

impl SignalInputs {
    pub fn at(bars: &[OhlcvBar], indicators: &IndicatorSet, i: usize) -> Self {
        let macd_delta = if i == 0 {
            None
        } else {
            cell(&indicators.macd, i)
                .zip(cell(&indicators.macd, i - 1))
                .map(|(curr, prev)| curr - prev)
        };

        SignalInputs {
            close: bars[i].close,
            rsi: cell(&indicators.rsi, i),
            roc: cell(&indicators.roc, i),
            bb_lower: cell(&indicators.bb_lower, i),
            bb_upper: cell(&indicators.bb_upper, i),
            macd_delta,
        }
    }

    pub fn is_buy(&self, thresholds: &SignalThresholds) -> bool {
        let oversold = is_true(self.rsi, |rsi| rsi < thresholds.rsi_oversold);
        let confirmation = is_true(self.bb_lower, |lower| self.close < lower)
            || is_true(self.macd_delta, |delta| delta > 0.0)
            || is_true(self.roc, |roc| roc > 0.0);
        oversold && confirmation
    }

    pub fn is_sell(&self, thresholds: &SignalThresholds) -> bool {
        let overbought = is_true(self.rsi, |rsi| rsi > thresholds.rsi_overbought);
        let confirmation = is_true(self.bb_upper, |upper| self.close > upper)
            || is_true(self.macd_delta, |delta| delta < 0.0)
            || is_true(self.roc, |roc| roc < 0.0);
        overbought && confirmation
    }

    pub fn signal(&self, thresholds: &SignalThresholds) -> Signal {
        Signal::resolve(self.is_buy(thresholds), self.is_sell(thresholds))
    }
}

fn cell(column: &[Option<f64>], idx: usize) -> Option<f64> {
    column.get(idx).copied().flatten()
}

fn is_true(value: Option<f64>, predicate: impl Fn(f64) -> bool) -> bool {
    value.is_some_and(predicate)
}

/// One signal per bar, aligned with `bars`.
pub fn generate_signals(
    bars: &[OhlcvBar],
    indicators: &IndicatorSet,
    thresholds: &SignalThresholds,
) -> Vec<Signal> {
    (0..bars.len())
        .map(|i| SignalInputs::at(bars, indicators, i).signal(thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn inputs(close: f64) -> SignalInputs {
        SignalInputs {
            close,
            rsi: None,
            roc: None,
            bb_lower: None,
            bb_upper: None,
            macd_delta: None,
        }
    }

    fn empty_set(len: usize) -> IndicatorSet {
        IndicatorSet {
            length: 1,
            dates: (0..len)
                .map(|i| {
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
                })
                .collect(),
            rsi: vec![None; len],
            roc: vec![None; len],
            bb_lower: vec![None; len],
            bb_mid: vec![None; len],
            bb_upper: vec![None; len],
            atr: vec![None; len],
            macd: vec![None; len],
            garman_klass_volatility: vec![None; len],
            dollar_volume: vec![None; len],
        }
    }

    fn flat_bars(len: usize, close: f64) -> Vec<OhlcvBar> {
        (0..len)
            .map(|i| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100.0,
            })
            .collect()
    }

    #[test]
    fn resolve_sell_wins_tie() {
        assert_eq!(Signal::resolve(true, true), Signal::Sell);
        assert_eq!(Signal::resolve(true, false), Signal::Buy);
        assert_eq!(Signal::resolve(false, true), Signal::Sell);
        assert_eq!(Signal::resolve(false, false), Signal::Hold);
    }

    #[test]
    fn default_thresholds() {
        let t = SignalThresholds::default();
        assert_eq!(t.rsi_oversold, 35.0);
        assert_eq!(t.rsi_overbought, 65.0);
    }

    #[test]
    fn buy_requires_oversold_rsi() {
        let t = SignalThresholds::default();
        let mut i = inputs(100.0);
        i.roc = Some(1.0);
        i.rsi = Some(40.0);
        assert!(!i.is_buy(&t));
        i.rsi = Some(30.0);
        assert!(i.is_buy(&t));
    }

    #[test]
    fn buy_confirmations() {
        let t = SignalThresholds::default();
        let mut base = inputs(100.0);
        base.rsi = Some(20.0);
        assert!(!base.is_buy(&t), "no confirmation");

        let mut below_band = base;
        below_band.bb_lower = Some(101.0);
        assert!(below_band.is_buy(&t));

        let mut rising_macd = base;
        rising_macd.macd_delta = Some(0.1);
        assert!(rising_macd.is_buy(&t));

        let mut positive_roc = base;
        positive_roc.roc = Some(0.5);
        assert!(positive_roc.is_buy(&t));
    }

    #[test]
    fn sell_confirmations() {
        let t = SignalThresholds::default();
        let mut base = inputs(100.0);
        base.rsi = Some(80.0);
        assert!(!base.is_sell(&t));

        let mut above_band = base;
        above_band.bb_upper = Some(99.0);
        assert!(above_band.is_sell(&t));

        let mut falling_macd = base;
        falling_macd.macd_delta = Some(-0.1);
        assert!(falling_macd.is_sell(&t));

        let mut negative_roc = base;
        negative_roc.roc = Some(-0.5);
        assert!(negative_roc.is_sell(&t));
    }

    #[test]
    fn missing_rsi_is_hold() {
        let t = SignalThresholds::default();
        let mut i = inputs(100.0);
        i.roc = Some(5.0);
        i.macd_delta = Some(-1.0);
        assert_eq!(i.signal(&t), Signal::Hold);
    }

    #[test]
    fn nan_inputs_never_fire() {
        let t = SignalThresholds::default();
        let mut i = inputs(100.0);
        i.rsi = Some(f64::NAN);
        i.roc = Some(5.0);
        assert_eq!(i.signal(&t), Signal::Hold);
    }

    #[test]
    fn tie_resolves_to_sell() {
        // oversold 70 / overbought 30 makes RSI 50 satisfy both gates;
        // ROC > 0 confirms Buy while ΔMACD < 0 confirms Sell.
        let t = SignalThresholds {
            rsi_oversold: 70.0,
            rsi_overbought: 30.0,
        };
        let mut i = inputs(100.0);
        i.rsi = Some(50.0);
        i.roc = Some(1.0);
        i.macd_delta = Some(-1.0);
        assert!(i.is_buy(&t));
        assert!(i.is_sell(&t));
        assert_eq!(i.signal(&t), Signal::Sell);
    }

    #[test]
    fn macd_delta_is_day_over_day() {
        let bars = flat_bars(3, 10.0);
        let mut set = empty_set(3);
        set.macd = vec![None, Some(1.0), Some(0.25)];

        assert_eq!(SignalInputs::at(&bars, &set, 0).macd_delta, None);
        assert_eq!(SignalInputs::at(&bars, &set, 1).macd_delta, None);
        assert_eq!(SignalInputs::at(&bars, &set, 2).macd_delta, Some(-0.75));
    }

    #[test]
    fn generate_signals_aligned_with_bars() {
        let bars = flat_bars(4, 10.0);
        let mut set = empty_set(4);
        set.rsi = vec![None, Some(20.0), Some(50.0), Some(90.0)];
        set.roc = vec![None, Some(1.0), Some(1.0), Some(-1.0)];

        let signals = generate_signals(&bars, &set, &SignalThresholds::default());
        assert_eq!(
            signals,
            vec![Signal::Hold, Signal::Buy, Signal::Hold, Signal::Sell]
        );
    }
}
