//! Parameter sweeps: many independent backtests over one bar sequence.
//!
//! Each configuration gets its own engine and portfolio on the rayon pool;
//! outcomes come back in input order.

use log::info;
use rayon::prelude::*;

use crate::domain::backtest::{BacktestConfig, BacktestEngine, BacktestResult};
use crate::domain::error::QuantbtError;
use crate::domain::ohlcv::OhlcvBar;

/// Candidate values per parameter. An empty list keeps the base value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepGrid {
    pub stop_loss: Vec<f64>,
    pub take_profit: Vec<f64>,
    pub position_size: Vec<f64>,
    pub rsi_oversold: Vec<f64>,
    pub rsi_overbought: Vec<f64>,
}

impl SweepGrid {
    /// Cartesian product of the grid applied over `base`.
    pub fn expand(&self, base: &BacktestConfig) -> Vec<BacktestConfig> {
        let or_base = |values: &[f64], fallback: f64| -> Vec<f64> {
            if values.is_empty() {
                vec![fallback]
            } else {
                values.to_vec()
            }
        };

        let stop_losses = or_base(&self.stop_loss, base.stop_loss);
        let take_profits = or_base(&self.take_profit, base.take_profit);
        let position_sizes = or_base(&self.position_size, base.position_size);
        let oversolds = or_base(&self.rsi_oversold, base.rsi_oversold);
        let overboughts = or_base(&self.rsi_overbought, base.rsi_overbought);

        let mut configs = Vec::with_capacity(
            stop_losses.len()
                * take_profits.len()
                * position_sizes.len()
                * oversolds.len()
                * overboughts.len(),
        );
        for &stop_loss in &stop_losses {
            for &take_profit in &take_profits {
                for &position_size in &position_sizes {
                    for &rsi_oversold in &oversolds {
                        for &rsi_overbought in &overboughts {
                            configs.push(BacktestConfig {
                                stop_loss,
                                take_profit,
                                position_size,
                                rsi_oversold,
                                rsi_overbought,
                                ..base.clone()
                            });
                        }
                    }
                }
            }
        }
        configs
    }
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub config: BacktestConfig,
    pub result: Result<BacktestResult, QuantbtError>,
}

/// Runs every config in parallel. Invalid configs fail individually without
/// affecting the others.
pub fn run_sweep(bars: &[OhlcvBar], configs: &[BacktestConfig]) -> Vec<SweepOutcome> {
    info!("sweep: {} configurations over {} bars", configs.len(), bars.len());

    configs
        .par_iter()
        .map(|config| SweepOutcome {
            config: config.clone(),
            result: BacktestEngine::new(config.clone()).and_then(|engine| engine.run(bars)),
        })
        .collect()
}

/// Index of the successful outcome with the highest total return.
pub fn best_by_total_return(outcomes: &[SweepOutcome]) -> Option<usize> {
    outcomes
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.result.as_ref().ok().map(|r| (i, r.total_return)))
        .filter(|(_, ret)| !ret.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, ret)| match best {
            Some((_, best_ret)) if best_ret >= ret => best,
            _ => Some((i, ret)),
        })
        .map(|(i, _)| i)
}
