//! Risk and performance metrics.
//!
//! Risk figures are computed over the simple percentage returns of the close
//! prices, not over the equity curve. Undefined results are NaN; the only
//! infinite value is the profit factor of a history with winners and no
//! losers.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use super::ohlcv::OhlcvBar;
use super::portfolio::EquityPoint;
use super::position::Trade;

/// r[i] = (C[i+1] - C[i]) / C[i], N-1 values.
pub fn close_returns(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

/// Sample standard deviation; NaN with fewer than two returns.
pub fn standard_deviation(returns: &[f64]) -> f64 {
    returns.iter().std_dev()
}

/// (mean - risk_free_rate) / stddev, unannualized. NaN when stddev is zero or
/// undefined.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let stddev = standard_deviation(returns);
    if stddev.is_nan() || stddev == 0.0 {
        return f64::NAN;
    }
    (returns.iter().mean() - risk_free_rate) / stddev
}

/// (cum - running_max) / running_max over cum = cumprod(1 + r).
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;
    returns
        .iter()
        .map(|r| {
            cumulative *= 1.0 + r;
            peak = peak.max(cumulative);
            (cumulative - peak) / peak
        })
        .collect()
}

/// Deepest drawdown as a non-positive fraction; NaN without returns.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    drawdown_series(returns)
        .into_iter()
        .fold(f64::INFINITY, f64::min)
}

/// Parametric VaR: mean + Φ⁻¹(1 - confidence) × stddev.
pub fn value_at_risk(returns: &[f64], confidence_level: f64) -> f64 {
    if confidence_level.is_nan() || confidence_level <= 0.0 || confidence_level >= 1.0 {
        return f64::NAN;
    }
    let z = match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf(1.0 - confidence_level),
        Err(_) => return f64::NAN,
    };
    returns.iter().mean() + z * standard_deviation(returns)
}

/// Mean of the worst ⌊(1 - confidence) × N⌋ returns; NaN when that is zero.
pub fn expected_shortfall(returns: &[f64], confidence_level: f64) -> f64 {
    let tail = ((1.0 - confidence_level) * returns.len() as f64).floor();
    if tail.is_nan() || tail < 1.0 {
        return f64::NAN;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[..tail as usize].iter().mean()
}

/// Σ positive profits / |Σ negative profits|.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let (gains, losses) = trades
        .iter()
        .map(Trade::realized_profit)
        .fold((0.0, 0.0), |(gains, losses), p| {
            if p > 0.0 {
                (gains + p, losses)
            } else {
                (gains, losses - p)
            }
        });

    if losses > 0.0 {
        gains / losses
    } else if gains > 0.0 {
        f64::INFINITY
    } else {
        f64::NAN
    }
}

pub fn winning_trades(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.realized_profit() > 0.0).count()
}

/// Winning / total; 0 with no trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    winning_trades(trades) as f64 / trades.len() as f64
}

pub fn total_return(equity_curve: &[EquityPoint], initial_capital: f64) -> f64 {
    let final_equity = equity_curve
        .last()
        .map(|p| p.equity)
        .unwrap_or(initial_capital);
    (final_equity - initial_capital) / initial_capital
}

/// Standalone risk report over a price history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub observations: usize,
    pub standard_deviation: f64,
    pub value_at_risk: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub expected_shortfall: f64,
    pub drawdown: Vec<f64>,
}

impl RiskMetrics {
    pub fn compute(bars: &[OhlcvBar], confidence_level: f64, risk_free_rate: f64) -> Self {
        let returns = close_returns(bars);
        RiskMetrics {
            observations: returns.len(),
            standard_deviation: standard_deviation(&returns),
            value_at_risk: value_at_risk(&returns, confidence_level),
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate),
            max_drawdown: max_drawdown(&returns),
            expected_shortfall: expected_shortfall(&returns, confidence_level),
            drawdown: drawdown_series(&returns),
        }
    }
}

/// Profit distribution over closed trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStatistics {
    pub avg_profit: f64,
    /// Population standard deviation.
    pub profit_std: f64,
    pub max_profit: f64,
    pub max_loss: f64,
    pub profit_factor: f64,
}

impl TradeStatistics {
    /// `None` for an empty history.
    pub fn compute(trades: &[Trade]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let profits: Vec<f64> = trades.iter().map(Trade::realized_profit).collect();
        Some(TradeStatistics {
            avg_profit: profits.iter().mean(),
            profit_std: profits.iter().population_std_dev(),
            max_profit: profits.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            max_loss: profits.iter().copied().fold(f64::INFINITY, f64::min),
            profit_factor: profit_factor(trades),
        })
    }
}
