//! Backtest engine and event loop.
//!
//! One run: indicators → signals → stepped execution over bars `1..N` →
//! equity curve → risk metrics. Bar 0 only seeds the equity curve with the
//! initial capital. Every run owns a fresh `Portfolio`, so an engine can be
//! reused and shared across threads.

use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::QuantbtError;
use crate::domain::execution::{check_triggers, execute_signal, ExecutionParams};
use crate::domain::indicator::TechnicalIndicators;
use crate::domain::metrics::{self, TradeStatistics};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::portfolio::{EquityPoint, Portfolio};
use crate::domain::position::Trade;
use crate::domain::signal::{
    generate_signals, Signal, SignalThresholds, DEFAULT_RSI_OVERBOUGHT, DEFAULT_RSI_OVERSOLD,
};

pub const DEFAULT_LENGTH: usize = 20;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub length: usize,
    pub initial_capital: f64,
    pub position_size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub confidence_level: f64,
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        let execution = ExecutionParams::default();
        BacktestConfig {
            length: DEFAULT_LENGTH,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            position_size: execution.position_size,
            stop_loss: execution.stop_loss,
            take_profit: execution.take_profit,
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), QuantbtError> {
        validate_backtest_config(self)
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams {
            position_size: self.position_size,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
        }
    }

    pub fn thresholds(&self) -> SignalThresholds {
        SignalThresholds {
            rsi_oversold: self.rsi_oversold,
            rsi_overbought: self.rsi_overbought,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub total_return: f64,
    pub final_equity: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub var: f64,
    pub expected_shortfall: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub win_rate: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub open_position: Option<Trade>,
    pub trade_stats: Option<TradeStatistics>,
}

impl BacktestResult {
    /// NaN when there are no closed trades.
    pub fn profit_factor(&self) -> f64 {
        self.trade_stats
            .as_ref()
            .map(|s| s.profit_factor)
            .unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Result<Self, QuantbtError> {
        config.validate()?;
        Ok(BacktestEngine { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn run(&self, bars: &[OhlcvBar]) -> Result<BacktestResult, QuantbtError> {
        if bars.is_empty() {
            return Err(QuantbtError::NoData {
                context: "backtest requires at least one bar".to_string(),
            });
        }

        let indicators = TechnicalIndicators::new(bars, self.config.length)?.compute_all();
        let signals = generate_signals(bars, &indicators, &self.config.thresholds());
        self.run_with_signals(bars, &signals)
    }

    /// Executes a precomputed signal vector, one signal per bar.
    pub fn run_with_signals(
        &self,
        bars: &[OhlcvBar],
        signals: &[Signal],
    ) -> Result<BacktestResult, QuantbtError> {
        if bars.is_empty() {
            return Err(QuantbtError::NoData {
                context: "backtest requires at least one bar".to_string(),
            });
        }
        if signals.len() != bars.len() {
            return Err(QuantbtError::invalid_parameter(
                "signals",
                format!("{} signals for {} bars", signals.len(), bars.len()),
            ));
        }

        let config = &self.config;
        let params = config.execution_params();

        info!(
            "backtest: {} bars {}..{}, length {}",
            bars.len(),
            bars[0].date,
            bars[bars.len() - 1].date,
            config.length
        );

        let mut portfolio = Portfolio::new(config.initial_capital);
        portfolio.record_equity(bars[0].date, config.initial_capital);

        for (bar, &signal) in bars.iter().zip(signals).skip(1) {
            check_triggers(&mut portfolio, bar.close, bar.date);
            execute_signal(&mut portfolio, signal, bar.close, bar.date, &params);
            let equity = portfolio.total_equity(bar.close);
            portfolio.record_equity(bar.date, equity);
        }

        let returns = metrics::close_returns(bars);
        let (trades, equity_curve, open_position) = portfolio.into_parts();
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(config.initial_capital);
        let winning_trades = metrics::winning_trades(&trades);

        info!(
            "backtest complete: {} trades ({} winning), final equity {:.2}",
            trades.len(),
            winning_trades,
            final_equity
        );

        Ok(BacktestResult {
            total_return: metrics::total_return(&equity_curve, config.initial_capital),
            final_equity,
            sharpe_ratio: metrics::sharpe_ratio(&returns, config.risk_free_rate),
            max_drawdown: metrics::max_drawdown(&returns),
            var: metrics::value_at_risk(&returns, config.confidence_level),
            expected_shortfall: metrics::expected_shortfall(&returns, config.confidence_level),
            total_trades: trades.len(),
            winning_trades,
            win_rate: metrics::win_rate(&trades),
            trade_stats: TradeStatistics::compute(&trades),
            equity_curve,
            trades,
            open_position,
        })
    }
}

/// Validates `config` and runs it once over `bars`.
pub fn run_backtest(
    bars: &[OhlcvBar],
    config: &BacktestConfig,
) -> Result<BacktestResult, QuantbtError> {
    BacktestEngine::new(config.clone())?.run(bars)
}
