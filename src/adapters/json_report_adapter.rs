//! JSON report adapter implementing ReportPort.
//!
//! Pretty-printed serde_json documents. Non-finite floats (NaN Sharpe,
//! infinite profit factor) are written as `null`. Indicator exports add a
//! `degenerate` map of the indices whose `null` stands for NaN rather than
//! a warmup gap.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::QuantbtError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::metrics::RiskMetrics;
use crate::domain::sweep::SweepOutcome;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct BacktestReport<'a> {
    symbol: &'a str,
    config: &'a BacktestConfig,
    result: &'a BacktestResult,
}

#[derive(Serialize)]
struct IndicatorReport<'a> {
    symbol: &'a str,
    indicators: &'a IndicatorSet,
    degenerate: BTreeMap<&'static str, Vec<usize>>,
}

#[derive(Serialize)]
struct RiskReport<'a> {
    symbol: &'a str,
    metrics: &'a RiskMetrics,
}

/// One sweep row; equity curves and trade lists are left out.
#[derive(Serialize)]
struct SweepRow<'a> {
    config: &'a BacktestConfig,
    total_return: Option<f64>,
    sharpe_ratio: Option<f64>,
    max_drawdown: Option<f64>,
    total_trades: Option<usize>,
    win_rate: Option<f64>,
    profit_factor: Option<f64>,
    error: Option<String>,
}

impl<'a> From<&'a SweepOutcome> for SweepRow<'a> {
    fn from(outcome: &'a SweepOutcome) -> Self {
        match &outcome.result {
            Ok(result) => SweepRow {
                config: &outcome.config,
                total_return: Some(result.total_return),
                sharpe_ratio: Some(result.sharpe_ratio),
                max_drawdown: Some(result.max_drawdown),
                total_trades: Some(result.total_trades),
                win_rate: Some(result.win_rate),
                profit_factor: Some(result.profit_factor()),
                error: None,
            },
            Err(e) => SweepRow {
                config: &outcome.config,
                total_return: None,
                sharpe_ratio: None,
                max_drawdown: None,
                total_trades: None,
                win_rate: None,
                profit_factor: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
struct SweepReport<'a> {
    symbol: &'a str,
    runs: Vec<SweepRow<'a>>,
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        JsonReportAdapter
    }

    fn write_json<T: Serialize>(
        &self,
        document: &T,
        output_path: &str,
    ) -> Result<(), QuantbtError> {
        let json = serde_json::to_string_pretty(document).map_err(|e| QuantbtError::Report {
            reason: format!("failed to serialize report: {e}"),
        })?;

        if let Some(parent) = Path::new(output_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, json).map_err(|e| QuantbtError::Report {
            reason: format!("failed to write {output_path}: {e}"),
        })
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_backtest(
        &self,
        symbol: &str,
        config: &BacktestConfig,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), QuantbtError> {
        self.write_json(
            &BacktestReport {
                symbol,
                config,
                result,
            },
            output_path,
        )
    }

    fn write_indicators(
        &self,
        symbol: &str,
        indicators: &IndicatorSet,
        output_path: &str,
    ) -> Result<(), QuantbtError> {
        let report = IndicatorReport {
            symbol,
            indicators,
            degenerate: indicators.nan_indices(),
        };
        self.write_json(&report, output_path)
    }

    fn write_risk(
        &self,
        symbol: &str,
        metrics: &RiskMetrics,
        output_path: &str,
    ) -> Result<(), QuantbtError> {
        self.write_json(&RiskReport { symbol, metrics }, output_path)
    }

    fn write_sweep(
        &self,
        symbol: &str,
        outcomes: &[SweepOutcome],
        output_path: &str,
    ) -> Result<(), QuantbtError> {
        let runs = outcomes.iter().map(SweepRow::from).collect();
        self.write_json(&SweepReport { symbol, runs }, output_path)
    }
}
