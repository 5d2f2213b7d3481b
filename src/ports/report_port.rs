//! Report generation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::QuantbtError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::metrics::RiskMetrics;
use crate::domain::sweep::SweepOutcome;

/// Port for writing run outputs.
pub trait ReportPort {
    fn write_backtest(
        &self,
        symbol: &str,
        config: &BacktestConfig,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), QuantbtError>;

    fn write_indicators(
        &self,
        symbol: &str,
        indicators: &IndicatorSet,
        output_path: &str,
    ) -> Result<(), QuantbtError>;

    fn write_risk(
        &self,
        symbol: &str,
        metrics: &RiskMetrics,
        output_path: &str,
    ) -> Result<(), QuantbtError>;

    fn write_sweep(
        &self,
        symbol: &str,
        outcomes: &[SweepOutcome],
        output_path: &str,
    ) -> Result<(), QuantbtError>;
}
