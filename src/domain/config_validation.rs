//! Parameter validation.
//!
//! Runs before any computation; a config that passes always produces a
//! completed run. `length` is checked against the bar count later, when the
//! indicator engine is built.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::QuantbtError;

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), QuantbtError> {
    validate_length(config.length)?;
    validate_initial_capital(config.initial_capital)?;
    validate_fraction("position_size", config.position_size)?;
    validate_fraction("stop_loss", config.stop_loss)?;
    validate_fraction("take_profit", config.take_profit)?;
    validate_rsi_threshold("rsi_oversold", config.rsi_oversold)?;
    validate_rsi_threshold("rsi_overbought", config.rsi_overbought)?;
    validate_confidence_level(config.confidence_level)?;
    validate_risk_free_rate(config.risk_free_rate)?;
    Ok(())
}

fn validate_length(value: usize) -> Result<(), QuantbtError> {
    if value == 0 {
        return Err(QuantbtError::invalid_parameter(
            "length",
            "must be at least 1",
        ));
    }
    Ok(())
}

fn validate_initial_capital(value: f64) -> Result<(), QuantbtError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(QuantbtError::invalid_parameter(
            "initial_capital",
            format!("must be a positive finite amount, got {value}"),
        ));
    }
    Ok(())
}

fn validate_fraction(name: &str, value: f64) -> Result<(), QuantbtError> {
    if value.is_nan() || value <= 0.0 || value > 1.0 {
        return Err(QuantbtError::invalid_parameter(
            name,
            format!("must be in (0, 1], got {value}"),
        ));
    }
    Ok(())
}

fn validate_rsi_threshold(name: &str, value: f64) -> Result<(), QuantbtError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(QuantbtError::invalid_parameter(
            name,
            format!("must be in [0, 100], got {value}"),
        ));
    }
    Ok(())
}

fn validate_confidence_level(value: f64) -> Result<(), QuantbtError> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(QuantbtError::invalid_parameter(
            "confidence_level",
            format!("must be in (0, 1), got {value}"),
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(value: f64) -> Result<(), QuantbtError> {
    if !value.is_finite() {
        return Err(QuantbtError::invalid_parameter(
            "risk_free_rate",
            "must be finite",
        ));
    }
    Ok(())
}
