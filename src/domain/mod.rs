//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod metrics;
pub mod config_validation;
pub mod backtest;
pub mod sweep;
pub mod error;
