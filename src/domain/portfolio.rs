//! Per-run account state and equity tracking.
//!
//! A `Portfolio` owns capital, the single position slot, the closed-trade
//! history and the equity curve of one backtest run. It is created fresh by
//! every run and never shared.

use chrono::NaiveDate;
use serde::Serialize;

use super::position::Trade;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub capital: f64,
    pub initial_capital: f64,
    position: Option<Trade>,
    trade_history: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            capital: initial_capital,
            initial_capital,
            position: None,
            trade_history: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Fills the slot. Returns the trade back if a position is already open.
    pub fn open_position(&mut self, trade: Trade) -> Result<(), Trade> {
        if self.position.is_some() {
            return Err(trade);
        }
        self.position = Some(trade);
        Ok(())
    }

    pub fn position(&self) -> Option<&Trade> {
        self.position.as_ref()
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn take_position(&mut self) -> Option<Trade> {
        self.position.take()
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trade_history.push(trade);
    }

    pub fn trade_history(&self) -> &[Trade] {
        &self.trade_history
    }

    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint { date, equity });
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    /// capital + open shares × price
    pub fn total_equity(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map(|p| p.market_value(price))
            .unwrap_or(0.0);
        self.capital + position_value
    }

    pub fn realized_profit(&self) -> f64 {
        self.trade_history.iter().map(Trade::realized_profit).sum()
    }

    /// Consumes the run state: (trade history, equity curve, open position).
    pub fn into_parts(self) -> (Vec<Trade>, Vec<EquityPoint>, Option<Trade>) {
        (self.trade_history, self.equity_curve, self.position)
    }
}
