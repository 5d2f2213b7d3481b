//! Trade records: the open position and closed history entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Signal,
    StopLoss,
    TakeProfit,
}

/// A long trade. Exit fields are `None` while the trade is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub status: TradeStatus,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub profit: Option<f64>,
    pub exit_reason: Option<ExitReason>,
}

impl Trade {
    /// Opens a trade with stop = entry × (1 − stop_loss_fraction) and
    /// take = entry × (1 + take_profit_fraction).
    pub fn open(
        entry_date: NaiveDate,
        entry_price: f64,
        shares: f64,
        stop_loss_fraction: f64,
        take_profit_fraction: f64,
    ) -> Self {
        Trade {
            entry_date,
            entry_price,
            shares,
            stop_loss: entry_price * (1.0 - stop_loss_fraction),
            take_profit: entry_price * (1.0 + take_profit_fraction),
            status: TradeStatus::Open,
            exit_date: None,
            exit_price: None,
            profit: None,
            exit_reason: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares * (price - self.entry_price)
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        price >= self.take_profit
    }

    /// Closes the trade, fixing profit = (exit − entry) × shares.
    pub fn close(mut self, exit_date: NaiveDate, exit_price: f64, reason: ExitReason) -> Self {
        self.status = TradeStatus::Closed;
        self.exit_date = Some(exit_date);
        self.exit_price = Some(exit_price);
        self.profit = Some((exit_price - self.entry_price) * self.shares);
        self.exit_reason = Some(reason);
        self
    }

    /// Realized profit; zero while open.
    pub fn realized_profit(&self) -> f64 {
        self.profit.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample_trade() -> Trade {
        Trade::open(date(15), 50.0, 100.0, 0.1, 0.2)
    }

    #[test]
    fn open_sets_brackets() {
        let trade = sample_trade();
        assert!(trade.is_open());
        assert!((trade.stop_loss - 45.0).abs() < 1e-12);
        assert!((trade.take_profit - 60.0).abs() < 1e-12);
        assert_eq!(trade.exit_date, None);
        assert_eq!(trade.profit, None);
    }

    #[test]
    fn market_value_and_unrealized_pnl() {
        let trade = sample_trade();
        assert!((trade.market_value(55.0) - 5500.0).abs() < f64::EPSILON);
        assert!((trade.unrealized_pnl(55.0) - 500.0).abs() < f64::EPSILON);
        assert!((trade.unrealized_pnl(45.0) + 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stop_loss_triggered_at_or_below() {
        let trade = sample_trade();
        assert!(trade.should_stop_loss(44.0));
        assert!(trade.should_stop_loss(trade.stop_loss));
        assert!(!trade.should_stop_loss(46.0));
    }

    #[test]
    fn take_profit_triggered_at_or_above() {
        let trade = sample_trade();
        assert!(trade.should_take_profit(61.0));
        assert!(trade.should_take_profit(trade.take_profit));
        assert!(!trade.should_take_profit(59.0));
    }

    #[test]
    fn close_records_exit() {
        let closed = sample_trade().close(date(20), 55.0, ExitReason::Signal);
        assert_eq!(closed.status, TradeStatus::Closed);
        assert_eq!(closed.exit_date, Some(date(20)));
        assert_eq!(closed.exit_price, Some(55.0));
        assert_eq!(closed.exit_reason, Some(ExitReason::Signal));
        assert!((closed.realized_profit() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn close_at_loss() {
        let closed = sample_trade().close(date(20), 45.0, ExitReason::StopLoss);
        assert!((closed.realized_profit() + 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_trade_has_no_realized_profit() {
        assert_eq!(sample_trade().realized_profit(), 0.0);
    }
}
