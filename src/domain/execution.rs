//! Trade execution and fill simulation.
//!
//! Fixed-fractional sizing, long entries, signal exits and stop-loss /
//! take-profit trigger checks against a single-slot `Portfolio`. All fills
//! happen at the given price; there is no slippage or commission.

use chrono::NaiveDate;
use log::{debug, warn};

use super::portfolio::Portfolio;
use super::position::{ExitReason, Trade};
use super::signal::Signal;

/// Strategy parameters needed for execution, all fractions of 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionParams {
    pub position_size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        ExecutionParams {
            position_size: 0.02,
            stop_loss: 0.02,
            take_profit: 0.04,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizing {
    pub shares: f64,
    pub capital_required: f64,
}

/// Risk-based sizing:
/// shares = (capital × position_size) / (entry × stop_loss).
///
/// Unlike the bare formula, which keeps the risk-based share count and only
/// caps the cash deducted, shares here are reduced to `capital / entry` when
/// the notional would exceed capital. The position held is then the one paid
/// for, and a clamped position requires exactly `capital`, never a rounding
/// error more.
pub fn size_position(capital: f64, entry_price: f64, params: &ExecutionParams) -> PositionSizing {
    let risk_amount = capital * params.position_size;
    let stop_loss_amount = entry_price * params.stop_loss;

    let shares = if stop_loss_amount > 0.0 {
        risk_amount / stop_loss_amount
    } else {
        0.0
    };

    let notional = shares * entry_price;
    if notional > capital {
        return PositionSizing {
            shares: capital / entry_price,
            capital_required: capital,
        };
    }

    PositionSizing {
        shares,
        capital_required: notional,
    }
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        shares: f64,
        entry_price: f64,
        capital_required: f64,
    },
    InsufficientCapital,
    PositionOpen,
}

/// Enter a long position at `price`.
///
/// 1. Size the position from current capital
/// 2. Reject if no shares can be bought or capital does not cover them
/// 3. Deduct the capital and fill the slot with a bracketed trade
pub fn enter_long(
    portfolio: &mut Portfolio,
    price: f64,
    date: NaiveDate,
    params: &ExecutionParams,
) -> EntryResult {
    if portfolio.has_position() {
        return EntryResult::PositionOpen;
    }

    let sizing = size_position(portfolio.capital, price, params);
    let no_shares = sizing.shares.is_nan() || sizing.shares <= 0.0;
    if no_shares || sizing.capital_required > portfolio.capital {
        warn!(
            "{date}: skipping entry at {price:.4}, capital {:.2} cannot cover {:.2}",
            portfolio.capital, sizing.capital_required
        );
        return EntryResult::InsufficientCapital;
    }

    let trade = Trade::open(
        date,
        price,
        sizing.shares,
        params.stop_loss,
        params.take_profit,
    );
    if portfolio.open_position(trade).is_err() {
        return EntryResult::PositionOpen;
    }
    portfolio.capital -= sizing.capital_required;

    debug!(
        "{date}: entered {:.4} shares at {price:.4} (capital left {:.2})",
        sizing.shares, portfolio.capital
    );

    EntryResult::Entered {
        shares: sizing.shares,
        entry_price: price,
        capital_required: sizing.capital_required,
    }
}

/// Result of an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitResult {
    pub shares: f64,
    pub exit_price: f64,
    pub exit_value: f64,
    pub profit: f64,
    pub reason: ExitReason,
}

/// Close the open position at `price`, crediting proceeds and recording the
/// trade. Returns `None` when the slot is empty.
pub fn exit_position(
    portfolio: &mut Portfolio,
    price: f64,
    date: NaiveDate,
    reason: ExitReason,
) -> Option<ExitResult> {
    let position = portfolio.take_position()?;
    let closed = position.close(date, price, reason);

    let exit_value = closed.shares * price;
    let profit = closed.realized_profit();
    portfolio.capital += exit_value;

    debug!(
        "{date}: exited {:.4} shares at {price:.4} ({reason:?}), profit {profit:.2}",
        closed.shares
    );

    let result = ExitResult {
        shares: closed.shares,
        exit_price: price,
        exit_value,
        profit,
        reason,
    };
    portfolio.record_trade(closed);
    Some(result)
}

/// Check stop-loss then take-profit against `price`. A triggered bracket
/// closes the position at the bracket's own price, not at `price`.
pub fn check_triggers(
    portfolio: &mut Portfolio,
    price: f64,
    date: NaiveDate,
) -> Option<ExitResult> {
    let position = portfolio.position()?;

    let (fill, reason) = if position.should_stop_loss(price) {
        (position.stop_loss, ExitReason::StopLoss)
    } else if position.should_take_profit(price) {
        (position.take_profit, ExitReason::TakeProfit)
    } else {
        return None;
    };

    if fill <= 0.0 {
        return None;
    }
    exit_position(portfolio, fill, date, reason)
}

/// Apply one bar's signal. Hold, a non-positive price, Buy while Long and
/// Sell while Flat leave the portfolio untouched.
pub fn execute_signal(
    portfolio: &mut Portfolio,
    signal: Signal,
    price: f64,
    date: NaiveDate,
    params: &ExecutionParams,
) {
    if price.is_nan() || price <= 0.0 {
        return;
    }

    match signal {
        Signal::Buy if !portfolio.has_position() => {
            enter_long(portfolio, price, date, params);
        }
        Signal::Sell if portfolio.has_position() => {
            exit_position(portfolio, price, date, ExitReason::Signal);
        }
        _ => {}
    }
}
