//! Trade planning: the buy/sell consistency logic.
//!
//! [`plan_buy`] and [`plan_sell`] are pure functions. They validate a request
//! against the user's current cash and holdings and either reject it or return
//! a [`TradePlan`] describing every mutation the store must apply as one
//! atomic unit. No validation failure ever produces a partial plan.

use crate::domain::account::User;
use crate::domain::position::Position;
use crate::domain::quote::Quote;

/// Trade request rejections. The `Display` impl is the user-facing apology
/// message; callers branch on the variant, never on the text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("missing symbol")]
    MissingSymbol,

    #[error("missing shares")]
    MissingShares,

    #[error("non positive number of shares")]
    NonPositiveShares,

    #[error("invalid symbol")]
    InvalidSymbol,

    #[error("insufficient cash")]
    InsufficientCash,

    #[error("you don't have any shares of {0}")]
    NoPosition(String),

    #[error("too many shares")]
    TooManyShares,
}

/// How the user's holding of the traded symbol changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionChange {
    /// First buy of this symbol: insert a new row.
    Create { shares: i64 },
    /// Partial buy into or sell out of an existing holding: set the new count.
    Set { shares: i64 },
    /// Sold every held share: remove the row.
    Delete,
}

/// The full mutation set for one accepted trade: append a transaction record
/// with `delta` shares at `price`, apply `position`, and set the user's cash
/// to `cash_after`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradePlan {
    pub user_id: i64,
    pub symbol: String,
    /// Signed share delta: positive for a buy, negative for a sell.
    pub delta: i64,
    pub price: f64,
    pub cash_after: f64,
    pub position: PositionChange,
}

/// Parse a submitted share count. Anything that is not a positive integer is
/// rejected as "non positive number of shares".
pub fn parse_shares(raw: &str) -> Result<i64, TradeError> {
    if raw.trim().is_empty() {
        return Err(TradeError::MissingShares);
    }
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(TradeError::NonPositiveShares),
    }
}

/// Plan a buy of `shares` of the quoted symbol.
pub fn plan_buy(
    user: &User,
    quote: &Quote,
    shares: i64,
    held: Option<&Position>,
) -> Result<TradePlan, TradeError> {
    if shares < 1 {
        return Err(TradeError::NonPositiveShares);
    }

    let cost = shares as f64 * quote.price;
    if cost > user.cash {
        return Err(TradeError::InsufficientCash);
    }

    let position = match held {
        Some(p) => PositionChange::Set {
            shares: p.shares + shares,
        },
        None => PositionChange::Create { shares },
    };

    Ok(TradePlan {
        user_id: user.id,
        symbol: quote.symbol.clone(),
        delta: shares,
        price: quote.price,
        cash_after: user.cash - cost,
        position,
    })
}

/// Plan a sell of `shares` of the quoted symbol.
pub fn plan_sell(
    user: &User,
    quote: &Quote,
    shares: i64,
    held: Option<&Position>,
) -> Result<TradePlan, TradeError> {
    if shares < 1 {
        return Err(TradeError::NonPositiveShares);
    }

    let held = held.ok_or_else(|| TradeError::NoPosition(quote.symbol.clone()))?;
    if shares > held.shares {
        return Err(TradeError::TooManyShares);
    }

    let position = if shares == held.shares {
        PositionChange::Delete
    } else {
        PositionChange::Set {
            shares: held.shares - shares,
        }
    };

    Ok(TradePlan {
        user_id: user.id,
        symbol: quote.symbol.clone(),
        delta: -shares,
        price: quote.price,
        cash_after: user.cash + shares as f64 * quote.price,
        position,
    })
}
