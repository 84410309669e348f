//! Holdings and the append-only transaction log.

use chrono::NaiveDateTime;

/// A user's current holding of one symbol. `(user_id, symbol)` is unique in the
/// store and `shares` is always strictly positive: a holding that reaches zero
/// is deleted rather than kept at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }
}

/// One immutable entry in the transaction log. `shares` is a signed delta:
/// positive for a buy, negative for a sell.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    pub transacted: NaiveDateTime,
}

impl TransactionRecord {
    pub fn is_buy(&self) -> bool {
        self.shares > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn market_value_multiplies_shares_by_price() {
        let pos = Position {
            user_id: 1,
            symbol: "NFLX".into(),
            shares: 10,
        };
        assert!((pos.market_value(500.0) - 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn transaction_sign_distinguishes_buy_and_sell() {
        let transacted = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let buy = TransactionRecord {
            id: 1,
            user_id: 1,
            symbol: "NFLX".into(),
            shares: 10,
            price: 500.0,
            transacted,
        };
        let sell = TransactionRecord {
            shares: -10,
            ..buy.clone()
        };
        assert!(buy.is_buy());
        assert!(!sell.is_buy());
    }
}
