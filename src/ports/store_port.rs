//! Relational store port trait: users, holdings, transaction log.

use crate::domain::account::User;
use crate::domain::error::StocksimError;
use crate::domain::position::{Position, TransactionRecord};
use crate::domain::trade::TradePlan;

pub trait StorePort: Send + Sync {
    /// Insert a new user with the given starting balance and return the row.
    /// Fails if the username is already taken (unique constraint).
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: f64,
    ) -> Result<User, StocksimError>;

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StocksimError>;

    fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StocksimError>;

    /// All holdings for a user, ordered by symbol.
    fn positions_for_user(&self, user_id: i64) -> Result<Vec<Position>, StocksimError>;

    fn position(&self, user_id: i64, symbol: &str) -> Result<Option<Position>, StocksimError>;

    /// The user's transaction log, oldest first.
    fn history_for_user(&self, user_id: i64) -> Result<Vec<TransactionRecord>, StocksimError>;

    /// Apply every mutation in the plan (transaction append, position change,
    /// cash update) as a single all-or-nothing unit. On any failure the store
    /// is left exactly as it was.
    fn apply_trade(&self, plan: &TradePlan) -> Result<(), StocksimError>;
}
