//! SQLite store adapter.
//!
//! Implements [`StorePort`] over an r2d2 connection pool. `apply_trade` wraps
//! the three trade writes in one rusqlite transaction so a failure in any of
//! them rolls back all of them.

use crate::domain::account::User;
use crate::domain::error::StocksimError;
use crate::domain::position::{Position, TransactionRecord};
use crate::domain::trade::{PositionChange, TradePlan};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::{NaiveDateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> StocksimError {
    StocksimError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> StocksimError {
    StocksimError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StocksimError> {
        let db_path =
            config
                .get_string("database", "path")
                .ok_or_else(|| StocksimError::ConfigMissing {
                    section: "database".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("database", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, StocksimError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                cash REAL NOT NULL CHECK (cash >= 0)
            );
            CREATE TABLE IF NOT EXISTS positions (
                user_id INTEGER NOT NULL REFERENCES users(id),
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL CHECK (shares > 0),
                PRIMARY KEY (user_id, symbol)
            );
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL,
                price REAL NOT NULL,
                transacted TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);",
        )
        .map_err(query_err)?;

        Ok(())
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        cash: row.get(3)?,
    })
}

fn parse_timestamp(raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            raw.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

impl StorePort for SqliteAdapter {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: f64,
    ) -> Result<User, StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.execute(
            "INSERT INTO users (username, password_hash, cash) VALUES (?1, ?2, ?3)",
            params![username, password_hash, starting_cash],
        )
        .map_err(query_err)?;

        let id = conn.last_insert_rowid();
        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            cash: starting_cash,
        })
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let result = conn.query_row(
            "SELECT id, username, password_hash, cash FROM users WHERE username = ?1",
            params![username],
            row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(query_err(e)),
        }
    }

    fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let result = conn.query_row(
            "SELECT id, username, password_hash, cash FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(query_err(e)),
        }
    }

    fn positions_for_user(&self, user_id: i64) -> Result<Vec<Position>, StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT user_id, symbol, shares FROM positions
                 WHERE user_id = ?1 ORDER BY symbol ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(Position {
                    user_id: row.get(0)?,
                    symbol: row.get(1)?,
                    shares: row.get(2)?,
                })
            })
            .map_err(query_err)?;

        let mut positions = Vec::new();
        for row in rows {
            positions.push(row.map_err(query_err)?);
        }

        Ok(positions)
    }

    fn position(&self, user_id: i64, symbol: &str) -> Result<Option<Position>, StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let result = conn.query_row(
            "SELECT user_id, symbol, shares FROM positions WHERE user_id = ?1 AND symbol = ?2",
            params![user_id, symbol],
            |row| {
                Ok(Position {
                    user_id: row.get(0)?,
                    symbol: row.get(1)?,
                    shares: row.get(2)?,
                })
            },
        );

        match result {
            Ok(position) => Ok(Some(position)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(query_err(e)),
        }
    }

    fn history_for_user(&self, user_id: i64) -> Result<Vec<TransactionRecord>, StocksimError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, symbol, shares, price, transacted FROM transactions
                 WHERE user_id = ?1 ORDER BY id ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                let raw: String = row.get(5)?;
                Ok(TransactionRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    symbol: row.get(2)?,
                    shares: row.get(3)?,
                    price: row.get(4)?,
                    transacted: parse_timestamp(&raw)?,
                })
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_err)?);
        }

        Ok(records)
    }

    fn apply_trade(&self, plan: &TradePlan) -> Result<(), StocksimError> {
        let mut conn = self.pool.get().map_err(pool_err)?;

        let tx = conn.transaction().map_err(query_err)?;

        let transacted = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
        tx.execute(
            "INSERT INTO transactions (user_id, symbol, shares, price, transacted)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![plan.user_id, plan.symbol, plan.delta, plan.price, transacted],
        )
        .map_err(query_err)?;

        match plan.position {
            PositionChange::Create { shares } => {
                tx.execute(
                    "INSERT INTO positions (user_id, symbol, shares) VALUES (?1, ?2, ?3)",
                    params![plan.user_id, plan.symbol, shares],
                )
                .map_err(query_err)?;
            }
            PositionChange::Set { shares } => {
                tx.execute(
                    "UPDATE positions SET shares = ?1 WHERE user_id = ?2 AND symbol = ?3",
                    params![shares, plan.user_id, plan.symbol],
                )
                .map_err(query_err)?;
            }
            PositionChange::Delete => {
                tx.execute(
                    "DELETE FROM positions WHERE user_id = ?1 AND symbol = ?2",
                    params![plan.user_id, plan.symbol],
                )
                .map_err(query_err)?;
            }
        }

        tx.execute(
            "UPDATE users SET cash = ?1 WHERE id = ?2",
            params![plan.cash_after, plan.user_id],
        )
        .map_err(query_err)?;

        tx.commit().map_err(query_err)?;

        Ok(())
    }
}
