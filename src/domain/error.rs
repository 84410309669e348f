//! Top-level error type for infrastructure failures.
//!
//! User-facing rejections live in their own closed enums
//! ([`crate::domain::trade::TradeError`], [`crate::domain::account::RegisterError`])
//! so callers can branch on kind rather than message content.

#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("quote provider error: {reason}")]
    QuoteProvider { reason: String },

    #[error("password hash error: {reason}")]
    PasswordHash { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocksimError> for std::process::ExitCode {
    fn from(err: &StocksimError) -> Self {
        let code: u8 = match err {
            StocksimError::Io(_) | StocksimError::PasswordHash { .. } => 1,
            StocksimError::ConfigParse { .. }
            | StocksimError::ConfigMissing { .. }
            | StocksimError::ConfigInvalid { .. } => 2,
            StocksimError::Database { .. } | StocksimError::DatabaseQuery { .. } => 3,
            StocksimError::QuoteProvider { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
