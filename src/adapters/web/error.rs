//! HTTP error responses: every rejection renders the apology page.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::account::RegisterError;
use crate::domain::error::StocksimError;
use crate::domain::trade::TradeError;

/// A user-facing apology with its HTTP status.
#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<StocksimError> for WebError {
    fn from(err: StocksimError) -> Self {
        let status = match &err {
            StocksimError::QuoteProvider { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Infra failures are logged with detail; the user sees a generic apology.
        tracing::error!(error = %err, "request aborted");
        Self::new(status, "something went wrong")
    }
}

impl From<TradeError> for WebError {
    fn from(err: TradeError) -> Self {
        let status = match &err {
            TradeError::MissingSymbol
            | TradeError::MissingShares
            | TradeError::NonPositiveShares
            | TradeError::InvalidSymbol => StatusCode::BAD_REQUEST,
            TradeError::InsufficientCash
            | TradeError::NoPosition(_)
            | TradeError::TooManyShares => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<RegisterError> for WebError {
    fn from(err: RegisterError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = super::templates::ApologyTemplate {
            logged_in: false,
            status: self.status.as_u16(),
            message: self.message.clone(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
