//! HTTP request handlers.
//!
//! GET renders the form, POST applies it. Every rejection surfaces as an
//! apology page; successful mutations redirect home.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;

use crate::domain::account::{validate_registration, RegisterError, User};
use crate::domain::portfolio::build_portfolio;
use crate::domain::quote::Quote;
use crate::domain::trade::{self, TradeError};

use super::auth::{hash_password, Backend, Credentials, SessionUser};
use super::templates;
use super::{AppState, WebError};

type Auth = axum_login::AuthSession<Backend>;

fn internal(err: impl std::fmt::Display) -> WebError {
    tracing::error!(error = %err, "request aborted");
    WebError::new(StatusCode::INTERNAL_SERVER_ERROR, "something went wrong")
}

/// The session only carries the user id; balances are re-read from the store
/// on every request so a trade always sees current cash.
fn current_user(auth: &Auth, state: &AppState) -> Result<User, WebError> {
    let session = auth
        .user
        .as_ref()
        .ok_or_else(|| WebError::forbidden("must log in"))?;
    state
        .store
        .find_user_by_id(session.id)?
        .ok_or_else(|| WebError::forbidden("unknown user"))
}

/// Any lookup failure is reported as "invalid symbol" (provider errors are
/// logged with detail first).
async fn resolve_quote(state: &AppState, symbol: &str) -> Result<Quote, WebError> {
    match state.quotes.lookup(symbol).await {
        Ok(Some(quote)) => Ok(quote),
        Ok(None) => Err(TradeError::InvalidSymbol.into()),
        Err(err) => {
            tracing::error!(symbol, error = %err, "quote lookup failed");
            Err(TradeError::InvalidSymbol.into())
        }
    }
}

pub async fn index(auth: Auth, State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let user = current_user(&auth, &state)?;
    let positions = state.store.positions_for_user(user.id)?;

    let mut priced = Vec::with_capacity(positions.len());
    for position in positions {
        let quote = resolve_quote(&state, &position.symbol).await?;
        priced.push((position, quote));
    }

    let portfolio = build_portfolio(user.cash, priced);
    let holdings = portfolio
        .holdings
        .iter()
        .map(|h| templates::HoldingRow {
            symbol: h.symbol.clone(),
            name: h.name.clone(),
            shares: h.shares,
            price: templates::usd(h.price),
            value: templates::usd(h.value),
        })
        .collect();

    let template = templates::PortfolioTemplate {
        logged_in: true,
        username: user.username,
        holdings,
        cash: templates::usd(portfolio.cash),
        grand_total: templates::usd(portfolio.grand_total),
    };
    Ok(template.into_response())
}

pub async fn login_form() -> Response {
    templates::LoginTemplate { logged_in: false }.into_response()
}

pub async fn login(mut auth: Auth, Form(creds): Form<Credentials>) -> Result<Response, WebError> {
    if creds.username.is_empty() {
        return Err(WebError::forbidden("must provide username"));
    }
    if creds.password.is_empty() {
        return Err(WebError::forbidden("must provide password"));
    }

    let user = match auth.authenticate(creds).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(WebError::forbidden("invalid username and/or password")),
        Err(err) => return Err(internal(err)),
    };

    auth.login(&user).await.map_err(internal)?;
    Ok(Redirect::to("/").into_response())
}

pub async fn logout(mut auth: Auth) -> Result<Response, WebError> {
    auth.logout().await.map_err(internal)?;
    Ok(Redirect::to("/login").into_response())
}

pub async fn register_form() -> Response {
    templates::RegisterTemplate { logged_in: false }.into_response()
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

pub async fn register(
    mut auth: Auth,
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    validate_registration(&form.username, &form.password, &form.confirmation)?;

    if state.store.find_user_by_username(&form.username)?.is_some() {
        return Err(RegisterError::UsernameTaken.into());
    }

    let hash = hash_password(&form.password)?;
    let starting_cash = state.config.get_double("trading", "starting_cash", 10_000.0);
    let user = state.store.create_user(&form.username, &hash, starting_cash)?;

    let session_user = SessionUser::from(&user);
    auth.login(&session_user).await.map_err(internal)?;
    Ok(Redirect::to("/").into_response())
}

pub async fn quote_form() -> Response {
    templates::QuoteFormTemplate { logged_in: true }.into_response()
}

#[derive(Debug, serde::Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub symbol: String,
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QuoteForm>,
) -> Result<Response, WebError> {
    if form.symbol.is_empty() {
        return Err(TradeError::MissingSymbol.into());
    }
    let symbol = form.symbol.trim().to_uppercase();
    let quote = resolve_quote(&state, &symbol).await?;

    let template = templates::QuotedTemplate {
        logged_in: true,
        symbol: quote.symbol,
        name: quote.name,
        price: templates::usd(quote.price),
    };
    Ok(template.into_response())
}

pub async fn buy_form() -> Response {
    templates::BuyTemplate { logged_in: true }.into_response()
}

#[derive(Debug, serde::Deserialize)]
pub struct TradeForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub shares: String,
}

pub async fn buy(
    auth: Auth,
    State(state): State<Arc<AppState>>,
    Form(form): Form<TradeForm>,
) -> Result<Response, WebError> {
    if form.symbol.is_empty() {
        return Err(TradeError::MissingSymbol.into());
    }
    let shares = trade::parse_shares(&form.shares)?;
    let symbol = form.symbol.trim().to_uppercase();
    let quote = resolve_quote(&state, &symbol).await?;

    let user = current_user(&auth, &state)?;
    let held = state.store.position(user.id, &symbol)?;
    let plan = trade::plan_buy(&user, &quote, shares, held.as_ref())?;
    state.store.apply_trade(&plan)?;

    tracing::info!(user = %user.username, %symbol, shares, "buy applied");
    Ok(Redirect::to("/").into_response())
}

pub async fn sell_form(
    auth: Auth,
    State(state): State<Arc<AppState>>,
) -> Result<Response, WebError> {
    let user = current_user(&auth, &state)?;
    let symbols = state
        .store
        .positions_for_user(user.id)?
        .into_iter()
        .map(|p| p.symbol)
        .collect();

    let template = templates::SellTemplate {
        logged_in: true,
        symbols,
    };
    Ok(template.into_response())
}

pub async fn sell(
    auth: Auth,
    State(state): State<Arc<AppState>>,
    Form(form): Form<TradeForm>,
) -> Result<Response, WebError> {
    if form.symbol.is_empty() {
        return Err(TradeError::MissingSymbol.into());
    }
    let shares = trade::parse_shares(&form.shares)?;
    let symbol = form.symbol.trim().to_uppercase();
    let quote = resolve_quote(&state, &symbol).await?;

    let user = current_user(&auth, &state)?;
    let held = state.store.position(user.id, &symbol)?;
    let plan = trade::plan_sell(&user, &quote, shares, held.as_ref())?;
    state.store.apply_trade(&plan)?;

    tracing::info!(user = %user.username, %symbol, shares, "sell applied");
    Ok(Redirect::to("/").into_response())
}

pub async fn history(
    auth: Auth,
    State(state): State<Arc<AppState>>,
) -> Result<Response, WebError> {
    let user = current_user(&auth, &state)?;
    let rows = state
        .store
        .history_for_user(user.id)?
        .into_iter()
        .map(|t| templates::HistoryRow {
            symbol: t.symbol,
            shares: t.shares,
            price: templates::usd(t.price),
            transacted: t.transacted.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    let template = templates::HistoryTemplate {
        logged_in: true,
        rows,
    };
    Ok(template.into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("not found")
}
