//! Web server adapter: axum router, sessions, and the apology error surface.

pub mod auth;
mod error;
mod handlers;
mod templates;

pub use error::WebError;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use axum_login::{login_required, AuthManagerLayerBuilder};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_sessions::{cookie::Key, Expiry, MemoryStore, SessionManagerLayer};

use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::store_port::StorePort;

use auth::Backend;

pub struct AppState {
    pub store: Arc<dyn StorePort>,
    pub quotes: Arc<dyn QuotePort>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

/// Signing key for session cookies: `[web] session_secret` as hex (at least
/// 64 bytes once decoded), or a fresh random key when unset.
fn session_key(config: &dyn ConfigPort) -> Key {
    config
        .get_string("web", "session_secret")
        .and_then(|secret| hex::decode(secret).ok())
        .and_then(|bytes| Key::try_from(bytes.as_slice()).ok())
        .unwrap_or_else(Key::generate)
}

/// Responses carry balances and holdings, so caching is disabled everywhere.
async fn no_store_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

pub async fn build_router(state: AppState) -> Router {
    let key = session_key(state.config.as_ref());
    let lifetime = state.config.get_int("web", "session_lifetime", 86_400);

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.get_bool("web", "secure_cookies", false))
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(lifetime)))
        .with_signed(key);

    let backend = Backend::new(state.store.clone());
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    Router::new()
        .route("/", get(handlers::index))
        .route("/quote", get(handlers::quote_form).post(handlers::quote))
        .route("/buy", get(handlers::buy_form).post(handlers::buy))
        .route("/sell", get(handlers::sell_form).post(handlers::sell))
        .route("/history", get(handlers::history))
        .route_layer(login_required!(Backend, login_url = "/login"))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(no_store_headers))
        .layer(auth_layer)
        .with_state(Arc::new(state))
}
