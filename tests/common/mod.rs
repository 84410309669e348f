#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use stocksim::adapters::sqlite_adapter::SqliteAdapter;
use stocksim::adapters::web::{build_router, AppState};
use stocksim::domain::error::StocksimError;
use stocksim::domain::quote::Quote;
use stocksim::ports::config_port::ConfigPort;
use stocksim::ports::quote_port::QuotePort;

pub struct MockQuotePort {
    pub quotes: HashMap<String, Quote>,
    pub errors: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            quotes: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_quote(mut self, symbol: &str, name: &str, price: f64) -> Self {
        self.quotes.insert(
            symbol.to_string(),
            Quote {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price,
            },
        );
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

#[async_trait]
impl QuotePort for MockQuotePort {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, StocksimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StocksimError::QuoteProvider {
                reason: reason.clone(),
            });
        }
        Ok(self.quotes.get(symbol).cloned())
    }
}

pub struct TestConfig {
    pub starting_cash: f64,
}

impl ConfigPort for TestConfig {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            // 64 zero bytes, hex-encoded: a valid signing key for tests.
            ("web", "session_secret") => Some("00".repeat(64)),
            _ => None,
        }
    }

    fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
        default
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match (section, key) {
            ("trading", "starting_cash") => self.starting_cash,
            _ => default,
        }
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

/// Build an app over a fresh in-memory store. The store handle is returned
/// alongside the router so tests can assert on persisted state directly.
pub async fn create_app_with_cash(
    quotes: MockQuotePort,
    starting_cash: f64,
) -> (Router, Arc<SqliteAdapter>) {
    let store = Arc::new(SqliteAdapter::in_memory().unwrap());
    store.initialize_schema().unwrap();

    let state = AppState {
        store: store.clone(),
        quotes: Arc::new(quotes),
        config: Arc::new(TestConfig { starting_cash }),
    };

    (build_router(state).await, store)
}

pub async fn create_app(quotes: MockQuotePort) -> (Router, Arc<SqliteAdapter>) {
    create_app_with_cash(quotes, 10_000.0).await
}

pub fn form_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn form_post_with_cookie(uri: &str, body: String, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn extract_cookies(response: &axum::http::Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

pub fn build_cookie_header(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .map(|sc| sc.split(';').next().unwrap_or("").to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn body_text(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Register a user and return the session cookie header for follow-up
/// requests.
pub async fn register_user(app: &Router, username: &str, password: &str) -> String {
    let body = format!(
        "username={username}&password={password}&confirmation={password}"
    );
    let response = app
        .clone()
        .oneshot(form_post("/register", body))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "registration should redirect home"
    );
    build_cookie_header(&extract_cookies(&response))
}
