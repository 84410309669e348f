//! HTTP quote adapter.
//!
//! Fetches a fresh quote from the configured provider on every lookup. No
//! caching, no retries: a stale or failed lookup must never be served.

use crate::domain::error::StocksimError;
use crate::domain::quote::Quote;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use async_trait::async_trait;
use reqwest::StatusCode;

pub struct HttpQuoteAdapter {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct QuoteResponse {
    symbol: String,
    #[serde(rename = "companyName")]
    company_name: String,
    #[serde(rename = "latestPrice")]
    latest_price: f64,
}

impl HttpQuoteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StocksimError> {
        let base_url =
            config
                .get_string("quotes", "base_url")
                .ok_or_else(|| StocksimError::ConfigMissing {
                    section: "quotes".into(),
                    key: "base_url".into(),
                })?;

        Ok(Self::new(base_url, config.get_string("quotes", "api_token")))
    }

    pub fn new(base_url: String, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }
}

#[async_trait]
impl QuotePort for HttpQuoteAdapter {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, StocksimError> {
        let url = format!("{}/quote/{}", self.base_url, symbol);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.query(&[("token", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StocksimError::QuoteProvider {
                reason: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response =
            response
                .error_for_status()
                .map_err(|e| StocksimError::QuoteProvider {
                    reason: e.to_string(),
                })?;

        let body: QuoteResponse =
            response
                .json()
                .await
                .map_err(|e| StocksimError::QuoteProvider {
                    reason: e.to_string(),
                })?;

        Ok(Some(Quote {
            symbol: body.symbol,
            name: body.company_name,
            price: body.latest_price,
        }))
    }
}
