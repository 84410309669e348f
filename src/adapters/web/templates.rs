//! HTML templates using Askama.
//!
//! Money is formatted once, in the handler, via [`usd`]; template structs
//! carry display-ready strings.

use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub logged_in: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub logged_in: bool,
}

pub struct HoldingRow {
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub price: String,
    pub value: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "portfolio.html")]
pub struct PortfolioTemplate {
    pub logged_in: bool,
    pub username: String,
    pub holdings: Vec<HoldingRow>,
    pub cash: String,
    pub grand_total: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "quote.html")]
pub struct QuoteFormTemplate {
    pub logged_in: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "quoted.html")]
pub struct QuotedTemplate {
    pub logged_in: bool,
    pub symbol: String,
    pub name: String,
    pub price: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "buy.html")]
pub struct BuyTemplate {
    pub logged_in: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "sell.html")]
pub struct SellTemplate {
    pub logged_in: bool,
    pub symbols: Vec<String>,
}

pub struct HistoryRow {
    pub symbol: String,
    pub shares: i64,
    pub price: String,
    pub transacted: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub logged_in: bool,
    pub rows: Vec<HistoryRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "apology.html")]
pub struct ApologyTemplate {
    pub logged_in: bool,
    pub status: u16,
    pub message: String,
}

/// Format a dollar amount with thousands separators, e.g. `$10,000.00`.
pub fn usd(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", value.abs());
    let (whole, frac) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    format!("{sign}${grouped}.{frac}")
}
