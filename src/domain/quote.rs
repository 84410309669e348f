//! Point-in-time price quote for a ticker symbol.

/// A resolved quote: display name and current price, sourced externally.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}
