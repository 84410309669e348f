//! Portfolio valuation for the home page.

use crate::domain::position::Position;
use crate::domain::quote::Quote;

/// One priced holding row: the position plus its freshly looked-up quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub price: f64,
    pub value: f64,
}

/// The rendered portfolio: holdings sorted by symbol, cash, and the grand
/// total (cash plus the market value of every holding).
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
    pub cash: f64,
    pub grand_total: f64,
}

pub fn build_portfolio(cash: f64, priced: Vec<(Position, Quote)>) -> Portfolio {
    let mut holdings: Vec<Holding> = priced
        .into_iter()
        .map(|(pos, quote)| Holding {
            value: pos.market_value(quote.price),
            symbol: pos.symbol,
            name: quote.name,
            shares: pos.shares,
            price: quote.price,
        })
        .collect();
    holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let grand_total = cash + holdings.iter().map(|h| h.value).sum::<f64>();

    Portfolio {
        holdings,
        cash,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn priced(symbol: &str, shares: i64, price: f64) -> (Position, Quote) {
        (
            Position {
                user_id: 1,
                symbol: symbol.into(),
                shares,
            },
            Quote {
                symbol: symbol.into(),
                name: format!("{symbol} Inc"),
                price,
            },
        )
    }

    #[test]
    fn empty_portfolio_is_just_cash() {
        let p = build_portfolio(10_000.0, vec![]);
        assert!(p.holdings.is_empty());
        assert_relative_eq!(p.grand_total, 10_000.0);
    }

    #[test]
    fn grand_total_sums_cash_and_holdings() {
        let p = build_portfolio(
            5_000.0,
            vec![priced("NFLX", 10, 500.0), priced("AAPL", 2, 180.0)],
        );
        assert_eq!(p.holdings.len(), 2);
        assert_relative_eq!(p.grand_total, 5_000.0 + 5_000.0 + 360.0);
    }

    #[test]
    fn holdings_sorted_by_symbol() {
        let p = build_portfolio(0.0, vec![priced("NFLX", 1, 1.0), priced("AAPL", 1, 1.0)]);
        let symbols: Vec<&str> = p.holdings.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "NFLX"]);
    }

    #[test]
    fn holding_value_is_shares_times_price() {
        let p = build_portfolio(0.0, vec![priced("NFLX", 10, 500.0)]);
        assert_relative_eq!(p.holdings[0].value, 5_000.0);
        assert_eq!(p.holdings[0].name, "NFLX Inc");
    }
}
