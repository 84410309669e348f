//! Quote lookup port trait.

use crate::domain::error::StocksimError;
use crate::domain::quote::Quote;
use async_trait::async_trait;

/// External price lookup. Every call fetches fresh data; implementations must
/// not cache or retry. `Ok(None)` means the symbol is unknown to the provider.
#[async_trait]
pub trait QuotePort: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, StocksimError>;
}
