//! Share price lookup.
//!
//! Handlers depend on the [QuoteProvider] trait so the live Alpha Vantage
//! client can be swapped for a fixed price table in offline runs and tests.

mod alpha_vantage;
mod fixed;
mod page;

use async_trait::async_trait;

pub use alpha_vantage::AlphaVantageQuotes;
pub use fixed::FixedQuotes;
pub use page::{QuoteState, get_quote_page, post_quote};

/// The price of one share of a stock.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// The canonical, upper-case ticker symbol.
    pub symbol: String,
    /// The price of one share in dollars.
    pub price: f64,
}

/// The ways a quote lookup can fail.
///
/// Callers treat every variant as "symbol unavailable".
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The symbol was empty after trimming.
    #[error("no symbol given")]
    EmptySymbol,

    /// The provider has no price for the symbol.
    #[error("no quote for {0}")]
    UnknownSymbol(String),

    /// The HTTP request to the provider failed or timed out.
    #[error("quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with something that is not a usable price.
    #[error("malformed quote for {symbol}: {message}")]
    Malformed {
        /// The symbol that was looked up.
        symbol: String,
        /// What was wrong with the response.
        message: String,
    },

    /// A price table file could not be read or parsed.
    #[error("could not load quotes file: {0}")]
    QuotesFile(String),
}

/// A source of share prices.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider for logs.
    fn name(&self) -> &str;

    /// Get the current price of `symbol`.
    ///
    /// The symbol is trimmed and upper-cased before the lookup and the
    /// returned [Quote] carries that canonical form, never a spelling the
    /// provider substitutes. The price is always finite and positive.
    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteError>;
}

/// Trim and upper-case a ticker symbol as entered by a user.
pub(crate) fn normalize_symbol(raw_symbol: &str) -> Result<String, QuoteError> {
    let symbol = raw_symbol.trim().to_ascii_uppercase();

    if symbol.is_empty() {
        return Err(QuoteError::EmptySymbol);
    }

    Ok(symbol)
}

/// Reject prices that are not finite and positive.
pub(crate) fn check_price(symbol: &str, price: f64) -> Result<f64, QuoteError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(QuoteError::Malformed {
            symbol: symbol.to_owned(),
            message: format!("non-positive price {price}"),
        });
    }

    Ok(price)
}

#[cfg(test)]
mod normalize_symbol_tests {
    use super::{QuoteError, check_price, normalize_symbol};

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(normalize_symbol("  nflx ").unwrap(), "NFLX");
    }

    #[test]
    fn rejects_blank_symbol() {
        assert!(matches!(normalize_symbol("   "), Err(QuoteError::EmptySymbol)));
    }

    #[test]
    fn check_price_accepts_positive_prices() {
        assert_eq!(check_price("NFLX", 0.01).unwrap(), 0.01);
    }

    #[test]
    fn check_price_rejects_unusable_prices() {
        for price in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(check_price("NFLX", price), Err(QuoteError::Malformed { .. })),
                "{price}"
            );
        }
    }
}
