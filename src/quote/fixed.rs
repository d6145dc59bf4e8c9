use std::{collections::HashMap, fs, path::Path};

use async_trait::async_trait;

use super::{Quote, QuoteError, QuoteProvider, check_price, normalize_symbol};

/// Share prices from an in-memory table.
///
/// Unknown symbols fail the lookup, just like a symbol the live API does not list.
#[derive(Debug, Clone, Default)]
pub struct FixedQuotes {
    prices: HashMap<String, f64>,
}

impl FixedQuotes {
    /// Create a price table. Symbols are normalized, so `("nflx", 500.0)`
    /// answers lookups for "NFLX".
    ///
    /// # Errors
    /// - [QuoteError::EmptySymbol] if a symbol is blank.
    /// - [QuoteError::Malformed] if a price is not finite and positive.
    pub fn new<S: AsRef<str>>(
        prices: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, QuoteError> {
        let prices = prices
            .into_iter()
            .map(|(symbol, price)| {
                let symbol = normalize_symbol(symbol.as_ref())?;
                let price = check_price(&symbol, price)?;

                Ok((symbol, price))
            })
            .collect::<Result<_, QuoteError>>()?;

        Ok(Self { prices })
    }

    /// Load a price table from a JSON object mapping symbols to prices,
    /// e.g. `{"NFLX": 500.0, "AAPL": 190.25}`.
    ///
    /// # Errors
    /// Returns [QuoteError::QuotesFile] if the file cannot be read, is not
    /// such an object or lists a blank symbol or a price that is not finite
    /// and positive.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QuoteError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|error| QuoteError::QuotesFile(format!("{}: {error}", path.display())))?;

        Self::from_json(&text)
            .map_err(|error| QuoteError::QuotesFile(format!("{}: {error}", path.display())))
    }

    fn from_json(text: &str) -> Result<Self, QuoteError> {
        let prices: HashMap<String, f64> = serde_json::from_str(text)
            .map_err(|error| QuoteError::QuotesFile(error.to_string()))?;

        Self::new(prices)
    }
}

#[async_trait]
impl QuoteProvider for FixedQuotes {
    fn name(&self) -> &str {
        "fixed price table"
    }

    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = normalize_symbol(symbol)?;

        match self.prices.get(&symbol) {
            Some(&price) => Ok(Quote { symbol, price }),
            None => Err(QuoteError::UnknownSymbol(symbol)),
        }
    }
}
