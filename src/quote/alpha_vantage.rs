use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Quote, QuoteError, QuoteProvider, check_price, normalize_symbol};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// How long to wait for Alpha Vantage before treating the symbol as unavailable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Live share prices from the Alpha Vantage `GLOBAL_QUOTE` endpoint.
///
/// The free tier is limited to a handful of requests per day, after which
/// the API answers with an empty quote. That case surfaces as
/// [QuoteError::UnknownSymbol].
pub struct AlphaVantageQuotes {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageQuotes {
    /// Create a client for the public Alpha Vantage API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client could not be built.
    pub fn new(api_key: String) -> Result<Self, QuoteError> {
        Self::with_base_url(api_key, BASE_URL)
    }

    fn with_base_url(api_key: String, base_url: &str) -> Result<Self, QuoteError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.to_owned(),
        })
    }
}

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
}

#[async_trait]
impl QuoteProvider for AlphaVantageQuotes {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = normalize_symbol(symbol)?;

        let response: GlobalQuoteResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_global_quote(symbol, response)
    }
}

fn parse_global_quote(symbol: String, response: GlobalQuoteResponse) -> Result<Quote, QuoteError> {
    let Some(GlobalQuote {
        symbol: quoted_symbol,
        price: Some(raw_price),
    }) = response.global_quote
    else {
        return Err(QuoteError::UnknownSymbol(symbol));
    };

    let price: f64 = raw_price.parse().map_err(|error| QuoteError::Malformed {
        symbol: symbol.clone(),
        message: format!("invalid price {raw_price:?}: {error}"),
    })?;

    let price = check_price(&symbol, price)?;

    if let Some(quoted_symbol) = quoted_symbol
        && !quoted_symbol.eq_ignore_ascii_case(&symbol)
    {
        tracing::debug!("Alpha Vantage answered {symbol} with a quote for {quoted_symbol}");
    }

    Ok(Quote { symbol, price })
}
