//! The quote page: look up the current price of one share.

use std::sync::Arc;

use axum::{Form, extract::FromRef, extract::State};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error, FinanceState, endpoints,
    html::{PAGE_CONTAINER_STYLE, base, form_input, form_view, format_currency},
    navigation::NavBar,
    quote::{Quote, QuoteProvider},
};

/// The state needed to look up quotes.
#[derive(Clone)]
pub struct QuoteState {
    pub quotes: Arc<dyn QuoteProvider>,
}

impl FromRef<FinanceState> for QuoteState {
    fn from_ref(state: &FinanceState) -> Self {
        Self {
            quotes: state.quotes.clone(),
        }
    }
}

/// The form data for a quote request.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteForm {
    pub symbol: String,
}

fn quote_page(content: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::QUOTE).into_html();

    base(
        "Quote",
        &html! {
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE) { (content) }
        },
    )
}

fn quote_form() -> Markup {
    let fields = form_input("Symbol", "symbol", "text", true);

    form_view("Quote", endpoints::QUOTE, &fields, "Quote")
}

fn quoted_view(quote: &Quote) -> Markup {
    html! {
        p class="quote" id="quote"
        {
            "A share of " (quote.symbol) " costs " (format_currency(quote.price)) "."
        }
    }
}

/// Display the quote form.
pub async fn get_quote_page() -> Markup {
    quote_page(&quote_form())
}

/// Look up the symbol from the form and display its price.
pub async fn post_quote(
    State(state): State<QuoteState>,
    Form(form): Form<QuoteForm>,
) -> Result<Markup, Error> {
    if form.symbol.trim().is_empty() {
        return Err(Error::MissingField("must provide symbol"));
    }

    let quote = state.quotes.lookup(&form.symbol).await.map_err(|error| {
        tracing::warn!("quote lookup for {:?} failed: {error}", form.symbol);
        Error::InvalidSymbol
    })?;

    Ok(quote_page(&quoted_view(&quote)))
}
