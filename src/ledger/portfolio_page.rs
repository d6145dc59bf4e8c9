//! The portfolio page: cash, holdings at current prices and the grand total.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    auth::{UserID, get_cash},
    endpoints,
    flash::{flash_banner, take_flash},
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, format_currency,
    },
    ledger::{LedgerState, get_trades, ledger_page, summarize_holdings},
};

/// A holding valued at the current share price.
struct PortfolioRow {
    symbol: String,
    shares: i64,
    price: f64,
    total_value: f64,
}

fn portfolio_view(
    rows: &[PortfolioRow],
    cash: f64,
    grand_total: f64,
    flash_message: Option<&str>,
) -> Markup {
    let content = html! {
        (flash_banner(flash_message))

        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Symbol" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Shares" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "TOTAL" }
                }
            }

            tbody
            {
                @for row in rows {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (row.symbol) }
                        td class=(TABLE_CELL_STYLE) { (row.shares) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(row.price)) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(row.total_value)) }
                    }
                }
            }

            tfoot
            {
                tr class=(TABLE_ROW_STYLE)
                {
                    td colspan="3" class=(TABLE_CELL_STYLE) { "Cash" }
                    td class=(TABLE_CELL_STYLE) id="cash" { (format_currency(cash)) }
                }
                tr class=(TABLE_ROW_STYLE)
                {
                    td colspan="3" class=(TABLE_CELL_STYLE) { "TOTAL" }
                    td class=(TABLE_CELL_STYLE) id="grand-total" { (format_currency(grand_total)) }
                }
            }
        }
    };

    ledger_page("Portfolio", endpoints::ROOT, &content)
}

/// Display the user's cash and holdings valued at current prices.
///
/// A holding whose price cannot be looked up is still listed, with a price
/// and value of zero.
pub async fn get_portfolio_page(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let (cash, holdings) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let cash = get_cash(user_id, &connection)?;
        let trades = get_trades(user_id, &connection)?;

        (cash, summarize_holdings(&trades))
    };

    let mut grand_total = cash;
    let mut rows = Vec::with_capacity(holdings.len());

    for holding in holdings {
        let price = match state.quotes.lookup(&holding.symbol).await {
            Ok(quote) => quote.price,
            Err(error) => {
                tracing::warn!("could not price {}: {error}", holding.symbol);
                0.0
            }
        };
        let total_value = price * holding.shares as f64;
        grand_total += total_value;

        rows.push(PortfolioRow {
            symbol: holding.symbol,
            shares: holding.shares,
            price,
            total_value,
        });
    }

    let (jar, flash_message) = take_flash(jar);

    Ok((
        jar,
        portfolio_view(&rows, cash, grand_total, flash_message.as_deref()),
    )
        .into_response())
}
