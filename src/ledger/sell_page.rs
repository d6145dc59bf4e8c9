//! The sell page.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    flash::set_flash,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, form_input, form_view},
    ledger::{
        LedgerState, OrderForm, check_can_sell, get_trades, ledger_page, parse_shares, sell,
        summarize_holdings,
    },
};

fn sell_view(owned_symbols: &[String]) -> Markup {
    let fields = html! {
        div
        {
            label for="symbol" class=(FORM_LABEL_STYLE) { "Symbol" }

            select name="symbol" id="symbol" autofocus class=(FORM_TEXT_INPUT_STYLE)
            {
                option disabled selected value="" { "Symbol" }

                @for symbol in owned_symbols {
                    option value=(symbol) { (symbol) }
                }
            }
        }

        (form_input("Shares", "shares", "number", false))
    };

    ledger_page(
        "Sell",
        endpoints::SELL,
        &form_view("Sell", endpoints::SELL, &fields, "Sell"),
    )
}

/// Display the sell form with the symbols the user currently holds.
pub async fn get_sell_page(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Markup, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let owned_symbols = summarize_holdings(&get_trades(user_id, &connection)?)
        .into_iter()
        .map(|holding| holding.symbol)
        .collect::<Vec<_>>();

    Ok(sell_view(&owned_symbols))
}

/// Sell shares at the current price.
///
/// The checks run in order and the first failure is reported: a symbol is
/// given, a number of shares is given, the shares are a positive integer,
/// the user holds the symbol, the user holds enough shares and the symbol
/// can be priced.
pub async fn post_sell(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<OrderForm>,
) -> Result<Response, Error> {
    let symbol = form.symbol.trim().to_ascii_uppercase();

    if symbol.is_empty() {
        return Err(Error::MissingField("must provide symbol"));
    }

    let shares = parse_shares(&form.shares)?;

    {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        check_can_sell(user_id, &symbol, shares, &connection)?;
    }

    let quote = state.quotes.lookup(&symbol).await.map_err(|error| {
        tracing::warn!("quote lookup for {symbol:?} failed: {error}");
        Error::InvalidSymbol
    })?;

    let trade = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        sell(user_id, &quote, shares, &connection)?
    };

    tracing::info!(
        "user {user_id} sold {} {} at {}",
        -trade.shares,
        trade.symbol,
        trade.price
    );

    Ok((set_flash(jar, "Sold!"), Redirect::to(endpoints::ROOT)).into_response())
}
