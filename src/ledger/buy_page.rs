//! The buy page.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::Markup;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    flash::set_flash,
    html::{form_input, form_view},
    ledger::{LedgerState, OrderForm, buy, ledger_page, parse_shares},
};

fn buy_view() -> Markup {
    let fields = maud::html! {
        (form_input("Symbol", "symbol", "text", true))
        (form_input("Shares", "shares", "number", false))
    };

    ledger_page(
        "Buy",
        endpoints::BUY,
        &form_view("Buy", endpoints::BUY, &fields, "Buy"),
    )
}

/// Display the buy form.
pub async fn get_buy_page() -> Markup {
    buy_view()
}

/// Buy shares at the current price.
///
/// The checks run in order and the first failure is reported: a symbol is
/// given, a number of shares is given, the shares are a positive integer,
/// the symbol can be priced and the user can afford the purchase.
pub async fn post_buy(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<OrderForm>,
) -> Result<Response, Error> {
    if form.symbol.trim().is_empty() {
        return Err(Error::MissingField("must provide symbol"));
    }

    let shares = parse_shares(&form.shares)?;

    let quote = state.quotes.lookup(&form.symbol).await.map_err(|error| {
        tracing::warn!("quote lookup for {:?} failed: {error}", form.symbol);
        Error::InvalidSymbol
    })?;

    let trade = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        buy(user_id, &quote, shares, &connection)?
    };

    tracing::info!(
        "user {user_id} bought {} {} at {}",
        trade.shares,
        trade.symbol,
        trade.price
    );

    Ok((set_flash(jar, "Bought!"), Redirect::to(endpoints::ROOT)).into_response())
}
