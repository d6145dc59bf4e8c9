//! The trading ledger: an append-only log of share trades per user, the
//! holdings derived from it and the pages for buying, selling and reviewing
//! trades.

mod buy_page;
mod history_page;
mod holdings;
mod orders;
mod portfolio_page;
mod sell_page;
mod trade;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    FinanceState,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    quote::QuoteProvider,
};

pub use buy_page::{get_buy_page, post_buy};
pub use history_page::get_history_page;
pub use holdings::{Holding, summarize_holdings};
pub use orders::{OrderForm, buy, check_can_sell, parse_shares, sell};
pub use portfolio_page::get_portfolio_page;
pub use sell_page::{get_sell_page, post_sell};
pub use trade::{Trade, create_trade_table, get_trades, shares_owned};

/// The cash balance given to a newly registered user.
pub const DEFAULT_STARTING_CASH: f64 = 10_000.0;

/// The state needed by the ledger pages.
#[derive(Clone)]
pub struct LedgerState {
    /// The key for the private flash cookie.
    pub cookie_key: Key,
    /// Where share prices come from.
    pub quotes: Arc<dyn QuoteProvider>,
    /// The database connection holding users and trades.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<FinanceState> for LedgerState {
    fn from_ref(state: &FinanceState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            quotes: state.quotes.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Wrap `content` in the page layout with the nav bar, highlighting `active_endpoint`.
fn ledger_page(title: &str, active_endpoint: &str, content: &Markup) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    base(
        title,
        &html! {
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE) { (content) }
        },
    )
}
