//! The history page: every trade the user has made, newest first.

use axum::{Extension, extract::State};
use maud::{Markup, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, format_currency,
    },
    ledger::{LedgerState, Trade, get_trades, ledger_page},
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn history_view(trades: &[Trade]) -> Markup {
    let content = html! {
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Symbol" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Shares" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Transacted" }
                }
            }

            tbody
            {
                @for trade in trades {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (trade.symbol) }
                        td class=(TABLE_CELL_STYLE) { (trade.shares) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(trade.price)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (trade
                                .timestamp
                                .format(TIMESTAMP_FORMAT)
                                .unwrap_or_else(|_| trade.timestamp.to_string()))
                        }
                    }
                }
            }
        }
    };

    ledger_page("History", endpoints::HISTORY, &content)
}

/// Display all of the user's trades, newest first.
pub async fn get_history_page(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Markup, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let trades = get_trades(user_id, &connection)?;

    Ok(history_view(&trades))
}

#[cfg(test)]
mod history_page_tests {
    use crate::{
        endpoints,
        ledger::{buy, sell},
        quote::Quote,
        test_utils::{
            assert_valid_html, get_finance_state, get_finance_test_server, log_in_as,
            must_get_table_rows, parse_html_text,
        },
    };

    #[tokio::test]
    async fn history_lists_signed_trades_newest_first() {
        let state = get_finance_state(&[]);
        let (user_id, cookie) = log_in_as(&state, "alice");
        {
            let connection = state.db_connection.lock().unwrap();
            let quote = |price| Quote {
                symbol: "NFLX".to_owned(),
                price,
            };
            buy(user_id, &quote(500.0), 10, &connection).unwrap();
            sell(user_id, &quote(512.5), 3, &connection).unwrap();
        }
        let server = get_finance_test_server(state);

        let response = server.get(endpoints::HISTORY).add_cookie(cookie).await;

        response.assert_status_ok();
        let html = parse_html_text(&response.text());
        assert_valid_html(&html);
        let rows = must_get_table_rows(&html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][..3], ["NFLX", "-3", "$512.50"]);
        assert_eq!(rows[1][..3], ["NFLX", "10", "$500.00"]);
    }

    #[tokio::test]
    async fn empty_history() {
        let state = get_finance_state(&[]);
        let (_, cookie) = log_in_as(&state, "alice");
        let server = get_finance_test_server(state);

        let response = server.get(endpoints::HISTORY).add_cookie(cookie).await;

        let html = parse_html_text(&response.text());
        assert!(must_get_table_rows(&html).is_empty());
    }
}
