use std::sync::Arc;

use axum::response::IntoResponse;
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    DEFAULT_STARTING_CASH, FinanceState, FixedQuotes,
    auth::{PasswordHash, UserID, begin_session, create_user},
    routing::build_finance_router,
};

const TEST_SECRET: &str = "nafstenoas";

/// A finance state backed by an in-memory database whose quotes come from `prices`.
pub(crate) fn get_finance_state(prices: &[(&str, f64)]) -> FinanceState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let quotes = FixedQuotes::new(prices.iter().copied()).expect("Could not create test quotes");

    FinanceState::new(
        connection,
        TEST_SECRET,
        DEFAULT_STARTING_CASH,
        Arc::new(quotes),
    )
    .expect("Could not create finance state")
}

pub(crate) fn get_finance_test_server(state: FinanceState) -> TestServer {
    TestServer::try_new(build_finance_router(state)).expect("Could not create test server.")
}

/// Create a user called `username` with a live session and return the
/// encrypted session cookie to send with requests.
pub(crate) fn log_in_as(state: &FinanceState, username: &str) -> (UserID, Cookie<'static>) {
    let connection = state.db_connection.lock().unwrap();
    let user = create_user(
        username,
        PasswordHash::new_unchecked("not a real hash"),
        DEFAULT_STARTING_CASH,
        &connection,
    )
    .expect("Could not create test user");

    let jar = PrivateCookieJar::new(state.cookie_key.clone());
    let jar = begin_session(jar, user.id, &*connection).expect("Could not start session");

    (user.id, session_cookie(jar))
}

/// Pull the encrypted session cookie out of the jar's `Set-Cookie` header.
fn session_cookie(jar: PrivateCookieJar) -> Cookie<'static> {
    let response = jar.into_response();
    let header = response
        .headers()
        .get("set-cookie")
        .expect("No set-cookie header")
        .to_str()
        .expect("Could not convert to str")
        .to_owned();

    Cookie::parse(header).expect("Could not parse cookie")
}
