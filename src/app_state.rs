//! Implements the structs that hold the state of the two web servers.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};

use crate::{
    Error,
    db::{initialize_birthday_db, initialize_finance_db},
    quote::QuoteProvider,
};

/// The state of the finance server.
#[derive(Clone)]
pub struct FinanceState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The cash balance given to newly registered users.
    pub starting_cash: f64,

    /// Where share prices come from.
    pub quotes: Arc<dyn QuoteProvider>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FinanceState {
    /// Create a new [FinanceState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// users, sessions and trades.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        starting_cash: f64,
        quotes: Arc<dyn QuoteProvider>,
    ) -> Result<Self, Error> {
        initialize_finance_db(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            starting_cash,
            quotes,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl std::fmt::Debug for FinanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceState")
            .field("starting_cash", &self.starting_cash)
            .field("quotes", &self.quotes.name())
            .finish_non_exhaustive()
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<FinanceState> for Key {
    fn from_ref(state: &FinanceState) -> Self {
        state.cookie_key.clone()
    }
}

/// The state of the birthday server.
#[derive(Debug, Clone)]
pub struct BirthdayState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl BirthdayState {
    /// Create a new [BirthdayState], creating the birthday table if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize_birthday_db(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
