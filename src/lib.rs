//! Ledger is a pair of small server-rendered web apps: a simulated
//! stock-trading ledger and a birthday tracker.
//!
//! The finance app lets users register, look up share prices, buy and sell
//! shares with a virtual cash balance and review their trade history. The
//! birthday app stores and lists birthdays.
//!
//! Both apps serve HTML directly from the route handlers.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod apology;
mod app_state;
mod auth;
mod birthday;
mod cache_control;
mod db;
mod endpoints;
mod flash;
mod html;
mod ledger;
mod logging;
mod navigation;
mod quote;
mod routing;

#[cfg(test)]
mod test_utils;

pub use app_state::{BirthdayState, FinanceState};
pub use auth::{PasswordHash, User, UserID, create_user, get_user_by_id, get_user_by_username};
pub use db::{initialize_birthday_db, initialize_finance_db, open_connection};
pub use ledger::DEFAULT_STARTING_CASH;
pub use logging::{LOG_BODY_LENGTH_LIMIT, add_tracing_layer, init_tracing, logging_middleware};
pub use quote::{AlphaVantageQuotes, FixedQuotes, Quote, QuoteError, QuoteProvider};
pub use routing::{build_birthday_router, build_finance_router};

use crate::apology::Apology;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every variant maps to an apology page with a fixed HTTP status code, see
/// the [IntoResponse] implementation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required form field was empty or missing.
    ///
    /// The string is the message shown to the user, e.g. "must provide symbol".
    #[error("{0}")]
    MissingField(&'static str),

    /// A required log-in field was empty or missing.
    ///
    /// Unlike [Error::MissingField], this is reported as an authentication
    /// failure.
    #[error("{0}")]
    MissingCredential(&'static str),

    /// The number of shares was not a positive whole number.
    #[error("shares must be a positive integer")]
    InvalidShares,

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The username is already taken.
    #[error("username already exists")]
    DuplicateUsername,

    /// The username does not exist or the password is wrong.
    #[error("invalid username and/or password")]
    InvalidCredentials,

    /// The quote provider could not price the symbol.
    #[error("invalid symbol")]
    InvalidSymbol,

    /// The user's cash does not cover the cost of a purchase.
    #[error("can't afford")]
    InsufficientFunds,

    /// The purchase would take the user's holding of a symbol past the
    /// largest share count that can be stored.
    #[error("too many shares")]
    TooManyShares,

    /// The user tried to sell a symbol they hold no shares of.
    #[error("symbol not owned")]
    SymbolNotOwned,

    /// The user tried to sell more shares than they hold.
    #[error("not enough shares")]
    InsufficientShares,

    /// The birthday form contained an invalid value.
    #[error("{0}")]
    InvalidBirthday(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code the apology for this error is sent with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidShares
            | Error::PasswordMismatch
            | Error::DuplicateUsername
            | Error::InvalidSymbol
            | Error::InsufficientFunds
            | Error::TooManyShares
            | Error::SymbolNotOwned
            | Error::InsufficientShares
            | Error::InvalidBirthday(_) => StatusCode::BAD_REQUEST,
            Error::MissingCredential(_) | Error::InvalidCredentials => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        match self {
            // Internal errors are not intended to be shown to the client.
            Error::HashingError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                Apology::internal_server_error().into_response()
            }
            error => Apology::new(&error.to_string(), status_code).into_response(),
        }
    }
}
