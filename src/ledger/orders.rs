//! Executing buy and sell orders against a user's cash and trade log.
//!
//! Each order is one unit of work in an `IMMEDIATE` transaction. The checks
//! are repeated inside the transaction so two concurrent orders for the same
//! user cannot both pass against a stale balance.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{UserID, get_cash},
    db::with_immediate_transaction,
    ledger::{Trade, shares_owned, trade::insert_trade},
    quote::{Quote, check_price},
};

/// The form data for buying or selling shares.
///
/// Both fields are kept as entered so that missing and malformed values can
/// be reported with their own messages.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub symbol: String,
    pub shares: String,
}

/// Parse the number of shares entered in an order form.
///
/// # Errors
/// - [Error::MissingField] if `raw_shares` is blank.
/// - [Error::InvalidShares] unless `raw_shares` is made only of ASCII digits
///   and is a positive number that fits in an `i64`.
pub fn parse_shares(raw_shares: &str) -> Result<i64, Error> {
    if raw_shares.trim().is_empty() {
        return Err(Error::MissingField("must provide number of shares"));
    }

    if !raw_shares.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidShares);
    }

    match raw_shares.parse::<i64>() {
        Ok(shares) if shares > 0 => Ok(shares),
        _ => Err(Error::InvalidShares),
    }
}

/// The price of `quote`, or [Error::InvalidSymbol] if it cannot be traded at.
fn trade_price(quote: &Quote) -> Result<f64, Error> {
    check_price(&quote.symbol, quote.price).map_err(|error| {
        tracing::warn!("refusing to trade: {error}");
        Error::InvalidSymbol
    })
}

/// Buy `shares` shares at the quoted price.
///
/// # Errors
/// Nothing is written on error.
/// - [Error::InvalidSymbol] if the quoted price is not finite and positive.
/// - [Error::InsufficientFunds] if the user's cash does not cover the cost.
/// - [Error::TooManyShares] if the holding would no longer fit in an `i64`.
pub fn buy(
    user_id: UserID,
    quote: &Quote,
    shares: i64,
    connection: &Connection,
) -> Result<Trade, Error> {
    let cost = trade_price(quote)? * shares as f64;

    with_immediate_transaction(connection, |transaction| {
        let cash = get_cash(user_id, transaction)?;

        if cash < cost {
            return Err(Error::InsufficientFunds);
        }

        shares_owned(user_id, &quote.symbol, transaction)?
            .checked_add(shares)
            .ok_or(Error::TooManyShares)?;

        transaction.execute(
            "UPDATE user SET cash = cash - ?1 WHERE id = ?2",
            (cost, user_id.as_i64()),
        )?;

        insert_trade(user_id, &quote.symbol, shares, quote.price, transaction)
    })
}

/// Check that the user holds at least `shares` shares of `symbol`.
///
/// Returns the number of shares held.
///
/// # Errors
/// - [Error::SymbolNotOwned] if the user holds no shares of `symbol`.
/// - [Error::InsufficientShares] if the user holds fewer than `shares`.
pub fn check_can_sell(
    user_id: UserID,
    symbol: &str,
    shares: i64,
    connection: &Connection,
) -> Result<i64, Error> {
    let owned = shares_owned(user_id, symbol, connection)?;

    if owned <= 0 {
        return Err(Error::SymbolNotOwned);
    }

    if shares > owned {
        return Err(Error::InsufficientShares);
    }

    Ok(owned)
}

/// Sell `shares` shares at the quoted price.
///
/// # Errors
/// Returns [Error::InvalidSymbol] if the quoted price is not finite and
/// positive, or the errors of [check_can_sell]. Nothing is written on error.
pub fn sell(
    user_id: UserID,
    quote: &Quote,
    shares: i64,
    connection: &Connection,
) -> Result<Trade, Error> {
    let proceeds = trade_price(quote)? * shares as f64;

    with_immediate_transaction(connection, |transaction| {
        check_can_sell(user_id, &quote.symbol, shares, transaction)?;

        transaction.execute(
            "UPDATE user SET cash = cash + ?1 WHERE id = ?2",
            (proceeds, user_id.as_i64()),
        )?;

        insert_trade(user_id, &quote.symbol, -shares, quote.price, transaction)
    })
}
