//! The trade table and queries over it.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, auth::UserID};

/// One executed buy or sell.
///
/// `shares` is positive for a purchase and negative for a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub id: i64,
    pub user_id: UserID,
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    pub timestamp: OffsetDateTime,
}

/// Create the trade table.
///
/// # Errors
/// Returns an error if the table could not be created.
pub fn create_trade_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS trade (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL,
                price REAL NOT NULL,
                timestamp TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_trade_user_symbol ON trade(user_id, symbol)",
        (),
    )?;

    Ok(())
}

/// Append a trade to the log.
pub(crate) fn insert_trade(
    user_id: UserID,
    symbol: &str,
    shares: i64,
    price: f64,
    connection: &Connection,
) -> Result<Trade, Error> {
    let timestamp = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO trade (user_id, symbol, shares, price, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
        (user_id.as_i64(), symbol, shares, price, timestamp),
    )?;

    Ok(Trade {
        id: connection.last_insert_rowid(),
        user_id,
        symbol: symbol.to_owned(),
        shares,
        price,
        timestamp,
    })
}

/// Get all of a user's trades, newest first.
///
/// Trades with the same timestamp are ordered by descending ID.
pub fn get_trades(user_id: UserID, connection: &Connection) -> Result<Vec<Trade>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, symbol, shares, price, timestamp FROM trade
            WHERE user_id = :user_id
            ORDER BY timestamp DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_trade| maybe_trade.map_err(Error::from))
        .collect()
}

/// The number of shares of `symbol` the user currently holds.
///
/// This is the sum over every trade for the symbol, zero if there are none.
pub fn shares_owned(user_id: UserID, symbol: &str, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(shares), 0) FROM trade WHERE user_id = ?1 AND symbol = ?2",
            (user_id.as_i64(), symbol),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

fn map_row(row: &Row) -> Result<Trade, rusqlite::Error> {
    Ok(Trade {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        symbol: row.get(2)?,
        shares: row.get(3)?,
        price: row.get(4)?,
        timestamp: row.get(5)?,
    })
}
