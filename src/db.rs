//! Opening and initializing the SQLite databases.

use std::{path::Path, time::Duration};

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};

use crate::{
    Error,
    auth::{create_session_table, create_user_table},
    birthday::create_birthday_table,
    ledger::create_trade_table,
};

/// How long SQLite waits on a locked database before giving up with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the database at `path` with foreign keys enforced and a busy timeout set.
///
/// # Errors
/// Returns an error if the file cannot be opened or the pragmas cannot be set.
pub fn open_connection(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    configure(&connection)?;

    Ok(connection)
}

fn configure(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.busy_timeout(BUSY_TIMEOUT)?;
    connection.pragma_update(None, "foreign_keys", true)?;

    Ok(())
}

/// Create the tables for the finance app if they do not exist.
///
/// # Errors
/// Returns an error if any of the tables cannot be created.
pub fn initialize_finance_db(connection: &Connection) -> Result<(), Error> {
    configure(connection)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_session_table(&transaction)?;
    create_trade_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Create the birthday table if it does not exist.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn initialize_birthday_db(connection: &Connection) -> Result<(), Error> {
    create_birthday_table(connection)?;

    Ok(())
}

/// Run `unit_of_work` inside an `IMMEDIATE` transaction, committing on
/// success and rolling back on error.
///
/// The write lock is taken when the transaction begins, so every read inside
/// `unit_of_work` sees the state it will write against. If SQLite reports the
/// database as busy or locked the whole unit of work is attempted one more
/// time.
pub fn with_immediate_transaction<T>(
    connection: &Connection,
    mut unit_of_work: impl FnMut(&Transaction) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut run = || -> Result<T, Error> {
        let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;
        // Dropping the transaction without committing rolls it back.
        let result = unit_of_work(&transaction)?;
        transaction.commit()?;

        Ok(result)
    };

    match run() {
        Err(Error::SqlError(error)) if is_transient(&error) => {
            tracing::warn!("database busy, retrying once: {error}");
            run()
        }
        result => result,
    }
}

fn is_transient(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}
