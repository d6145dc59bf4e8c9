use rusqlite::{Connection, Row};

use crate::{
    Error,
    birthday::{Birthday, NewBirthday},
};

/// Create the birthday table.
///
/// # Errors
/// Returns an error if the table could not be created.
pub fn create_birthday_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS birthday (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                month INTEGER NOT NULL,
                day INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Store a birthday. Duplicates are allowed.
pub fn insert_birthday(birthday: NewBirthday, connection: &Connection) -> Result<Birthday, Error> {
    connection.execute(
        "INSERT INTO birthday (name, month, day) VALUES (?1, ?2, ?3)",
        (&birthday.name, birthday.month, birthday.day),
    )?;

    Ok(Birthday {
        id: connection.last_insert_rowid(),
        name: birthday.name,
        month: birthday.month,
        day: birthday.day,
    })
}

/// Get every birthday in the order they were added.
pub fn get_birthdays(connection: &Connection) -> Result<Vec<Birthday>, Error> {
    connection
        .prepare("SELECT id, name, month, day FROM birthday ORDER BY id")?
        .query_map([], map_row)?
        .map(|maybe_birthday| maybe_birthday.map_err(Error::from))
        .collect()
}

fn map_row(row: &Row) -> Result<Birthday, rusqlite::Error> {
    Ok(Birthday {
        id: row.get(0)?,
        name: row.get(1)?,
        month: row.get(2)?,
        day: row.get(3)?,
    })
}
