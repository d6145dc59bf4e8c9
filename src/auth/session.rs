//! The server-side session store.
//!
//! A session maps a random session ID, which the client holds in an
//! encrypted cookie, to the ID of a logged-in user.

use std::fmt::Display;

use axum_extra::extract::PrivateCookieJar;
use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    Error,
    auth::{
        UserID,
        cookie::{get_session_id, invalidate_session_cookie, set_session_cookie},
    },
};

/// An opaque, randomly generated session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a session ID read from a cookie.
    pub fn from_cookie_value(value: &str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keyed storage for sessions.
pub trait SessionStore {
    /// Get the user that `session_id` belongs to, or `None` if the session
    /// does not exist.
    fn get(&self, session_id: &SessionId) -> Result<Option<UserID>, Error>;

    /// Associate `session_id` with `user_id`, replacing any existing entry.
    fn set(&self, session_id: &SessionId, user_id: UserID) -> Result<(), Error>;

    /// Remove `session_id`. Clearing a session that does not exist is not an error.
    fn clear(&self, session_id: &SessionId) -> Result<(), Error>;
}

impl SessionStore for Connection {
    fn get(&self, session_id: &SessionId) -> Result<Option<UserID>, Error> {
        self.query_row(
            "SELECT user_id FROM session WHERE id = ?1",
            [session_id.as_str()],
            |row| row.get(0).map(UserID::new),
        )
        .optional()
        .map_err(Error::from)
    }

    fn set(&self, session_id: &SessionId, user_id: UserID) -> Result<(), Error> {
        self.execute(
            "INSERT OR REPLACE INTO session (id, user_id, created_at) VALUES (?1, ?2, ?3)",
            (
                session_id.as_str(),
                user_id.as_i64(),
                OffsetDateTime::now_utc(),
            ),
        )?;

        Ok(())
    }

    fn clear(&self, session_id: &SessionId) -> Result<(), Error> {
        self.execute("DELETE FROM session WHERE id = ?1", [session_id.as_str()])?;

        Ok(())
    }
}

/// Start a new session for `user_id` and add its ID to the cookie jar.
///
/// # Errors
/// Returns an error if the session could not be stored.
pub fn begin_session(
    jar: PrivateCookieJar,
    user_id: UserID,
    store: &impl SessionStore,
) -> Result<PrivateCookieJar, Error> {
    let session_id = SessionId::generate();
    store.set(&session_id, user_id)?;

    Ok(set_session_cookie(jar, &session_id))
}

/// Forget the session in the cookie jar, if any, and invalidate the cookie.
///
/// # Errors
/// Returns an error if the session could not be removed from the store.
pub fn end_session(
    jar: PrivateCookieJar,
    store: &impl SessionStore,
) -> Result<PrivateCookieJar, Error> {
    if let Some(session_id) = get_session_id(&jar) {
        store.clear(&session_id)?;
    }

    Ok(invalidate_session_cookie(jar))
}

/// Create the session table.
pub fn create_session_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS session (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod session_store_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::{
            PasswordHash, UserID,
            cookie::{COOKIE_SESSION, get_session_id},
            create_user,
        },
        db::initialize_finance_db,
    };

    use super::{SessionId, SessionStore, begin_session, end_session};

    fn get_connection_and_user() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_finance_db(&connection).unwrap();
        let user = create_user(
            "alice",
            PasswordHash::new_unchecked("hunter2"),
            10_000.0,
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn get_returns_none_for_unknown_session() {
        let (connection, _) = get_connection_and_user();

        assert_eq!(connection.get(&SessionId::generate()), Ok(None));
    }

    #[test]
    fn set_then_get_returns_user() {
        let (connection, user_id) = get_connection_and_user();
        let session_id = SessionId::generate();

        connection.set(&session_id, user_id).unwrap();

        assert_eq!(connection.get(&session_id), Ok(Some(user_id)));
    }

    #[test]
    fn clear_removes_session() {
        let (connection, user_id) = get_connection_and_user();
        let session_id = SessionId::generate();
        connection.set(&session_id, user_id).unwrap();

        connection.clear(&session_id).unwrap();

        assert_eq!(connection.get(&session_id), Ok(None));
    }

    #[test]
    fn clear_unknown_session_is_ok() {
        let (connection, _) = get_connection_and_user();

        assert!(connection.clear(&SessionId::generate()).is_ok());
    }

    #[test]
    fn begin_session_stores_session_and_sets_cookie() {
        let (connection, user_id) = get_connection_and_user();
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("secret")));

        let jar = begin_session(jar, user_id, &connection).unwrap();

        let session_id = get_session_id(&jar).expect("session cookie missing");
        assert_eq!(connection.get(&session_id), Ok(Some(user_id)));
    }

    #[test]
    fn end_session_clears_session_and_cookie() {
        let (connection, user_id) = get_connection_and_user();
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("secret")));
        let jar = begin_session(jar, user_id, &connection).unwrap();
        let session_id = get_session_id(&jar).unwrap();

        let jar = end_session(jar, &connection).unwrap();

        assert_eq!(connection.get(&session_id), Ok(None));
        assert_eq!(jar.get(COOKIE_SESSION).unwrap().value(), "deleted");
    }

    #[test]
    fn end_session_without_cookie_is_ok() {
        let (connection, _) = get_connection_and_user();
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("secret")));

        assert!(end_session(jar, &connection).is_ok());
    }
}
