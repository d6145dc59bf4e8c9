//! Authentication middleware that resolves the session cookie to a user and redirects anonymous clients.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    Error, FinanceState,
    auth::{SessionStore, cookie::get_session_id},
    endpoints,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection holding the session table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<FinanceState> for SessionState {
    fn from_ref(state: &FinanceState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
///
/// The user ID is placed into the request and the request executed normally
/// if the cookie refers to a live session, otherwise the client is
/// redirected to the log-in page.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(endpoints::LOG_IN).into_response();
        }
    };

    let Some(session_id) = get_session_id(&jar) else {
        return Redirect::to(endpoints::LOG_IN).into_response();
    };

    let session = match state.db_connection.lock() {
        Ok(connection) => connection.get(&session_id),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user_id = match session {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            tracing::debug!("Session {session_id} not found. Redirecting to log in page.");
            return Redirect::to(endpoints::LOG_IN).into_response();
        }
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

#[cfg(test)]
mod auth_guard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Router, middleware, routing::get};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::Digest;

    use crate::{
        auth::{
            PasswordHash, SessionId, SessionStore, UserID, cookie::COOKIE_SESSION, create_user,
            cookie::set_session_cookie,
        },
        db::initialize_finance_db,
        endpoints,
    };

    use super::{SessionState, auth_guard};

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        format!("Hello, user {user_id}!")
    }

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    fn get_state() -> SessionState {
        let hash = sha2::Sha512::digest("nafstenoas");
        let connection = Connection::open_in_memory().unwrap();
        initialize_finance_db(&connection).unwrap();

        SessionState {
            cookie_key: Key::from(&hash),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: SessionState) -> TestServer {
        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    /// Create a user and a live session, returning the encrypted session cookie.
    fn log_in(state: &SessionState) -> Cookie<'static> {
        let connection = state.db_connection.lock().unwrap();
        let user = create_user(
            "alice",
            PasswordHash::new_unchecked("hunter2"),
            10_000.0,
            &connection,
        )
        .unwrap();
        let session_id = SessionId::generate();
        connection.set(&session_id, user.id).unwrap();

        let jar = set_session_cookie(PrivateCookieJar::new(state.cookie_key.clone()), &session_id);
        encrypted_cookie(jar)
    }

    /// Pull the encrypted cookie value out of the jar's `Set-Cookie` header.
    fn encrypted_cookie(jar: PrivateCookieJar) -> Cookie<'static> {
        use axum::response::IntoResponse;

        let response = jar.into_response();
        let header = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();

        Cookie::parse(header).unwrap()
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_session() {
        let state = get_state();
        let cookie = log_in(&state);
        let server = get_test_server(state);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("Hello, user 1!");
    }

    #[tokio::test]
    async fn get_protected_route_without_cookie_redirects_to_log_in() {
        let server = get_test_server(get_state());

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN);
    }

    #[tokio::test]
    async fn get_protected_route_with_tampered_cookie_redirects_to_log_in() {
        let server = get_test_server(get_state());

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_SESSION, "FOOBAR")).build())
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN);
    }

    #[tokio::test]
    async fn get_protected_route_with_cleared_session_redirects_to_log_in() {
        let state = get_state();
        let cookie = log_in(&state);
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute("DELETE FROM session", ())
                .expect("Could not clear sessions");
        }
        let server = get_test_server(state);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN);
    }
}
