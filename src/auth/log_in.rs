//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The session module handles the lower level session and cookie logic.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{SessionState, User, UserID, begin_session, end_session, get_user_by_username},
    endpoints,
    html::{FORM_NOTE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, form_input, form_view},
    navigation::NavBar,
};

fn log_in_view() -> Markup {
    let nav_bar = NavBar::anonymous(endpoints::LOG_IN).into_html();
    let fields = html! {
        (form_input("Username", "username", "text", true))
        (form_input("Password", "password", "password", false))
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (form_view("Log In", endpoints::LOG_IN, &fields, "Log In"))

            p class=(FORM_NOTE_STYLE)
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER) class=(LINK_STYLE) { "Register here" }
            }
        }
    };

    base("Log In", &content)
}

/// Display the log-in page.
///
/// Visiting the log-in page ends any session the client had.
pub async fn get_log_in_page(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let jar = end_session(jar, &*connection)?;

    Ok((jar, log_in_view()).into_response())
}

/// The raw data entered by the user in the log-in form.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogInForm {
    pub username: String,
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// Any existing session is ended first. On success a new session is started
/// and the client is redirected to the portfolio page.
///
/// # Errors
///
/// Responds with a 403 apology if either field is empty, the username does
/// not exist or the password is wrong.
pub async fn post_log_in(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Result<Response, Error> {
    let (jar, user) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let jar = end_session(jar, &*connection)?;

        (jar, find_user(&form, &connection))
    };

    // The password is checked without holding the lock since bcrypt is slow.
    let user_id = match user.and_then(|user| check_password(&user, &form.password)) {
        Ok(user_id) => user_id,
        Err(error) => return Ok((jar, error).into_response()),
    };

    let jar = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        begin_session(jar, user_id, &*connection)?
    };

    tracing::info!("user {user_id} logged in");

    Ok((jar, Redirect::to(endpoints::ROOT)).into_response())
}

fn find_user(form: &LogInForm, connection: &Connection) -> Result<User, Error> {
    if form.username.is_empty() {
        return Err(Error::MissingCredential("must provide username"));
    }

    if form.password.is_empty() {
        return Err(Error::MissingCredential("must provide password"));
    }

    match get_user_by_username(&form.username, connection) {
        Err(Error::NotFound) => Err(Error::InvalidCredentials),
        result => result,
    }
}

fn check_password(user: &User, password: &str) -> Result<UserID, Error> {
    match user.password_hash.verify(password) {
        Ok(true) => Ok(user.id),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Err(Error::HashingError(error.to_string()))
        }
    }
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;

    use crate::{
        FinanceState,
        auth::{PasswordHash, cookie::COOKIE_SESSION, create_user},
        endpoints,
        test_utils::{
            assert_apology, assert_form_action, assert_form_input,
            assert_form_submit_button_with_text, assert_redirect, assert_valid_html,
            get_finance_state, get_finance_test_server, log_in_as, must_get_form,
            parse_html_text,
        },
    };

    use super::LogInForm;

    fn get_state_with_user() -> FinanceState {
        let state = get_finance_state(&[]);
        {
            let connection = state.db_connection.lock().unwrap();
            create_user(
                "alice",
                PasswordHash::new("pw1", 4).unwrap(),
                10_000.0,
                &connection,
            )
            .unwrap();
        }

        state
    }

    fn form(username: &str, password: &str) -> LogInForm {
        LogInForm {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    fn count_sessions(state: &FinanceState) -> i64 {
        state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn log_in_page_has_form() {
        let server = get_finance_test_server(get_finance_state(&[]));

        let response = server.get(endpoints::LOG_IN).await;

        response.assert_status_ok();
        let html = parse_html_text(&response.text());
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_action(&form, endpoints::LOG_IN);
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button_with_text(&form, "Log In");
    }

    #[tokio::test]
    async fn log_in_succeeds() {
        let state = get_state_with_user();
        let server = get_finance_test_server(state.clone());

        let response = server
            .post(endpoints::LOG_IN)
            .form(&form("alice", "pw1"))
            .await;

        assert_redirect(&response, endpoints::ROOT);
        let cookie = response.cookie(COOKIE_SESSION);
        server
            .get(endpoints::ROOT)
            .add_cookie(cookie)
            .await
            .assert_status_ok();
        assert_eq!(count_sessions(&state), 1);
    }

    #[tokio::test]
    async fn log_in_fails() {
        let server = get_finance_test_server(get_state_with_user());

        let cases = [
            (form("", "pw1"), "must provide username"),
            (form("alice", ""), "must provide password"),
            (form("bob", "pw1"), "invalid username and/or password"),
            (form("alice", "wrong"), "invalid username and/or password"),
        ];

        for (form, want_message) in cases {
            let response = server.post(endpoints::LOG_IN).form(&form).await;

            assert_apology(&response, StatusCode::FORBIDDEN, want_message);
        }
    }

    #[tokio::test]
    async fn visiting_log_in_page_ends_session() {
        let state = get_finance_state(&[]);
        let (_, cookie) = log_in_as(&state, "alice");
        let server = get_finance_test_server(state.clone());

        server
            .get(endpoints::LOG_IN)
            .add_cookie(cookie.clone())
            .await
            .assert_status_ok();

        assert_eq!(count_sessions(&state), 0);
        assert_redirect(
            &server.get(endpoints::ROOT).add_cookie(cookie).await,
            endpoints::LOG_IN,
        );
    }

    #[tokio::test]
    async fn failed_log_in_still_ends_previous_session() {
        let state = get_state_with_user();
        let (_, cookie) = log_in_as(&state, "bob");
        let server = get_finance_test_server(state.clone());

        let response = server
            .post(endpoints::LOG_IN)
            .add_cookie(cookie)
            .form(&form("alice", "wrong"))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(count_sessions(&state), 0);
    }

    #[tokio::test]
    async fn log_in_form_without_fields_is_rejected() {
        let server = get_finance_test_server(get_finance_state(&[]));

        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/x-www-form-urlencoded")
            .await;

        assert_apology(&response, StatusCode::FORBIDDEN, "must provide username");
    }
}
