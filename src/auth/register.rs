//! The registration page for creating an account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, FinanceState,
    auth::{PasswordHash, begin_session, create_user, end_session},
    endpoints,
    flash::set_flash,
    html::{FORM_NOTE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, form_input, form_view},
    navigation::NavBar,
};

fn register_view() -> Markup {
    let nav_bar = NavBar::anonymous(endpoints::REGISTER).into_html();
    let fields = html! {
        (form_input("Username", "username", "text", true))
        (form_input("Password", "password", "password", false))
        (form_input("Confirm Password", "confirmation", "password", false))
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (form_view("Register", endpoints::REGISTER, &fields, "Register"))

            p class=(FORM_NOTE_STYLE)
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN) class=(LINK_STYLE) { "Log in here" }
            }
        }
    };

    base("Register", &content)
}

/// Display the registration page.
pub async fn get_register_page() -> Markup {
    register_view()
}

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The cash balance new users start with.
    pub starting_cash: f64,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<FinanceState> for RegistrationState {
    fn from_ref(state: &FinanceState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            starting_cash: state.starting_cash,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirmation: String,
}

impl RegisterForm {
    /// Check the fields in order and report the first problem.
    fn validate(&self) -> Result<(), Error> {
        if self.username.is_empty() {
            return Err(Error::MissingField("must provide username"));
        }

        if self.password.is_empty() {
            return Err(Error::MissingField("must provide password"));
        }

        if self.confirmation.is_empty() {
            return Err(Error::MissingField("must confirm password"));
        }

        if self.password != self.confirmation {
            return Err(Error::PasswordMismatch);
        }

        Ok(())
    }
}

/// Create a new user, log them in and redirect to the portfolio page.
///
/// Any session the client already had is ended.
///
/// # Errors
///
/// Responds with a 400 apology if a field is missing, the passwords differ
/// or the username is taken.
pub async fn post_register(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, Error> {
    form.validate()?;

    let password_hash = PasswordHash::new(&form.password, PasswordHash::DEFAULT_COST)?;

    let jar = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let user = create_user(
            &form.username,
            password_hash,
            state.starting_cash,
            &connection,
        )?;
        tracing::info!("registered user {} as {}", user.username, user.id);

        let jar = end_session(jar, &*connection)?;
        begin_session(jar, user.id, &*connection)?
    };

    Ok((set_flash(jar, "Registered!"), Redirect::to(endpoints::ROOT)).into_response())
}
