//! Log-out route handler that ends the session and redirects to the portfolio page.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    auth::{SessionState, end_session},
    endpoints,
};

/// Invalidate the session and redirect the client to the portfolio page,
/// which sends anonymous clients on to the log-in page.
pub async fn get_log_out(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let jar = end_session(jar, &*connection)?;

    Ok((jar, Redirect::to(endpoints::ROOT)).into_response())
}
