//! The apology page shown whenever a request cannot be completed.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base},
};

/// An error page with a message and the HTTP status code it is sent with.
pub struct Apology<'a> {
    message: &'a str,
    status_code: StatusCode,
}

impl<'a> Apology<'a> {
    pub fn new(message: &'a str, status_code: StatusCode) -> Self {
        Self {
            message,
            status_code,
        }
    }

    pub fn internal_server_error() -> Self {
        Self::new(
            "Sorry, something went wrong. Try again later or check the server logs.",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            "The page you are looking for does not exist.",
            StatusCode::NOT_FOUND,
        )
    }

    fn view(&self) -> Markup {
        let content = html!(
            section class="apology"
            {
                h1 class="apology-status" { (self.status_code.as_u16()) }

                p class="apology-message" { (self.message) }

                a href=(endpoints::ROOT) class=(BUTTON_PRIMARY_STYLE) { "Back to Homepage" }
            }
        );

        base("Apology", &content)
    }
}

impl IntoResponse for Apology<'_> {
    fn into_response(self) -> Response {
        (self.status_code, Html(self.view().into_string())).into_response()
    }
}

/// The fallback handler for paths that match no route.
pub async fn get_404_not_found() -> Response {
    Apology::not_found().into_response()
}
