//! One-shot messages that survive a redirect, e.g. "Bought!" after a purchase.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};

const COOKIE_FLASH: &str = "flash";

/// Queue `message` to be shown on the next page that displays flash messages.
pub fn set_flash(jar: PrivateCookieJar, message: &str) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_FLASH, message.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Remove and return the queued flash message, if any.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    match jar.get(COOKIE_FLASH) {
        Some(cookie) => {
            let message = cookie.value().to_owned();
            let jar = jar.remove(Cookie::build(COOKIE_FLASH).path("/"));

            (jar, Some(message))
        }
        None => (jar, None),
    }
}

/// A banner for the flash message, or nothing if there is no message.
pub fn flash_banner(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            div role="alert" class="flash"
            {
                (message)
            }
        }
    }
}
