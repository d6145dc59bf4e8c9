//! Defines functions for carrying the session ID in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::auth::SessionId;

pub(crate) const COOKIE_SESSION: &str = "session";

/// Add the session cookie to the cookie jar.
///
/// The cookie has no expiry so it lasts until the browser session ends or
/// the user logs out.
pub(crate) fn set_session_cookie(jar: PrivateCookieJar, session_id: &SessionId) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, session_id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Read the session ID from the cookie jar, if there is one.
///
/// Cookies that fail decryption are dropped by the jar, so a tampered
/// cookie reads as no session.
pub(crate) fn get_session_id(jar: &PrivateCookieJar) -> Option<SessionId> {
    jar.get(COOKIE_SESSION)
        .map(|cookie| SessionId::from_cookie_value(cookie.value_trimmed()))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Key, SameSite},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::auth::SessionId;

    use super::{COOKIE_SESSION, get_session_id, invalidate_session_cookie, set_session_cookie};

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[test]
    fn can_set_and_read_session_cookie() {
        let session_id = SessionId::generate();

        let jar = set_session_cookie(get_jar(), &session_id);

        assert_eq!(get_session_id(&jar), Some(session_id));
        let cookie = jar.get(COOKIE_SESSION).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.expires(), None);
    }

    #[test]
    fn empty_jar_has_no_session() {
        assert_eq!(get_session_id(&get_jar()), None);
    }

    #[test]
    fn invalidate_session_cookie_succeeds() {
        let jar = set_session_cookie(get_jar(), &SessionId::generate());

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
