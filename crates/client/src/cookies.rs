//! Cookie reader.
//!
//! Looks up a named cookie in the `; `-delimited cookie string the client
//! would send to its origin, which is where the server's `csrftoken` cookie
//! lands after any response that sets it.
//!
//! The jar itself lives in `jar` and may be mirrored to disk.

mod jar;

use std::fmt;
use std::sync::Arc;

use reqwest::Url;

pub use jar::CookieJar;

/// Name of the cookie carrying the CSRF token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Find the value of `name` in a cookie string such as `a=1; csrftoken=abc`.
///
/// Empty values read as absent.
pub fn find_cookie(cookie_string: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    cookie_string
        .split("; ")
        .find_map(|pair| pair.trim_start().strip_prefix(prefix.as_str()))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reads cookies the shared jar holds for one origin.
#[derive(Clone)]
pub struct CookieSource {
    jar: Arc<CookieJar>,
    origin: Url,
}

impl CookieSource {
    pub fn new(jar: Arc<CookieJar>, origin: Url) -> Self {
        Self { jar, origin }
    }

    /// The cookie string sent to the origin, if any cookies are stored.
    pub fn cookie_string(&self) -> Option<String> {
        self.jar.cookie_string(&self.origin)
    }

    /// The jar shared with the HTTP client.
    pub fn jar(&self) -> &Arc<CookieJar> {
        &self.jar
    }

    /// Drop every cookie, including the server session cookie.
    pub fn clear(&self) {
        self.jar.clear();
    }

    /// Value of cookie `name` for the origin.
    pub fn get(&self, name: &str) -> Option<String> {
        find_cookie(&self.cookie_string()?, name)
    }

    /// Value of the `csrftoken` cookie for the origin.
    pub fn csrf_token(&self) -> Option<String> {
        self.get(CSRF_COOKIE_NAME)
    }
}

impl fmt::Debug for CookieSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieSource")
            .field("origin", &self.origin.as_str())
            .finish_non_exhaustive()
    }
}
