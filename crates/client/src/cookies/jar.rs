//! Cookie jar that can outlive the process.
//!
//! Responsibilities:
//! - Hold the cookies the server sets (`sessionid`, `csrftoken`) with RFC 6265
//!   domain and path matching.
//! - Optionally mirror them to a JSON file so a later process resumes the
//!   same server session.
//!
//! Invariants:
//! - The file is read once, when the jar is opened. Missing or corrupt files
//!   open as an empty jar (corruption is logged at `warn`).
//! - Session cookies without an expiry are saved too; expired ones are
//!   dropped on load.
//! - [`CookieJar::clear`] empties the jar and its file together.

use std::fmt;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cookie_store::RawCookie;
use reqwest::Url;
use reqwest::header::HeaderValue;

use crate::store::write_atomic;

/// Cookie storage shared by the HTTP client and the cookie reader.
pub struct CookieJar {
    store: RwLock<cookie_store::CookieStore>,
    path: Option<PathBuf>,
}

impl CookieJar {
    /// A jar that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            store: RwLock::new(cookie_store::CookieStore::default()),
            path: None,
        }
    }

    /// Open a jar mirrored to `path`, loading any cookies saved there.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = Self::load(&path);
        Self {
            store: RwLock::new(store),
            path: Some(path),
        }
    }

    /// Backing file, if the jar is persistent.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Store one `Set-Cookie` value as if `url` had sent it.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        let parsed = RawCookie::parse(cookie).ok().map(RawCookie::into_owned);
        let mut store = self.write();
        store.store_response_cookies(parsed.into_iter(), url);
        self.save(&store);
    }

    /// The `name=value; ...` string sent to `url`, if any cookie matches.
    pub fn cookie_string(&self, url: &Url) -> Option<String> {
        let joined = self
            .read()
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        (!joined.is_empty()).then_some(joined)
    }

    /// Forget every cookie, in memory and on disk.
    pub fn clear(&self) {
        let mut store = self.write();
        store.clear();
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "Cookie jar cleared"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove cookie file"
                ),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read().iter_unexpired().next().is_none()
    }

    fn read(&self) -> RwLockReadGuard<'_, cookie_store::CookieStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, cookie_store::CookieStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    fn load(path: &Path) -> cookie_store::CookieStore {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return cookie_store::CookieStore::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read cookie file");
                return cookie_store::CookieStore::default();
            }
        };

        cookie_store::serde::json::load(BufReader::new(file)).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt cookie file, starting empty");
            cookie_store::CookieStore::default()
        })
    }

    fn save(&self, store: &cookie_store::CookieStore) {
        let Some(path) = &self.path else {
            return;
        };

        let mut content = Vec::new();
        let written = cookie_store::serde::json::save_incl_expired_and_nonpersistent(
            store,
            &mut content,
        )
        .map_err(|e| std::io::Error::other(e.to_string()))
        .and_then(|()| write_atomic(path, &content));

        if let Err(e) = written {
            tracing::warn!(path = %path.display(), error = %e, "Failed to persist cookies");
        }
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies: Vec<RawCookie<'static>> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| RawCookie::parse(value).ok())
            .map(RawCookie::into_owned)
            .collect();
        if cookies.is_empty() {
            return;
        }

        let mut store = self.write();
        store.store_response_cookies(cookies.into_iter(), url);
        self.save(&store);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let joined = self.cookie_string(url)?;
        HeaderValue::from_str(&joined).ok()
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieJar")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
