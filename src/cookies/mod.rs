//! Cookie adapters that let a [`crate::SupabaseClient`] persist its auth
//! session through HTTP cookies.
//!
//! The client only ever talks to [`CookieMethods`]. Which implementation it
//! gets depends on the execution context:
//!
//! * [`ServerCookies`] writes through a request-scoped [`CookieStore`] and
//!   tolerates read-only phases.
//! * [`HeaderCookies`] reads the raw `Cookie` request header and never writes.
//!
//! The browser client has no adapter at all.

pub mod middleware;
pub mod request_store;
pub mod server;

use axum_extra::extract::cookie::{Cookie, SameSite};
use thiserror::Error;
use time::Duration as TimeDuration;

pub use middleware::HeaderCookies;
pub use request_store::RequestCookies;
pub use server::{ServerCookies, SuppressionHook};

/// Default lifetime the hosted SDK gives its session cookies.
pub const DEFAULT_COOKIE_MAX_AGE_DAYS: i64 = 400;

/// Outcome of a cookie write. Writes never fail from the caller's point of
/// view; the variant tells the caller what actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieWrite {
    /// The store accepted the cookie.
    Written,
    /// The store refused the write and the error was swallowed.
    Suppressed,
    /// The adapter does not write cookies in this context.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieStoreError {
    #[error("cookies can only be modified in a mutable request phase")]
    ReadOnly,
    #[error("cookie store rejected the write: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: Option<TimeDuration>,
    pub same_site: Option<SameSite>,
    pub http_only: Option<bool>,
    pub secure: Option<bool>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: Some("/".to_string()),
            domain: None,
            max_age: Some(TimeDuration::days(DEFAULT_COOKIE_MAX_AGE_DAYS)),
            same_site: Some(SameSite::Lax),
            http_only: Some(false),
            secure: None,
        }
    }
}

impl CookieOptions {
    /// Same options, expiring immediately.
    pub fn expired(&self) -> Self {
        Self {
            max_age: Some(TimeDuration::seconds(0)),
            ..self.clone()
        }
    }

    pub fn to_cookie(&self, name: &str, value: &str) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_string(), value.to_string()));
        if let Some(path) = &self.path {
            builder = builder.path(path.clone());
        }
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(max_age) = self.max_age {
            builder = builder.max_age(max_age);
        }
        if let Some(same_site) = self.same_site {
            builder = builder.same_site(same_site);
        }
        if let Some(http_only) = self.http_only {
            builder = builder.http_only(http_only);
        }
        if let Some(secure) = self.secure {
            builder = builder.secure(secure);
        }
        builder.build()
    }
}

/// The get/set/remove trio a client uses to persist auth state.
pub trait CookieMethods: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> CookieWrite;
    fn remove(&self, name: &str, options: &CookieOptions) -> CookieWrite;
}

/// A request-scoped cookie store owned by the hosting framework.
#[cfg_attr(test, mockall::automock)]
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, cookie: Cookie<'static>) -> Result<(), CookieStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_build_session_cookie() {
        let cookie = CookieOptions::default().to_cookie("sb-auth", "value");

        assert_eq!(cookie.name(), "sb-auth");
        assert_eq!(cookie.value(), "value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(
            cookie.max_age(),
            Some(TimeDuration::days(DEFAULT_COOKIE_MAX_AGE_DAYS))
        );
    }

    #[test]
    fn expired_keeps_other_options() {
        let options = CookieOptions {
            domain: Some("example.com".into()),
            secure: Some(true),
            ..CookieOptions::default()
        };
        let expired = options.expired();

        assert_eq!(expired.max_age, Some(TimeDuration::seconds(0)));
        assert_eq!(expired.domain.as_deref(), Some("example.com"));
        assert_eq!(expired.secure, Some(true));
    }
}
