use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use super::{CookieStore, CookieStoreError};

/// Per-request cookie store backed by an axum-extra [`CookieJar`].
///
/// Handlers extract it, share it with a server client, and hand the jar back to
/// axum with [`RequestCookies::jar`] so the `Set-Cookie` headers reach the
/// response. While [`RequestCookies::set_read_only`] is on, writes are refused
/// with [`CookieStoreError::ReadOnly`].
pub struct RequestCookies {
    jar: Mutex<CookieJar>,
    read_only: AtomicBool,
}

impl RequestCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_jar(CookieJar::from_headers(headers))
    }

    pub fn from_jar(jar: CookieJar) -> Self {
        Self {
            jar: Mutex::new(jar),
            read_only: AtomicBool::new(false),
        }
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// Snapshot of the jar, including any cookies written so far.
    pub fn jar(&self) -> CookieJar {
        match self.jar.lock() {
            Ok(jar) => jar.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        let jar = self.jar.lock().ok()?;
        jar.get(name).map(|cookie| cookie.value().to_string())
    }

    fn set(&self, cookie: Cookie<'static>) -> Result<(), CookieStoreError> {
        if self.is_read_only() {
            return Err(CookieStoreError::ReadOnly);
        }

        let mut jar = self
            .jar
            .lock()
            .map_err(|_| CookieStoreError::Rejected("cookie jar lock poisoned".into()))?;
        let current = std::mem::replace(&mut *jar, CookieJar::new());
        *jar = current.add(cookie);
        Ok(())
    }
}

impl<S> FromRequestParts<S> for RequestCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestCookies::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CookieOptions;
    use axum::{
        http::{header, Request},
        response::IntoResponse,
    };

    #[tokio::test]
    async fn extracts_cookies_from_request_parts() {
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "sb-abcd-auth-token=abc; theme=dark")
            .body(())
            .unwrap();

        let mut parts = request.into_parts().0;
        let store = RequestCookies::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.get("sb-abcd-auth-token").as_deref(), Some("abc"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn writes_are_visible_and_emitted_as_set_cookie() {
        let store = RequestCookies::from_headers(&HeaderMap::new());

        store
            .set(CookieOptions::default().to_cookie("session", "value"))
            .expect("writable store accepts cookie");

        assert_eq!(store.get("session").as_deref(), Some("value"));

        let response = (store.jar(), ()).into_response();
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>();
        assert_eq!(set_cookie.len(), 1);
        assert!(set_cookie[0].starts_with("session=value"));
    }

    #[test]
    fn read_only_phase_refuses_writes() {
        let store = RequestCookies::from_headers(&HeaderMap::new());
        store.set_read_only(true);

        let result = store.set(CookieOptions::default().to_cookie("session", "value"));

        assert_eq!(result, Err(CookieStoreError::ReadOnly));
        assert_eq!(store.get("session"), None);

        store.set_read_only(false);
        assert!(store
            .set(CookieOptions::default().to_cookie("session", "value"))
            .is_ok());
    }
}
