use axum::http::{header::COOKIE, HeaderMap, Request};

use super::{CookieMethods, CookieOptions, CookieWrite};

/// Cookie adapter for middleware.
///
/// Reads come from the incoming `Cookie` header, captured when the adapter is
/// built. Writes are skipped: middleware attaches `Set-Cookie` to the outgoing
/// response itself.
#[derive(Debug, Clone, Default)]
pub struct HeaderCookies {
    header: Option<String>,
}

impl HeaderCookies {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::from_headers(request.headers())
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let values = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>();

        let header = if values.is_empty() {
            None
        } else {
            Some(values.join("; "))
        };

        Self { header }
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }
}

/// Looks up `name` in a raw `Cookie` header.
///
/// Entries are split on `"; "` and the value is the text between the first and
/// second `=`, so `tok=x=y` yields `x`. Callers rely on that truncation.
pub fn parse_cookie_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    let prefix = format!("{}=", name);
    header
        .split("; ")
        .find(|entry| entry.starts_with(&prefix))
        .and_then(|entry| entry.split('=').nth(1))
}

impl CookieMethods for HeaderCookies {
    fn get(&self, name: &str) -> Option<String> {
        let header = self.header.as_deref()?;
        parse_cookie_header(header, name).map(str::to_string)
    }

    fn set(&self, _name: &str, _value: &str, _options: &CookieOptions) -> CookieWrite {
        CookieWrite::Skipped
    }

    fn remove(&self, _name: &str, _options: &CookieOptions) -> CookieWrite {
        CookieWrite::Skipped
    }
}
