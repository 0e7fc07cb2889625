use std::fmt;
use std::sync::Arc;

use super::{CookieMethods, CookieOptions, CookieStore, CookieStoreError, CookieWrite};

/// Called with the cookie name and the error whenever a write is swallowed.
pub type SuppressionHook = Arc<dyn Fn(&str, &CookieStoreError) + Send + Sync>;

/// Cookie adapter for server-rendered requests.
///
/// Writes that the store refuses (typically because the request is in a
/// read-only rendering phase) are swallowed. The request boundary re-issues
/// the mutation on the response, so nothing is lost.
#[derive(Clone)]
pub struct ServerCookies {
    store: Arc<dyn CookieStore>,
    on_suppressed: Option<SuppressionHook>,
}

impl fmt::Debug for ServerCookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerCookies")
            .field("has_suppression_hook", &self.on_suppressed.is_some())
            .finish_non_exhaustive()
    }
}

impl ServerCookies {
    pub fn new(store: Arc<dyn CookieStore>) -> Self {
        Self {
            store,
            on_suppressed: None,
        }
    }

    pub fn with_suppression_hook(mut self, hook: SuppressionHook) -> Self {
        self.on_suppressed = Some(hook);
        self
    }

    fn write(&self, name: &str, value: &str, options: &CookieOptions) -> CookieWrite {
        match self.store.set(options.to_cookie(name, value)) {
            Ok(()) => CookieWrite::Written,
            Err(err) => {
                if let Some(hook) = &self.on_suppressed {
                    hook(name, &err);
                }
                CookieWrite::Suppressed
            }
        }
    }
}

impl CookieMethods for ServerCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.store.get(name)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> CookieWrite {
        self.write(name, value, options)
    }

    fn remove(&self, name: &str, options: &CookieOptions) -> CookieWrite {
        self.write(name, "", &options.expired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::MockCookieStore;
    use std::sync::Mutex;
    use time::Duration as TimeDuration;

    #[test]
    fn get_delegates_to_store() {
        let mut store = MockCookieStore::new();
        store.expect_get().returning(|name| {
            if name == "sb-auth" {
                Some("token".to_string())
            } else {
                None
            }
        });

        let cookies = ServerCookies::new(Arc::new(store));

        assert_eq!(cookies.get("sb-auth").as_deref(), Some("token"));
        assert_eq!(cookies.get("other"), None);
    }

    #[test]
    fn set_writes_cookie_with_options() {
        let mut store = MockCookieStore::new();
        store
            .expect_set()
            .withf(|cookie| {
                cookie.name() == "sb-auth" && cookie.value() == "token" && cookie.path() == Some("/")
            })
            .times(1)
            .returning(|_| Ok(()));

        let cookies = ServerCookies::new(Arc::new(store));

        assert_eq!(
            cookies.set("sb-auth", "token", &CookieOptions::default()),
            CookieWrite::Written
        );
    }

    #[test]
    fn remove_writes_empty_expired_cookie() {
        let mut store = MockCookieStore::new();
        store
            .expect_set()
            .withf(|cookie| {
                cookie.name() == "sb-auth"
                    && cookie.value().is_empty()
                    && cookie.max_age() == Some(TimeDuration::seconds(0))
            })
            .times(1)
            .returning(|_| Ok(()));

        let cookies = ServerCookies::new(Arc::new(store));

        assert_eq!(
            cookies.remove("sb-auth", &CookieOptions::default()),
            CookieWrite::Written
        );
    }

    #[test]
    fn read_only_store_errors_are_suppressed() {
        let mut store = MockCookieStore::new();
        store
            .expect_set()
            .times(2)
            .returning(|_| Err(CookieStoreError::ReadOnly));

        let cookies = ServerCookies::new(Arc::new(store));

        assert_eq!(
            cookies.set("sb-auth", "token", &CookieOptions::default()),
            CookieWrite::Suppressed
        );
        assert_eq!(
            cookies.remove("sb-auth", &CookieOptions::default()),
            CookieWrite::Suppressed
        );
    }

    #[test]
    fn suppression_hook_observes_swallowed_errors() {
        let mut store = MockCookieStore::new();
        store
            .expect_set()
            .returning(|_| Err(CookieStoreError::Rejected("locked".into())));

        let seen: Arc<Mutex<Vec<(String, CookieStoreError)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let cookies = ServerCookies::new(Arc::new(store)).with_suppression_hook(Arc::new(
            move |name: &str, err: &CookieStoreError| {
                sink.lock().unwrap().push((name.to_string(), err.clone()));
            },
        ));

        let outcome = cookies.set("sb-auth", "token", &CookieOptions::default());

        assert_eq!(outcome, CookieWrite::Suppressed);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "sb-auth");
        assert_eq!(seen[0].1, CookieStoreError::Rejected("locked".into()));
    }

    #[test]
    fn hook_is_not_called_on_success() {
        let mut store = MockCookieStore::new();
        store.expect_set().returning(|_| Ok(()));

        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let cookies = ServerCookies::new(Arc::new(store)).with_suppression_hook(Arc::new(
            move |_: &str, _: &CookieStoreError| {
                *counter.lock().unwrap() += 1;
            },
        ));

        cookies.set("sb-auth", "token", &CookieOptions::default());

        assert_eq!(*calls.lock().unwrap(), 0);
    }
}
