use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use crate::cookies::{CookieMethods, CookieOptions, CookieWrite};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Auth session as the hosted SDK persists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

impl Session {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now.unix_timestamp(),
            None => false,
        }
    }
}

/// Where a client keeps its session. Values are percent-encoded so JSON
/// survives cookie headers.
pub(crate) enum SessionStorage {
    /// Owned by the handle; the browser client's default.
    Memory(Mutex<HashMap<String, String>>),
    Cookies {
        methods: Arc<dyn CookieMethods>,
        options: CookieOptions,
    },
}

impl SessionStorage {
    pub(crate) fn memory() -> Self {
        SessionStorage::Memory(Mutex::new(HashMap::new()))
    }

    pub(crate) fn cookies(methods: Arc<dyn CookieMethods>) -> Self {
        SessionStorage::Cookies {
            methods,
            options: CookieOptions::default(),
        }
    }

    fn get_item(&self, key: &str) -> Option<String> {
        match self {
            SessionStorage::Memory(items) => items.lock().ok()?.get(key).cloned(),
            SessionStorage::Cookies { methods, .. } => methods.get(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> CookieWrite {
        match self {
            SessionStorage::Memory(items) => match items.lock() {
                Ok(mut items) => {
                    items.insert(key.to_string(), value.to_string());
                    CookieWrite::Written
                }
                Err(_) => CookieWrite::Suppressed,
            },
            SessionStorage::Cookies { methods, options } => methods.set(key, value, options),
        }
    }

    fn remove_item(&self, key: &str) -> CookieWrite {
        match self {
            SessionStorage::Memory(items) => match items.lock() {
                Ok(mut items) => {
                    items.remove(key);
                    CookieWrite::Written
                }
                Err(_) => CookieWrite::Suppressed,
            },
            SessionStorage::Cookies { methods, options } => methods.remove(key, options),
        }
    }

    pub(crate) fn load_session(&self, key: &str) -> Option<Session> {
        let raw = self.get_item(key)?;
        if raw.is_empty() {
            return None;
        }
        let decoded = urlencoding::decode(&raw).ok()?;
        match serde_json::from_str::<Session>(&decoded) {
            Ok(session) => Some(session),
            Err(error) => {
                debug!(%key, ?error, "Ignoring unreadable stored session");
                None
            }
        }
    }

    pub(crate) fn store_session(
        &self,
        key: &str,
        session: &Session,
    ) -> Result<CookieWrite, serde_json::Error> {
        let json = serde_json::to_string(session)?;
        let encoded = urlencoding::encode(&json);
        Ok(self.set_item(key, &encoded))
    }

    pub(crate) fn clear_session(&self, key: &str) -> CookieWrite {
        self.remove_item(key)
    }
}
