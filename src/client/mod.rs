//! The hosted-database client handle and the three factories that build it.

pub mod errors;
pub mod query;
pub mod session;
pub mod workflows;

use std::fmt;
use std::sync::Arc;

use axum::http::Request;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::{self, Config, ConfigError};
use crate::cookies::{CookieMethods, CookieStore, CookieWrite, HeaderCookies, ServerCookies};
use crate::models::{Database, Table};

pub use errors::DatabaseError;
pub use query::TableQuery;
pub use session::Session;

use session::SessionStorage;

const REST_PATH: &str = "/rest/v1";

/// Execution context a client was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Browser,
    Server,
    Middleware,
}

#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    kind: ClientKind,
    config: Config,
    http: Client,
    storage: SessionStorage,
    storage_key: String,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("kind", &self.inner.kind)
            .field("config", &self.inner.config)
            .field("storage_key", &self.inner.storage_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    code: Option<String>,
    hint: Option<String>,
}

fn build_url(base: &str, path: &str) -> String {
    let trimmed_base = base.trim_end_matches('/');
    let trimmed_path = path.trim_start_matches('/');
    format!("{}/{}", trimmed_base, trimmed_path)
}

impl SupabaseClient {
    fn build(kind: ClientKind, config: &Config, storage: SessionStorage) -> Self {
        let storage_key = format!("sb-{}-auth-token", config.project_ref());
        debug!(?kind, supabase_url = %config.supabase_url, "Creating Supabase client");
        Self {
            inner: Arc::new(ClientInner {
                kind,
                config: config.clone(),
                http: Client::new(),
                storage,
                storage_key,
            }),
        }
    }

    /// Client whose session lives in the handle's own storage.
    pub fn browser(config: &Config) -> Self {
        Self::build(ClientKind::Browser, config, SessionStorage::memory())
    }

    pub fn server(config: &Config, store: Arc<dyn CookieStore>) -> Self {
        Self::server_with_cookies(config, ServerCookies::new(store))
    }

    /// Server client with a preconfigured adapter, e.g. one carrying a
    /// suppression hook.
    pub fn server_with_cookies(config: &Config, cookies: ServerCookies) -> Self {
        Self::with_cookie_methods(ClientKind::Server, config, Arc::new(cookies))
    }

    pub fn middleware<B>(config: &Config, request: &Request<B>) -> Self {
        Self::with_cookie_methods(
            ClientKind::Middleware,
            config,
            Arc::new(HeaderCookies::from_request(request)),
        )
    }

    pub fn with_cookie_methods(
        kind: ClientKind,
        config: &Config,
        cookies: Arc<dyn CookieMethods>,
    ) -> Self {
        Self::build(kind, config, SessionStorage::cookies(cookies))
    }

    pub fn kind(&self) -> ClientKind {
        self.inner.kind
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn rest_url(&self) -> String {
        build_url(&self.inner.config.supabase_url, REST_PATH)
    }

    /// Cookie (or storage) name the session is kept under.
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.storage.load_session(&self.inner.storage_key)
    }

    pub fn set_session(&self, session: &Session) -> Result<CookieWrite, DatabaseError> {
        Ok(self
            .inner
            .storage
            .store_session(&self.inner.storage_key, session)?)
    }

    pub fn clear_session(&self) -> CookieWrite {
        self.inner.storage.clear_session(&self.inner.storage_key)
    }

    pub fn from<T: Table>(&self) -> TableQuery<'_, T> {
        TableQuery::new(self)
    }

    /// Checks that the REST endpoint answers with the configured key.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let url = format!("{}/", self.rest_url());
        let response = self
            .authorized(self.inner.http.get(url))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await?;
            Err(api_error(status, &body))
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = &self.inner.config.supabase_anon_key;
        let token = self
            .session()
            .filter(|session| !session.is_expired_at(OffsetDateTime::now_utc()))
            .map(|session| session.access_token)
            .unwrap_or_else(|| key.clone());
        request
            .header("apikey", key.as_str())
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    pub(crate) fn rest_request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = build_url(&self.rest_url(), table);
        self.authorized(self.inner.http.request(method, url))
            .header("Accept-Profile", Database::SCHEMA)
            .header("Content-Profile", Database::SCHEMA)
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, DatabaseError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = api_error(status, &body);
            warn!(kind = ?self.inner.kind, %status, error = %err, "Supabase request failed");
            return Err(err);
        }

        serde_json::from_str::<T>(&body)
            .map_err(|err| DatabaseError::InvalidResponse(err.to_string()))
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> DatabaseError {
    let parsed = serde_json::from_str::<PostgrestErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|err| err.message.as_ref())
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .unwrap_or_else(|| "Supabase request failed".to_string());
    let (code, hint) = match parsed {
        Some(err) => (err.code, err.hint),
        None => (None, None),
    };
    DatabaseError::Api {
        status,
        message,
        code,
        hint,
    }
}

/// Browser client bound to the process-wide configuration.
pub fn create_client() -> Result<SupabaseClient, ConfigError> {
    Ok(SupabaseClient::browser(config::global()?))
}

/// Server client persisting its session through the request's cookie store.
pub fn create_server_client(store: Arc<dyn CookieStore>) -> Result<SupabaseClient, ConfigError> {
    Ok(SupabaseClient::server(config::global()?, store))
}

/// Middleware client reading cookies from `request`. Never writes cookies;
/// attach `Set-Cookie` to the outgoing response instead.
pub fn create_middleware_client<B>(request: &Request<B>) -> Result<SupabaseClient, ConfigError> {
    Ok(SupabaseClient::middleware(config::global()?, request))
}
