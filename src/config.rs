use std::env;
use std::fmt;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{error, info};

pub const SUPABASE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `missing` lists the variables that were absent or empty. The message
    /// always names both so the operator sees the full requirement.
    #[error(
        "Missing required Supabase environment variables: NEXT_PUBLIC_SUPABASE_URL and NEXT_PUBLIC_SUPABASE_ANON_KEY"
    )]
    MissingVariables { missing: Vec<&'static str> },
}

impl ConfigError {
    pub fn missing(&self) -> &[&'static str] {
        match self {
            ConfigError::MissingVariables { missing } => missing,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let supabase_url = read(SUPABASE_URL_VAR);
        let supabase_anon_key = read(SUPABASE_ANON_KEY_VAR);

        match (supabase_url, supabase_anon_key) {
            (Some(url), Some(key)) => Ok(Config {
                supabase_url: url.trim_end_matches('/').to_string(),
                supabase_anon_key: key,
            }),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(SUPABASE_URL_VAR);
                }
                if key.is_none() {
                    missing.push(SUPABASE_ANON_KEY_VAR);
                }
                Err(ConfigError::MissingVariables { missing })
            }
        }
    }

    /// First DNS label of the project URL (`abcd` for `https://abcd.supabase.co`).
    pub fn project_ref(&self) -> &str {
        let without_scheme = self
            .supabase_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.supabase_url);
        let host = without_scheme
            .split(['/', ':'])
            .next()
            .unwrap_or(without_scheme);
        host.split('.').next().unwrap_or(host)
    }
}

/// Resolves the process-wide configuration. Call once at startup so a
/// misconfigured process stops before it serves anything.
pub fn init() -> Result<&'static Config, ConfigError> {
    global()
}

pub fn global() -> Result<&'static Config, ConfigError> {
    GLOBAL_CONFIG.get_or_try_init(|| match Config::from_env() {
        Ok(config) => {
            info!(supabase_url = %config.supabase_url, "Loaded Supabase configuration");
            Ok(config)
        }
        Err(err) => {
            error!(missing = ?err.missing(), "Supabase configuration is incomplete");
            Err(err)
        }
    })
}
