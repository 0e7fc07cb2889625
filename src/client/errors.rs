use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Supabase request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Supabase responded with status {status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
        code: Option<String>,
        hint: Option<String>,
    },
    #[error("Supabase returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("refusing to {0} without a filter")]
    MissingFilter(&'static str),
    #[error("failed to encode session: {0}")]
    Session(#[from] serde_json::Error),
}

impl DatabaseError {
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            DatabaseError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
