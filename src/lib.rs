pub mod client;
pub mod config;
pub mod cookies;
pub mod models;

pub use client::{
    create_client, create_middleware_client, create_server_client, ClientKind, DatabaseError,
    Session, SupabaseClient, TableQuery,
};
pub use config::{Config, ConfigError};
pub use cookies::{
    CookieMethods, CookieOptions, CookieStore, CookieStoreError, CookieWrite, HeaderCookies,
    RequestCookies, ServerCookies, SuppressionHook,
};
pub use models::{
    Database, Table, TableInsert, TableRow, TableUpdate, WorkflowRun, WorkflowRunInsert,
    WorkflowRunUpdate, WorkflowRuns, WorkflowStatus, WorkflowSuspension,
    WorkflowSuspensionInsert, WorkflowSuspensionUpdate, WorkflowSuspensions,
};
