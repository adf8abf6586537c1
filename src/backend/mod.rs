// Collaborator seams for the hosted backend: identity, row storage and
// privileged functions. The dashboard core only ever talks to these
// traits; `HttpBackend` is the production implementation and the
// in-memory one lives in `crate::testing`.
pub mod filter;
pub mod http;

pub use filter::{RowFilter, SortDirection};
pub use http::HttpBackend;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Raw backend row, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: String,
    pub email: Option<String>,
}

/// Newly created login identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth endpoint returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors from row storage and function invocation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid backend configuration: {0}")]
    Config(String),

    #[error("malformed row from backend: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Authentication side of the hosted backend.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    /// Principal of the active session, `None` when nobody is signed in.
    async fn current_principal(&self) -> Result<Option<Principal>, AuthError>;

    /// Invalidate the active session. Best effort: local session state is
    /// always cleared even when the remote call fails.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Create a login for a new user without signing them in.
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

/// Generic table access on the hosted backend.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn select(&self, table: &str, filter: RowFilter) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError>;

    /// Apply `patch` to every row matching `filter`. Matching zero rows is
    /// not an error.
    async fn update(&self, table: &str, filter: RowFilter, patch: Row) -> Result<(), StoreError>;

    async fn delete(&self, table: &str, filter: RowFilter) -> Result<(), StoreError>;
}

/// Privileged server-side operations the dashboard may invoke but not
/// perform itself.
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value, StoreError>;
}

/// Bundle of the three collaborator seams, cheap to clone and share.
#[derive(Clone)]
pub struct Backend {
    pub identity: Arc<dyn IdentityProvider>,
    pub rows: Arc<dyn RowStore>,
    pub functions: Arc<dyn FunctionGateway>,
}

impl Backend {
    /// Backend wired to the hosted project's REST, auth and functions
    /// endpoints.
    pub fn http(config: &crate::config::BackendConfig) -> Result<Self, StoreError> {
        let http = Arc::new(HttpBackend::new(config)?);
        Ok(Self {
            identity: http.clone(),
            rows: http.clone(),
            functions: http,
        })
    }
}
