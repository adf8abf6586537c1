// HTTP implementation of the backend seams against a hosted
// Supabase-style project: PostgREST tables under /rest/v1, GoTrue under
// /auth/v1 and edge functions under /functions/v1.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::backend::{
    AuthError, FunctionGateway, Identity, IdentityProvider, Principal, Row, RowFilter, RowStore,
    StoreError,
};
use crate::config::BackendConfig;

/// Token material for the active session, restorable across CLI
/// invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub email: Option<String>,
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::Config(
                "backend URL is not set (FIRMA_BACKEND_URL)".to_string(),
            ));
        }
        let parsed = url::Url::parse(&config.url)
            .map_err(|e| StoreError::Config(format!("invalid backend URL: {}", e)))?;
        if config.anon_key.trim().is_empty() {
            return Err(StoreError::Config(
                "backend API key is not set (FIRMA_BACKEND_KEY)".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        })
    }

    /// Adopt a session saved by an earlier invocation.
    pub async fn restore_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn functions_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name)
    }

    /// Session token when signed in, anon key otherwise.
    async fn bearer_token(&self) -> String {
        match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        }
    }
}

#[async_trait]
impl RowStore for HttpBackend {
    async fn select(&self, table: &str, filter: RowFilter) -> Result<Vec<Row>, StoreError> {
        let response = self
            .client
            .get(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer_token().await)
            .query(&filter.to_query_pairs())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }
        Ok(response.json::<Vec<Row>>().await?)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer_token().await)
            .json(&row)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }
        Ok(())
    }

    async fn update(&self, table: &str, filter: RowFilter, patch: Row) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer_token().await)
            .query(&filter.to_query_pairs())
            .json(&patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: RowFilter) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer_token().await)
            .query(&filter.to_query_pairs())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[async_trait]
impl IdentityProvider for HttpBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(auth_error(response).await);
        }
        let token: TokenResponse = response.json().await?;
        let principal = Principal {
            user_id: token.user.id.clone(),
            email: token.user.email.clone(),
        };
        *self.session.write().await = Some(Session {
            access_token: token.access_token,
            user_id: token.user.id,
            email: token.user.email,
        });
        Ok(principal)
    }

    async fn current_principal(&self) -> Result<Option<Principal>, AuthError> {
        let token = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => return Ok(None),
        };
        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().as_u16() == 401 {
            // Expired or revoked token; drop it so later calls fall back
            // to the anon key.
            *self.session.write().await = None;
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(auth_error(response).await);
        }
        let user: AuthUser = response.json::<AuthUser>().await?;
        Ok(Some(Principal { user_id: user.id, email: user.email }))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.session.write().await.take().map(|s| s.access_token);
        if let Some(token) = token {
            let result = self
                .client
                .post(self.auth_url("logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(token)
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    tracing::debug!("remote sign-out returned {}", response.status());
                }
                Err(err) => tracing::debug!("remote sign-out failed: {}", err),
                _ => {}
            }
        }
        Ok(())
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(auth_error(response).await);
        }
        let body: Value = response.json().await?;
        // GoTrue returns the user at the top level when confirmation is
        // disabled and nested under "user" otherwise.
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .or_else(|| body.get("user").and_then(|u| u.get("id")).and_then(Value::as_str));
        match id {
            Some(id) => Ok(Identity { user_id: id.to_string(), email: email.to_string() }),
            None => Err(AuthError::Rejected {
                status: 200,
                message: "signup response carried no user id".to_string(),
            }),
        }
    }
}

#[async_trait]
impl FunctionGateway for HttpBackend {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.functions_url(name))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer_token().await)
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

async fn store_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Api { status, message: extract_message(status, &body) }
}

async fn auth_error(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthError::Rejected { status, message: extract_message(status, &body) }
}

/// Pull a human-readable message out of a PostgREST or GoTrue error body.
fn extract_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "msg", "error_description", "error", "hint"] {
            if let Some(found) = value.get(key).and_then(Value::as_str) {
                return found.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("status {}", status)
    } else {
        trimmed.to_string()
    }
}
