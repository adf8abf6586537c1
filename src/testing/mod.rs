// In-memory implementation of the backend seams, with failure injection,
// for exercising the dashboard core without a hosted project.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::{
    AuthError, Backend, FunctionGateway, Identity, IdentityProvider, Principal, Row, RowFilter,
    RowStore, StoreError,
};
use crate::models::User;

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    accounts: Vec<Account>,
    signed_in: Option<Principal>,
    fail_select: HashSet<String>,
    fail_insert: HashSet<String>,
    fail_update: HashSet<String>,
    fail_delete: HashSet<String>,
    fail_functions: HashSet<String>,
    sign_up_rejection: Option<String>,
}

/// Shared-state fake of the hosted backend. Clones share one state, so a
/// test can keep a handle for seeding and assertions while the dashboard
/// holds another.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three collaborator seams, all backed by this instance.
    pub fn backend(&self) -> Backend {
        Backend {
            identity: Arc::new(self.clone()),
            rows: Arc::new(self.clone()),
            functions: Arc::new(self.clone()),
        }
    }

    /// Seed a raw row, bypassing failure injection.
    pub async fn push_row(&self, table: &str, row: Row) {
        let mut state = self.state.lock().await;
        state.tables.entry(table.to_string()).or_default().push(row);
    }

    /// Snapshot of a table for assertions.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        let state = self.state.lock().await;
        state.tables.get(table).cloned().unwrap_or_default()
    }

    /// Seed a login account with a fixed id.
    pub async fn add_account(&self, id: &str, email: &str, password: &str) {
        let mut state = self.state.lock().await;
        state.accounts.push(Account {
            id: id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }

    pub async fn has_account(&self, email: &str) -> bool {
        self.state.lock().await.accounts.iter().any(|a| a.email == email)
    }

    pub async fn fail_select_on(&self, table: &str) {
        self.state.lock().await.fail_select.insert(table.to_string());
    }

    pub async fn fail_insert_on(&self, table: &str) {
        self.state.lock().await.fail_insert.insert(table.to_string());
    }

    pub async fn fail_update_on(&self, table: &str) {
        self.state.lock().await.fail_update.insert(table.to_string());
    }

    pub async fn fail_delete_on(&self, table: &str) {
        self.state.lock().await.fail_delete.insert(table.to_string());
    }

    pub async fn fail_function(&self, name: &str) {
        self.state.lock().await.fail_functions.insert(name.to_string());
    }

    pub async fn reject_sign_ups(&self, message: &str) {
        self.state.lock().await.sign_up_rejection = Some(message.to_string());
    }

    pub async fn clear_failures(&self) {
        let mut state = self.state.lock().await;
        state.fail_select.clear();
        state.fail_insert.clear();
        state.fail_update.clear();
        state.fail_delete.clear();
        state.fail_functions.clear();
        state.sign_up_rejection = None;
    }
}

fn injected(table: &str) -> StoreError {
    StoreError::Api { status: 500, message: format!("injected failure on {}", table) }
}

#[async_trait]
impl RowStore for MemoryBackend {
    async fn select(&self, table: &str, filter: RowFilter) -> Result<Vec<Row>, StoreError> {
        let state = self.state.lock().await;
        if state.fail_select.contains(table) {
            return Err(injected(table));
        }
        let mut rows: Vec<Row> = state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default();
        filter.sort(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_insert.contains(table) {
            return Err(injected(table));
        }
        if let Some(id) = row.get("id").and_then(Value::as_str) {
            let exists = state
                .tables
                .get(table)
                .map(|rows| {
                    rows.iter().any(|r| r.get("id").and_then(Value::as_str) == Some(id))
                })
                .unwrap_or(false);
            if exists {
                return Err(StoreError::Api {
                    status: 409,
                    message: "duplicate key value violates unique constraint".to_string(),
                });
            }
        }
        state.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: &str, filter: RowFilter, patch: Row) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_update.contains(table) {
            return Err(injected(table));
        }
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| filter.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: RowFilter) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_delete.contains(table) {
            return Err(injected(table));
        }
        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| !filter.matches(row));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned();
        match account {
            Some(account) => {
                let principal =
                    Principal { user_id: account.id, email: Some(account.email) };
                state.signed_in = Some(principal.clone());
                Ok(principal)
            }
            None => Err(AuthError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn current_principal(&self) -> Result<Option<Principal>, AuthError> {
        Ok(self.state.lock().await.signed_in.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.lock().await.signed_in = None;
        Ok(())
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.sign_up_rejection {
            return Err(AuthError::Rejected { status: 400, message: message.clone() });
        }
        if state.accounts.iter().any(|a| a.email == email) {
            return Err(AuthError::Rejected {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        // Mirrors the hosted provider's default password policy.
        if password.len() < 8 {
            return Err(AuthError::Rejected {
                status: 422,
                message: "Password should be at least 8 characters".to_string(),
            });
        }
        let id = Uuid::new_v4().to_string();
        state.accounts.push(Account {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(Identity { user_id: id, email: email.to_string() })
    }
}

#[async_trait]
impl FunctionGateway for MemoryBackend {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value, StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_functions.contains(name) {
            return Err(StoreError::Api {
                status: 500,
                message: format!("injected failure on function {}", name),
            });
        }
        match name {
            "delete-user" => {
                let user_id = payload
                    .get("userId")
                    .and_then(Value::as_str)
                    .ok_or_else(|| StoreError::Api {
                        status: 400,
                        message: "missing userId".to_string(),
                    })?
                    .to_string();
                let company_id = payload
                    .get("companyId")
                    .and_then(Value::as_str)
                    .ok_or_else(|| StoreError::Api {
                        status: 400,
                        message: "missing companyId".to_string(),
                    })?
                    .to_string();
                state.accounts.retain(|a| a.id != user_id);
                if let Some(rows) = state.tables.get_mut(User::TABLE) {
                    rows.retain(|row| {
                        !(row.get("id").and_then(Value::as_str) == Some(user_id.as_str())
                            && row.get("company_id").and_then(Value::as_str)
                                == Some(company_id.as_str()))
                    });
                }
                Ok(serde_json::json!({ "success": true }))
            }
            other => Err(StoreError::Api {
                status: 404,
                message: format!("unknown function {}", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn select_applies_filter_and_order() {
        let mem = MemoryBackend::new();
        mem.push_row("notification", row(json!({ "id": "N1", "company_id": "C1", "published_at": "2025-01-01T00:00:00Z" }))).await;
        mem.push_row("notification", row(json!({ "id": "N2", "company_id": "C2", "published_at": "2025-02-01T00:00:00Z" }))).await;
        mem.push_row("notification", row(json!({ "id": "N3", "company_id": "C1", "published_at": "2025-03-01T00:00:00Z" }))).await;

        let filter = RowFilter::new()
            .eq("company_id", "C1")
            .order_by("published_at", crate::backend::SortDirection::Desc);
        let rows = mem.select("notification", filter).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["N3", "N1"]);
    }

    #[tokio::test]
    async fn sign_in_round_trip() {
        let mem = MemoryBackend::new();
        mem.add_account("A1", "admin@firma.test", "password123").await;

        assert!(mem.sign_in("admin@firma.test", "wrong").await.is_err());
        let principal = mem.sign_in("admin@firma.test", "password123").await.unwrap();
        assert_eq!(principal.user_id, "A1");
        assert!(mem.current_principal().await.unwrap().is_some());

        mem.sign_out().await.unwrap();
        assert!(mem.current_principal().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failures_clear() {
        let mem = MemoryBackend::new();
        mem.fail_select_on("user").await;
        assert!(mem.select("user", RowFilter::new()).await.is_err());
        mem.clear_failures().await;
        assert!(mem.select("user", RowFilter::new()).await.is_ok());
    }

    #[tokio::test]
    async fn delete_user_function_removes_account_and_profile() {
        let mem = MemoryBackend::new();
        mem.add_account("U1", "jana@x.sk", "password123").await;
        mem.push_row("user", row(json!({ "id": "U1", "company_id": "C1", "name": "Jana" }))).await;

        mem.invoke("delete-user", json!({ "userId": "U1", "companyId": "C1" }))
            .await
            .unwrap();
        assert_eq!(mem.account_count().await, 0);
        assert!(mem.rows("user").await.is_empty());
    }
}
