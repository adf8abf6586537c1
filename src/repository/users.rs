use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::backend::{Backend, Row, RowFilter, StoreError};
use crate::error::DashboardError;
use crate::models::{CreatedUser, NewUser, User, UserChanges};
use crate::repository::{blank_to_none, decode_rows, DepartmentRepository};
use crate::session::CompanyScope;

/// Explicit operator answer to the delete prompt. There is no default:
/// anything short of a positive answer is `Declined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub struct UserRepository {
    backend: Backend,
}

impl UserRepository {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// All users of the scoped company. Backend failures degrade to an
    /// empty list, logged only; the view simply shows nothing.
    pub async fn list(&self, scope: &CompanyScope) -> Vec<User> {
        match self.fetch(scope).await {
            Ok(users) => users,
            Err(err) => {
                warn!(company_id = %scope.company_id(), "user listing failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, scope: &CompanyScope) -> Result<Vec<User>, StoreError> {
        let filter = RowFilter::new().eq("company_id", scope.company_id());
        let rows = self.backend.rows.select(User::TABLE, filter).await?;
        decode_rows(rows)
    }

    /// Two-phase creation: a login identity first, then the profile row
    /// keyed by the identity's generated id. All validation happens
    /// before the first side effect; a failed profile insert triggers a
    /// compensating privileged delete of the fresh identity.
    pub async fn create(
        &self,
        scope: &CompanyScope,
        new_user: NewUser,
    ) -> Result<CreatedUser, DashboardError> {
        let name = new_user.name.trim().to_string();
        let email = new_user.email.trim().to_string();
        let password = new_user.password.trim().to_string();
        if name.is_empty() {
            return Err(DashboardError::ValidationError("name must not be empty".into()));
        }
        if email.is_empty() {
            return Err(DashboardError::ValidationError("email must not be empty".into()));
        }
        if password.is_empty() {
            return Err(DashboardError::ValidationError("password must not be empty".into()));
        }
        let position = blank_to_none(new_user.position);
        let department_id = blank_to_none(new_user.department_id);

        if let Some(department_id) = &department_id {
            let departments = DepartmentRepository::new(self.backend.clone());
            if !departments.exists(scope, department_id).await? {
                return Err(DashboardError::InvalidDepartment(department_id.clone()));
            }
        }

        let identity = self
            .backend
            .identity
            .create_identity(&email, &password)
            .await
            .map_err(|err| DashboardError::IdentityCreationError(err.to_string()))?;

        let mut row = Row::new();
        row.insert("id".into(), json!(identity.user_id));
        row.insert("company_id".into(), json!(scope.company_id()));
        row.insert("name".into(), json!(name));
        row.insert("position".into(), position.as_deref().map_or(Value::Null, Value::from));
        row.insert("phone".into(), Value::Null);
        row.insert(
            "department_id".into(),
            department_id.as_deref().map_or(Value::Null, Value::from),
        );
        row.insert("avatar_url".into(), Value::Null);

        if let Err(err) = self.backend.rows.insert(User::TABLE, row).await {
            warn!(
                user_id = %identity.user_id,
                "profile insert failed after identity creation: {}", err
            );
            self.compensate_identity(scope, &identity.user_id).await;
            return Err(err.into());
        }

        info!(user_id = %identity.user_id, company_id = %scope.company_id(), "created user");
        Ok(CreatedUser { user_id: identity.user_id, email, password })
    }

    /// Remove the identity created by a failed two-phase create so no
    /// orphaned login is left behind. When even this fails the orphan is
    /// logged and needs manual cleanup.
    async fn compensate_identity(&self, scope: &CompanyScope, user_id: &str) {
        let payload = json!({ "userId": user_id, "companyId": scope.company_id() });
        match self.backend.functions.invoke("delete-user", payload).await {
            Ok(_) => info!(user_id = %user_id, "removed identity after failed profile insert"),
            Err(err) => {
                error!(
                    user_id = %user_id,
                    "orphaned identity left behind, compensating delete failed: {}", err
                );
            }
        }
    }

    /// Partial profile update: name, position and department assignment.
    pub async fn update(
        &self,
        scope: &CompanyScope,
        user_id: &str,
        changes: UserChanges,
    ) -> Result<(), DashboardError> {
        let name = changes.name.trim().to_string();
        if name.is_empty() {
            return Err(DashboardError::ValidationError("name must not be empty".into()));
        }
        let position = blank_to_none(changes.position);
        let department_id = blank_to_none(changes.department_id);

        let mut patch = Row::new();
        patch.insert("name".into(), json!(name));
        patch.insert("position".into(), position.as_deref().map_or(Value::Null, Value::from));
        patch.insert(
            "department_id".into(),
            department_id.as_deref().map_or(Value::Null, Value::from),
        );

        let filter = RowFilter::new().eq("id", user_id).eq("company_id", scope.company_id());
        self.backend.rows.update(User::TABLE, filter, patch).await?;
        Ok(())
    }

    /// Delete a user via the privileged `delete-user` function; the
    /// dashboard has no direct delete permission on the profile table.
    /// A declined confirmation is a no-op.
    pub async fn delete(
        &self,
        scope: &CompanyScope,
        user_id: &str,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, DashboardError> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }
        let payload = json!({ "userId": user_id, "companyId": scope.company_id() });
        self.backend.functions.invoke("delete-user", payload).await?;
        info!(user_id = %user_id, company_id = %scope.company_id(), "deleted user");
        Ok(DeleteOutcome::Deleted)
    }
}
