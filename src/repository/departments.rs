use serde_json::json;
use tracing::warn;

use crate::backend::{Backend, Row, RowFilter, StoreError};
use crate::error::DashboardError;
use crate::models::{Department, DepartmentChanges};
use crate::repository::decode_rows;
use crate::session::CompanyScope;

pub struct DepartmentRepository {
    backend: Backend,
}

impl DepartmentRepository {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// All departments of the scoped company, degrading to empty on
    /// backend failure.
    pub async fn list(&self, scope: &CompanyScope) -> Vec<Department> {
        match self.fetch(scope).await {
            Ok(departments) => departments,
            Err(err) => {
                warn!(company_id = %scope.company_id(), "department listing failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, scope: &CompanyScope) -> Result<Vec<Department>, StoreError> {
        let filter = RowFilter::new().eq("company_id", scope.company_id());
        let rows = self.backend.rows.select(Department::TABLE, filter).await?;
        decode_rows(rows)
    }

    /// Departments only ever change their name.
    pub async fn update(
        &self,
        scope: &CompanyScope,
        department_id: &str,
        changes: DepartmentChanges,
    ) -> Result<(), DashboardError> {
        let name = changes.name.trim().to_string();
        if name.is_empty() {
            return Err(DashboardError::ValidationError(
                "department name must not be empty".into(),
            ));
        }
        let mut patch = Row::new();
        patch.insert("name".into(), json!(name));

        let filter = RowFilter::new()
            .eq("id", department_id)
            .eq("company_id", scope.company_id());
        self.backend.rows.update(Department::TABLE, filter, patch).await?;
        Ok(())
    }

    /// Existence check scoped to the company, used before user creation
    /// and notification targeting may reference a department.
    pub async fn exists(
        &self,
        scope: &CompanyScope,
        department_id: &str,
    ) -> Result<bool, DashboardError> {
        let filter = RowFilter::new()
            .eq("id", department_id)
            .eq("company_id", scope.company_id());
        let rows = self.backend.rows.select(Department::TABLE, filter).await?;
        Ok(!rows.is_empty())
    }
}
