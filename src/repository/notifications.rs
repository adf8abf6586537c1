use std::collections::HashMap;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::backend::{Backend, Row, RowFilter, SortDirection, StoreError};
use crate::error::DashboardError;
use crate::models::{Notification, NotificationChanges};
use crate::repository::{
    blank_to_none, decode_rows, AssociationResolver, DepartmentRepository,
};
use crate::session::CompanyScope;

pub struct NotificationRepository {
    backend: Backend,
}

impl NotificationRepository {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Notifications of the scoped company, newest first, with the
    /// department target merged in from the join relation. Degrades to
    /// empty on backend failure.
    pub async fn list(&self, scope: &CompanyScope) -> Vec<Notification> {
        match self.fetch(scope).await {
            Ok(notifications) => notifications,
            Err(err) => {
                warn!(company_id = %scope.company_id(), "notification listing failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, scope: &CompanyScope) -> Result<Vec<Notification>, StoreError> {
        let filter = RowFilter::new()
            .eq("company_id", scope.company_id())
            .order_by("published_at", SortDirection::Desc);
        let rows = self.backend.rows.select(Notification::TABLE, filter).await?;
        let mut notifications: Vec<Notification> = decode_rows(rows)?;

        let ids: Vec<String> = notifications.iter().map(|n| n.id.clone()).collect();
        if ids.is_empty() {
            return Ok(notifications);
        }
        let join_filter = RowFilter::new().any_of("notification_id", &ids);
        let join_rows = self.backend.rows.select(Notification::JOIN_TABLE, join_filter).await?;

        // First row wins should duplicates exist; the sweep collapses them.
        let mut targets: HashMap<String, String> = HashMap::new();
        for row in join_rows {
            let notification_id = row.get("notification_id").and_then(Value::as_str);
            let department_id = row.get("department_id").and_then(Value::as_str);
            if let (Some(nid), Some(did)) = (notification_id, department_id) {
                targets.entry(nid.to_string()).or_insert_with(|| did.to_string());
            }
        }
        for notification in &mut notifications {
            notification.department_id = targets.get(&notification.id).cloned();
        }
        Ok(notifications)
    }

    /// Validate, persist the notification's own fields, then reconcile
    /// the join relation so it mirrors the new targeting. A failure after
    /// the field update leaves the join relation behind; the
    /// reconciliation sweep repairs that drift later.
    pub async fn update(
        &self,
        scope: &CompanyScope,
        notification_id: &str,
        changes: NotificationChanges,
    ) -> Result<(), DashboardError> {
        let title = changes.title.trim().to_string();
        if title.is_empty() {
            return Err(DashboardError::ValidationError("title must not be empty".into()));
        }
        let department_id = blank_to_none(changes.department_id);
        let target = if changes.is_global {
            // A global notification drops whatever department the form
            // still carried.
            None
        } else {
            match department_id {
                Some(id) => Some(id),
                None => {
                    return Err(DashboardError::ValidationError(
                        "a department-scoped notification needs a department".into(),
                    ));
                }
            }
        };
        if let Some(target_id) = &target {
            let departments = DepartmentRepository::new(self.backend.clone());
            if !departments.exists(scope, target_id).await? {
                return Err(DashboardError::InvalidDepartment(target_id.clone()));
            }
        }

        let mut patch = Row::new();
        patch.insert("title".into(), json!(title));
        patch.insert("message".into(), json!(changes.message));
        patch.insert("is_global".into(), json!(changes.is_global));
        patch.insert("updated_at".into(), json!(Utc::now()));

        let filter = RowFilter::new()
            .eq("id", notification_id)
            .eq("company_id", scope.company_id());
        self.backend.rows.update(Notification::TABLE, filter, patch).await?;

        let resolver = AssociationResolver::new(self.backend.clone());
        resolver.reconcile(notification_id, target.as_deref()).await
    }
}
