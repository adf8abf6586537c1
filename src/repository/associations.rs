use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::backend::{Backend, Row, RowFilter};
use crate::error::DashboardError;
use crate::models::Notification;
use crate::repository::decode_rows;
use crate::session::CompanyScope;

/// Keeps the notification/department join relation mirroring the parent
/// notification: exactly one row for a department-scoped notification,
/// none for a global one. Invoked from every notification save; `sweep`
/// repairs rows that drifted through earlier partial failures.
pub struct AssociationResolver {
    backend: Backend,
}

/// Outcome of a reconciliation sweep over one company scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    /// Notifications whose join rows were corrected.
    pub repaired: Vec<String>,
    /// Department-scoped notifications with no join row. The intended
    /// target cannot be inferred; an operator has to re-save them.
    pub unrepairable: Vec<String>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.repaired.is_empty() && self.unrepairable.is_empty()
    }
}

impl AssociationResolver {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Drive the join relation to the desired target, whatever its
    /// current state. Duplicate rows left by earlier partial failures are
    /// collapsed rather than propagated.
    pub async fn reconcile(
        &self,
        notification_id: &str,
        target: Option<&str>,
    ) -> Result<(), DashboardError> {
        let existing = self.join_rows(notification_id).await?;
        match target {
            None => {
                if !existing.is_empty() {
                    self.backend
                        .rows
                        .delete(Notification::JOIN_TABLE, Self::by_notification(notification_id))
                        .await?;
                }
            }
            Some(department_id) => match existing.len() {
                0 => self.insert_row(notification_id, department_id).await?,
                1 => {
                    let mut patch = Row::new();
                    patch.insert("department_id".into(), json!(department_id));
                    self.backend
                        .rows
                        .update(
                            Notification::JOIN_TABLE,
                            Self::by_notification(notification_id),
                            patch,
                        )
                        .await?;
                }
                count => {
                    warn!(
                        notification_id = %notification_id,
                        rows = count,
                        "collapsing duplicate join rows"
                    );
                    self.backend
                        .rows
                        .delete(Notification::JOIN_TABLE, Self::by_notification(notification_id))
                        .await?;
                    self.insert_row(notification_id, department_id).await?;
                }
            },
        }
        Ok(())
    }

    /// Repair the join relation across the whole company: drop rows
    /// attached to global notifications, collapse duplicates, and report
    /// department-scoped notifications whose join row is missing.
    pub async fn sweep(&self, scope: &CompanyScope) -> Result<SweepReport, DashboardError> {
        let filter = RowFilter::new().eq("company_id", scope.company_id());
        let rows = self.backend.rows.select(Notification::TABLE, filter).await?;
        let notifications: Vec<Notification> = decode_rows(rows)?;

        let ids: Vec<String> = notifications.iter().map(|n| n.id.clone()).collect();
        let mut linked: HashMap<String, Vec<String>> = HashMap::new();
        if !ids.is_empty() {
            let join_filter = RowFilter::new().any_of("notification_id", &ids);
            let join_rows =
                self.backend.rows.select(Notification::JOIN_TABLE, join_filter).await?;
            for row in join_rows {
                let notification_id = row.get("notification_id").and_then(Value::as_str);
                let department_id = row.get("department_id").and_then(Value::as_str);
                if let (Some(nid), Some(did)) = (notification_id, department_id) {
                    linked.entry(nid.to_string()).or_default().push(did.to_string());
                }
            }
        }

        let mut report = SweepReport::default();
        for notification in &notifications {
            let departments =
                linked.get(notification.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            if notification.is_global {
                if !departments.is_empty() {
                    self.reconcile(&notification.id, None).await?;
                    report.repaired.push(notification.id.clone());
                }
            } else {
                match departments.len() {
                    0 => report.unrepairable.push(notification.id.clone()),
                    1 => {}
                    _ => {
                        let keep = departments[0].clone();
                        self.reconcile(&notification.id, Some(&keep)).await?;
                        report.repaired.push(notification.id.clone());
                    }
                }
            }
        }

        if !report.is_clean() {
            info!(
                company_id = %scope.company_id(),
                repaired = report.repaired.len(),
                unrepairable = report.unrepairable.len(),
                "join relation sweep finished"
            );
        }
        Ok(report)
    }

    async fn join_rows(&self, notification_id: &str) -> Result<Vec<Row>, DashboardError> {
        Ok(self
            .backend
            .rows
            .select(Notification::JOIN_TABLE, Self::by_notification(notification_id))
            .await?)
    }

    async fn insert_row(
        &self,
        notification_id: &str,
        department_id: &str,
    ) -> Result<(), DashboardError> {
        let mut row = Row::new();
        row.insert("notification_id".into(), json!(notification_id));
        row.insert("department_id".into(), json!(department_id));
        Ok(self.backend.rows.insert(Notification::JOIN_TABLE, row).await?)
    }

    fn by_notification(notification_id: &str) -> RowFilter {
        RowFilter::new().eq("notification_id", notification_id)
    }
}
