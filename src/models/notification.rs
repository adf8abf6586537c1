use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company notification. The department association lives in a separate
/// join relation (`notification_department`), one row when the
/// notification targets a department and zero rows when it is global;
/// `department_id` here is merged in from that relation at load time and
/// is never a column of the notification table itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub message: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub is_global: bool,
    #[serde(default)]
    pub department_id: Option<String>,
}

impl Notification {
    pub const TABLE: &'static str = "notification";
    pub const JOIN_TABLE: &'static str = "notification_department";
}

/// Field set accepted by the notification edit form. `published_at` and
/// `created_by` are fixed at publication and never editable here.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationChanges {
    pub title: String,
    pub message: String,
    pub is_global: bool,
    pub department_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_row_without_join_fields() {
        let row = json!({
            "id": "N1",
            "company_id": "C1",
            "title": "Maintenance window",
            "message": "Saturday 22:00",
            "published_at": "2025-03-01T09:00:00Z",
            "updated_at": null,
            "created_by": "A1",
            "is_global": true
        });
        let notification: Notification = serde_json::from_value(row).unwrap();
        assert!(notification.is_global);
        assert!(notification.department_id.is_none());
        assert!(notification.updated_at.is_none());
    }

    #[test]
    fn decodes_timestamp_with_offset() {
        let row = json!({
            "id": "N2",
            "company_id": "C1",
            "title": "Payroll",
            "message": "Closed on Friday",
            "published_at": "2025-03-05T14:30:00+02:00",
            "is_global": false
        });
        let notification: Notification = serde_json::from_value(row).unwrap();
        assert_eq!(notification.published_at.timezone(), Utc);
    }
}
