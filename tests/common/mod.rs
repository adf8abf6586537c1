#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Value};

use firma_admin::backend::Backend;
use firma_admin::backend::Row;
use firma_admin::dashboard::Dashboard;
use firma_admin::testing::MemoryBackend;

/// Unwrap a JSON object literal into a raw row.
pub fn obj(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// One company (C1) with an admin, two departments, two users and two
/// notifications, plus a second company (C2) that must never leak into
/// C1's views. The `mem` handle seeds and inspects state; `backend` is
/// what the dashboard runs against.
pub struct Fixture {
    pub mem: MemoryBackend,
    pub backend: Backend,
}

impl Fixture {
    pub async fn seeded() -> Self {
        let mem = MemoryBackend::new();
        let backend = mem.backend();

        mem.add_account("A1", "admin@firma.test", "password123").await;
        mem.add_account("E1", "employee@firma.test", "password123").await;
        mem.add_account("A3", "orphan@firma.test", "password123").await;

        mem.push_row(
            "admin",
            obj(json!({ "user_id": "A1", "role": "Company", "company_id": "C1" })),
        )
        .await;
        mem.push_row(
            "admin",
            obj(json!({ "user_id": "A3", "role": "Department", "company_id": null })),
        )
        .await;

        mem.push_row(
            "department",
            obj(json!({ "id": "D1", "company_id": "C1", "name": "Engineering" })),
        )
        .await;
        mem.push_row(
            "department",
            obj(json!({ "id": "D2", "company_id": "C1", "name": "Sales" })),
        )
        .await;
        mem.push_row(
            "department",
            obj(json!({ "id": "D9", "company_id": "C2", "name": "Operations" })),
        )
        .await;

        mem.push_row(
            "user",
            obj(json!({
                "id": "U1", "company_id": "C1", "name": "Ana Kralj",
                "position": "Engineer", "phone": "555-0101",
                "department_id": "D1", "avatar_url": null
            })),
        )
        .await;
        mem.push_row(
            "user",
            obj(json!({
                "id": "U2", "company_id": "C1", "name": "Bor Novak",
                "position": null, "phone": null,
                "department_id": null, "avatar_url": null
            })),
        )
        .await;
        mem.push_row(
            "user",
            obj(json!({
                "id": "U9", "company_id": "C2", "name": "Cilka Zupan",
                "position": null, "phone": null,
                "department_id": null, "avatar_url": null
            })),
        )
        .await;

        mem.push_row(
            "notification",
            obj(json!({
                "id": "N1", "company_id": "C1", "title": "All hands",
                "message": "Friday at ten.",
                "published_at": "2026-08-10T09:00:00Z", "updated_at": null,
                "created_by": "A1", "is_global": true
            })),
        )
        .await;
        mem.push_row(
            "notification",
            obj(json!({
                "id": "N2", "company_id": "C1", "title": "Deploy freeze",
                "message": "No deploys this week.",
                "published_at": "2026-08-12T09:00:00Z", "updated_at": null,
                "created_by": "A1", "is_global": false
            })),
        )
        .await;
        mem.push_row(
            "notification_department",
            obj(json!({ "notification_id": "N2", "department_id": "D1" })),
        )
        .await;

        Self { mem, backend }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        self.backend.identity.sign_in(email, password).await?;
        Ok(())
    }

    pub async fn sign_in_admin(&self) -> Result<()> {
        self.sign_in("admin@firma.test", "password123").await
    }

    /// Sign in the company admin and run the admission checks.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        self.sign_in_admin().await?;
        Ok(Dashboard::initialize(self.backend.clone()).await?)
    }

    /// Ids of a table's rows, in storage order.
    pub async fn ids(&self, table: &str, column: &str) -> Vec<String> {
        self.mem
            .rows(table)
            .await
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_str).map(str::to_string))
            .collect()
    }
}
