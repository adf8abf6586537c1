// User repository: scoped listing and the two-phase create protocol.
mod common;

use anyhow::Result;
use common::Fixture;
use serde_json::Value;

use firma_admin::error::DashboardError;
use firma_admin::models::{NewUser, UserChanges};
use firma_admin::repository::{Confirmation, DeleteOutcome};

fn jana() -> NewUser {
    NewUser {
        name: "Jana Vesel".to_string(),
        email: "jana@firma.test".to_string(),
        password: "secret12".to_string(),
        position: None,
        department_id: None,
    }
}

#[tokio::test]
async fn lists_only_the_scoped_company() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let users = dashboard.users().list(dashboard.scope()).await;
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["U1", "U2"]);
    Ok(())
}

#[tokio::test]
async fn listing_degrades_to_empty_on_backend_failure() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;
    fix.mem.fail_select_on("user").await;

    assert!(dashboard.users().list(dashboard.scope()).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_makes_a_login_then_a_profile_row() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let created = dashboard.users().create(dashboard.scope(), jana()).await?;
    assert_eq!(created.email, "jana@firma.test");
    assert_eq!(created.password, "secret12");
    assert!(fix.mem.has_account("jana@firma.test").await);

    let rows = fix.mem.rows("user").await;
    let row = rows
        .iter()
        .find(|r| r.get("id").and_then(Value::as_str) == Some(created.user_id.as_str()))
        .expect("profile row");
    assert_eq!(row.get("company_id"), Some(&Value::from("C1")));
    assert_eq!(row.get("name"), Some(&Value::from("Jana Vesel")));
    assert_eq!(row.get("position"), Some(&Value::Null));
    assert_eq!(row.get("phone"), Some(&Value::Null));
    assert_eq!(row.get("department_id"), Some(&Value::Null));
    assert_eq!(row.get("avatar_url"), Some(&Value::Null));
    Ok(())
}

#[tokio::test]
async fn create_trims_and_rejects_blank_required_fields() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    for (field, new_user) in [
        ("name", NewUser { name: "   ".to_string(), ..jana() }),
        ("email", NewUser { email: String::new(), ..jana() }),
        ("password", NewUser { password: " ".to_string(), ..jana() }),
    ] {
        let err = dashboard.users().create(dashboard.scope(), new_user).await.unwrap_err();
        assert!(matches!(err, DashboardError::ValidationError(_)), "field: {field}");
    }

    assert!(!fix.mem.has_account("jana@firma.test").await);
    Ok(())
}

#[tokio::test]
async fn unknown_department_aborts_before_any_side_effect() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;
    let accounts_before = fix.mem.account_count().await;
    let rows_before = fix.mem.rows("user").await.len();

    // D9 exists, but in the other company.
    let new_user = NewUser { department_id: Some("D9".to_string()), ..jana() };
    let err = dashboard.users().create(dashboard.scope(), new_user).await.unwrap_err();
    assert!(matches!(err, DashboardError::InvalidDepartment(ref id) if id == "D9"));

    assert_eq!(fix.mem.account_count().await, accounts_before);
    assert_eq!(fix.mem.rows("user").await.len(), rows_before);
    Ok(())
}

#[tokio::test]
async fn identity_rejection_surfaces_as_identity_creation_error() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let duplicate = NewUser { email: "employee@firma.test".to_string(), ..jana() };
    let err = dashboard.users().create(dashboard.scope(), duplicate).await.unwrap_err();
    assert!(matches!(err, DashboardError::IdentityCreationError(_)));
    assert!(err.to_string().contains("User already registered"));
    Ok(())
}

#[tokio::test]
async fn failed_profile_insert_removes_the_fresh_identity() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;
    let accounts_before = fix.mem.account_count().await;
    fix.mem.fail_insert_on("user").await;

    let err = dashboard.users().create(dashboard.scope(), jana()).await.unwrap_err();
    assert!(matches!(err, DashboardError::PersistenceError(_)));

    // The compensating delete took the just-created login with it.
    assert_eq!(fix.mem.account_count().await, accounts_before);
    assert!(!fix.mem.has_account("jana@firma.test").await);
    Ok(())
}

#[tokio::test]
async fn update_patches_profile_fields() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let changes = UserChanges {
        name: "Ana K.".to_string(),
        position: Some("  ".to_string()),
        department_id: Some("D2".to_string()),
    };
    dashboard.users().update(dashboard.scope(), "U1", changes).await?;

    let rows = fix.mem.rows("user").await;
    let row = rows
        .iter()
        .find(|r| r.get("id").and_then(Value::as_str) == Some("U1"))
        .expect("U1");
    assert_eq!(row.get("name"), Some(&Value::from("Ana K.")));
    // Blank position clears the field.
    assert_eq!(row.get("position"), Some(&Value::Null));
    assert_eq!(row.get("department_id"), Some(&Value::from("D2")));
    Ok(())
}

#[tokio::test]
async fn update_rejects_blank_name() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let changes = UserChanges { name: "  ".to_string(), position: None, department_id: None };
    let err = dashboard.users().update(dashboard.scope(), "U1", changes).await.unwrap_err();
    assert!(matches!(err, DashboardError::ValidationError(_)));
    Ok(())
}

#[tokio::test]
async fn update_never_reaches_across_companies() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let changes =
        UserChanges { name: "Hijacked".to_string(), position: None, department_id: None };
    dashboard.users().update(dashboard.scope(), "U9", changes).await?;

    let rows = fix.mem.rows("user").await;
    let row = rows
        .iter()
        .find(|r| r.get("id").and_then(Value::as_str) == Some("U9"))
        .expect("U9");
    assert_eq!(row.get("name"), Some(&Value::from("Cilka Zupan")));
    Ok(())
}

#[tokio::test]
async fn declined_confirmation_is_a_no_op() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let outcome =
        dashboard.users().delete(dashboard.scope(), "U1", Confirmation::Declined).await?;
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(fix.mem.rows("user").await.len(), 3);
    Ok(())
}

#[tokio::test]
async fn confirmed_delete_goes_through_the_privileged_function() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;

    let outcome =
        dashboard.users().delete(dashboard.scope(), "U1", Confirmation::Confirmed).await?;
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(!fix.ids("user", "id").await.contains(&"U1".to_string()));
    Ok(())
}

#[tokio::test]
async fn delete_failure_leaves_the_user_in_place() -> Result<()> {
    let fix = Fixture::seeded().await;
    let dashboard = fix.dashboard().await?;
    fix.mem.fail_function("delete-user").await;

    let err = dashboard
        .users()
        .delete(dashboard.scope(), "U1", Confirmation::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::PersistenceError(_)));
    assert!(fix.ids("user", "id").await.contains(&"U1".to_string()));
    Ok(())
}
