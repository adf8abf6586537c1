// Admission checks: authenticate, authorize, resolve the company scope.
mod common;

use anyhow::Result;
use common::{obj, Fixture};
use serde_json::json;

use firma_admin::error::{DashboardError, Redirect};
use firma_admin::models::AdminRole;
use firma_admin::session::SessionGuard;

#[tokio::test]
async fn signed_out_visitor_is_unauthenticated() {
    let fix = Fixture::seeded().await;
    let guard = SessionGuard::new(fix.backend.clone());

    let err = guard.establish().await.unwrap_err();
    assert!(matches!(err, DashboardError::Unauthenticated));
    assert_eq!(err.redirect(), Some(Redirect::Login));
}

#[tokio::test]
async fn account_without_admin_role_is_turned_away() -> Result<()> {
    let fix = Fixture::seeded().await;
    fix.sign_in("employee@firma.test", "password123").await?;

    let guard = SessionGuard::new(fix.backend.clone());
    let err = guard.establish().await.unwrap_err();
    assert!(matches!(err, DashboardError::Forbidden));
    assert_eq!(err.redirect(), Some(Redirect::Login));

    // The rejection also signs the account out.
    assert!(fix.backend.identity.current_principal().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_stored_role_counts_as_no_role() -> Result<()> {
    let fix = Fixture::seeded().await;
    fix.mem
        .push_row(
            "admin",
            obj(json!({ "user_id": "E1", "role": "Manager", "company_id": "C1" })),
        )
        .await;
    fix.sign_in("employee@firma.test", "password123").await?;

    let guard = SessionGuard::new(fix.backend.clone());
    let err = guard.establish().await.unwrap_err();
    assert!(matches!(err, DashboardError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn admin_without_company_link_goes_to_the_error_page() -> Result<()> {
    let fix = Fixture::seeded().await;
    fix.sign_in("orphan@firma.test", "password123").await?;

    let guard = SessionGuard::new(fix.backend.clone());
    let err = guard.establish().await.unwrap_err();
    assert!(matches!(err, DashboardError::ScopeNotFound));
    assert_eq!(err.redirect(), Some(Redirect::Error));

    assert!(fix.backend.identity.current_principal().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn empty_company_link_is_the_same_as_none() -> Result<()> {
    let fix = Fixture::seeded().await;
    fix.mem.add_account("A4", "blank@firma.test", "password123").await;
    fix.mem
        .push_row("admin", obj(json!({ "user_id": "A4", "role": "Company", "company_id": "" })))
        .await;
    fix.sign_in("blank@firma.test", "password123").await?;

    let guard = SessionGuard::new(fix.backend.clone());
    let err = guard.establish().await.unwrap_err();
    assert!(matches!(err, DashboardError::ScopeNotFound));
    Ok(())
}

#[tokio::test]
async fn company_admin_gets_a_scoped_session() -> Result<()> {
    let fix = Fixture::seeded().await;
    fix.sign_in_admin().await?;

    let guard = SessionGuard::new(fix.backend.clone());
    let principal = guard.authenticate().await?;
    assert_eq!(principal.email.as_deref(), Some("admin@firma.test"));

    let role = guard.authorize(&principal).await?;
    assert_eq!(role, AdminRole::Company);

    let scope = guard.resolve_company_scope(&principal).await?;
    assert_eq!(scope.company_id(), "C1");
    assert_eq!(scope.role(), AdminRole::Company);
    assert_eq!(scope.admin_id(), "A1");

    // Still signed in after a successful admission.
    assert!(fix.backend.identity.current_principal().await?.is_some());
    Ok(())
}

#[tokio::test]
async fn admin_lookup_failure_reads_as_forbidden() -> Result<()> {
    let fix = Fixture::seeded().await;
    fix.sign_in_admin().await?;
    fix.mem.fail_select_on("admin").await;

    let guard = SessionGuard::new(fix.backend.clone());
    let err = guard.establish().await.unwrap_err();
    assert!(matches!(err, DashboardError::Forbidden));
    Ok(())
}
