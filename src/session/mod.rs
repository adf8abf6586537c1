// Session guard: authenticates the principal, checks the admin role and
// resolves the single company scope everything else is parameterized by.
use serde_json::Value;
use tracing::warn;

use crate::backend::{Backend, Principal, RowFilter};
use crate::error::DashboardError;
use crate::models::{AdminRecord, AdminRole};

/// Read/write capability for exactly one company, minted by the guard at
/// session start and read-only afterwards. Every repository call takes
/// it explicitly; there is no ambient current-company state.
#[derive(Debug, Clone)]
pub struct CompanyScope {
    company_id: String,
    role: AdminRole,
    admin_id: String,
}

impl CompanyScope {
    pub(crate) fn new(company_id: String, role: AdminRole, admin_id: String) -> Self {
        Self { company_id, role, admin_id }
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn role(&self) -> AdminRole {
        self.role
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }
}

pub struct SessionGuard {
    backend: Backend,
}

impl SessionGuard {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// `Unauthenticated` unless an active principal exists. A failing
    /// principal lookup reads the same as no session.
    pub async fn authenticate(&self) -> Result<Principal, DashboardError> {
        match self.backend.identity.current_principal().await {
            Ok(Some(principal)) => Ok(principal),
            Ok(None) => Err(DashboardError::Unauthenticated),
            Err(err) => {
                warn!("principal lookup failed: {}", err);
                Err(DashboardError::Unauthenticated)
            }
        }
    }

    /// `Forbidden` unless the principal holds an admin role. The session
    /// is invalidated on failure so a plain employee account cannot stay
    /// signed in at the dashboard boundary.
    pub async fn authorize(&self, principal: &Principal) -> Result<AdminRole, DashboardError> {
        let record = match self.admin_record(principal).await {
            Some(record) => record,
            None => {
                self.invalidate().await;
                return Err(DashboardError::Forbidden);
            }
        };
        match AdminRole::parse(&record.role) {
            Some(role) => Ok(role),
            None => {
                warn!(user_id = %principal.user_id, role = %record.role, "unrecognized admin role");
                self.invalidate().await;
                Err(DashboardError::Forbidden)
            }
        }
    }

    /// Resolve the company bound to this admin. An admin row without a
    /// company link is fatal: `ScopeNotFound`, session invalidated, and
    /// the caller redirects to the error page.
    pub async fn resolve_company_scope(
        &self,
        principal: &Principal,
    ) -> Result<CompanyScope, DashboardError> {
        let record = match self.admin_record(principal).await {
            Some(record) => record,
            None => {
                self.invalidate().await;
                return Err(DashboardError::Forbidden);
            }
        };
        let role = match AdminRole::parse(&record.role) {
            Some(role) => role,
            None => {
                self.invalidate().await;
                return Err(DashboardError::Forbidden);
            }
        };
        match record.company_id {
            Some(company_id) if !company_id.is_empty() => {
                Ok(CompanyScope::new(company_id, role, principal.user_id.clone()))
            }
            _ => {
                warn!(user_id = %principal.user_id, "admin record has no company link");
                self.invalidate().await;
                Err(DashboardError::ScopeNotFound)
            }
        }
    }

    /// Full session establishment chain, run once at dashboard start.
    pub async fn establish(&self) -> Result<CompanyScope, DashboardError> {
        let principal = self.authenticate().await?;
        self.authorize(&principal).await?;
        self.resolve_company_scope(&principal).await
    }

    /// Admin row for the principal; any lookup failure reads as absent.
    async fn admin_record(&self, principal: &Principal) -> Option<AdminRecord> {
        let filter = RowFilter::new().eq("user_id", principal.user_id.as_str());
        let rows = match self.backend.rows.select(AdminRecord::TABLE, filter).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(user_id = %principal.user_id, "admin lookup failed: {}", err);
                return None;
            }
        };
        let row = rows.into_iter().next()?;
        match serde_json::from_value::<AdminRecord>(Value::Object(row)) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(user_id = %principal.user_id, "malformed admin row: {}", err);
                None
            }
        }
    }

    async fn invalidate(&self) {
        if let Err(err) = self.backend.identity.sign_out().await {
            warn!("sign-out during session invalidation failed: {}", err);
        }
    }
}
