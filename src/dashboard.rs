// Session bootstrap and wiring: establish the company scope once, then
// hand out repositories and controllers parameterized by it.
use tracing::info;

use crate::backend::Backend;
use crate::controller::{
    DepartmentFlow, ListDetailController, NotificationFlow, UserFlow,
};
use crate::error::DashboardError;
use crate::repository::{
    AssociationResolver, DepartmentRepository, NotificationRepository, UserRepository,
};
use crate::session::{CompanyScope, SessionGuard};

pub struct Dashboard {
    backend: Backend,
    scope: CompanyScope,
}

impl Dashboard {
    /// Run the full session guard chain and wire the dashboard to the
    /// resolved company scope. Fails with the guard's error when the
    /// session cannot be established; the caller handles the redirect.
    pub async fn initialize(backend: Backend) -> Result<Self, DashboardError> {
        let guard = SessionGuard::new(backend.clone());
        let scope = guard.establish().await?;
        info!(
            company_id = %scope.company_id(),
            role = scope.role().as_str(),
            "dashboard session established"
        );
        Ok(Self { backend, scope })
    }

    pub fn scope(&self) -> &CompanyScope {
        &self.scope
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.backend.clone())
    }

    pub fn notifications(&self) -> NotificationRepository {
        NotificationRepository::new(self.backend.clone())
    }

    pub fn departments(&self) -> DepartmentRepository {
        DepartmentRepository::new(self.backend.clone())
    }

    pub fn resolver(&self) -> AssociationResolver {
        AssociationResolver::new(self.backend.clone())
    }

    pub fn users_controller(&self) -> ListDetailController<UserFlow> {
        ListDetailController::new(UserFlow::new(self.users()), self.scope.clone())
    }

    pub fn notifications_controller(&self) -> ListDetailController<NotificationFlow> {
        ListDetailController::new(NotificationFlow::new(self.notifications()), self.scope.clone())
    }

    pub fn departments_controller(&self) -> ListDetailController<DepartmentFlow> {
        ListDetailController::new(DepartmentFlow::new(self.departments()), self.scope.clone())
    }
}
