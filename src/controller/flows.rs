// One EntityFlow per entity kind, adapting its repository to the
// controller. Drafts carry exactly the fields the corresponding edit
// form exposes.
use async_trait::async_trait;

use crate::controller::EntityFlow;
use crate::error::DashboardError;
use crate::models::{
    Department, DepartmentChanges, NewUser, Notification, NotificationChanges, User, UserChanges,
};
use crate::repository::{DepartmentRepository, NotificationRepository, UserRepository};
use crate::session::CompanyScope;

pub struct UserFlow {
    repository: UserRepository,
}

impl UserFlow {
    pub fn new(repository: UserRepository) -> Self {
        Self { repository }
    }
}

/// Users are the only kind created through the form, so their draft
/// distinguishes a new profile from an edit of an existing one.
#[derive(Debug, Clone)]
pub enum UserDraft {
    New(NewUser),
    Edit { user_id: String, changes: UserChanges },
}

#[async_trait]
impl EntityFlow for UserFlow {
    type Item = User;
    type Draft = UserDraft;

    fn kind(&self) -> &'static str {
        "users"
    }

    async fn load(&self, scope: &CompanyScope) -> Vec<User> {
        self.repository.list(scope).await
    }

    fn draft_for(&self, item: &User) -> UserDraft {
        UserDraft::Edit {
            user_id: item.id.clone(),
            changes: UserChanges {
                name: item.name.clone(),
                position: item.position.clone(),
                department_id: item.department_id.clone(),
            },
        }
    }

    fn blank_draft(&self) -> Option<UserDraft> {
        Some(UserDraft::New(NewUser::default()))
    }

    async fn save(
        &self,
        scope: &CompanyScope,
        draft: &UserDraft,
    ) -> Result<Option<String>, DashboardError> {
        match draft {
            UserDraft::New(new_user) => {
                let created = self.repository.create(scope, new_user.clone()).await?;
                Ok(Some(format!(
                    "created user {} (temporary password: {})",
                    created.email, created.password
                )))
            }
            UserDraft::Edit { user_id, changes } => {
                self.repository.update(scope, user_id, changes.clone()).await?;
                Ok(None)
            }
        }
    }
}

pub struct NotificationFlow {
    repository: NotificationRepository,
}

impl NotificationFlow {
    pub fn new(repository: NotificationRepository) -> Self {
        Self { repository }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub notification_id: String,
    pub changes: NotificationChanges,
}

#[async_trait]
impl EntityFlow for NotificationFlow {
    type Item = Notification;
    type Draft = NotificationDraft;

    fn kind(&self) -> &'static str {
        "notifications"
    }

    async fn load(&self, scope: &CompanyScope) -> Vec<Notification> {
        self.repository.list(scope).await
    }

    fn draft_for(&self, item: &Notification) -> NotificationDraft {
        NotificationDraft {
            notification_id: item.id.clone(),
            changes: NotificationChanges {
                title: item.title.clone(),
                message: item.message.clone(),
                is_global: item.is_global,
                department_id: item.department_id.clone(),
            },
        }
    }

    async fn save(
        &self,
        scope: &CompanyScope,
        draft: &NotificationDraft,
    ) -> Result<Option<String>, DashboardError> {
        self.repository
            .update(scope, &draft.notification_id, draft.changes.clone())
            .await?;
        Ok(None)
    }
}

pub struct DepartmentFlow {
    repository: DepartmentRepository,
}

impl DepartmentFlow {
    pub fn new(repository: DepartmentRepository) -> Self {
        Self { repository }
    }
}

#[derive(Debug, Clone)]
pub struct DepartmentDraft {
    pub department_id: String,
    pub changes: DepartmentChanges,
}

#[async_trait]
impl EntityFlow for DepartmentFlow {
    type Item = Department;
    type Draft = DepartmentDraft;

    fn kind(&self) -> &'static str {
        "departments"
    }

    async fn load(&self, scope: &CompanyScope) -> Vec<Department> {
        self.repository.list(scope).await
    }

    fn draft_for(&self, item: &Department) -> DepartmentDraft {
        DepartmentDraft {
            department_id: item.id.clone(),
            changes: DepartmentChanges { name: item.name.clone() },
        }
    }

    async fn save(
        &self,
        scope: &CompanyScope,
        draft: &DepartmentDraft,
    ) -> Result<Option<String>, DashboardError> {
        self.repository
            .update(scope, &draft.department_id, draft.changes.clone())
            .await?;
        Ok(None)
    }
}
