// Dashboard error taxonomy
use thiserror::Error;

use crate::backend::StoreError;

/// Where the presentation layer should send the operator after a fatal
/// session failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Back to the sign-in page.
    Login,
    /// To the standalone error page (admin account without a company link).
    Error,
}

/// Errors surfaced by the dashboard core.
///
/// Session failures (`Unauthenticated`, `Forbidden`, `ScopeNotFound`) are
/// fatal: the session is invalidated and the operator is redirected. All
/// other variants leave the session alive and the current view intact so
/// the operator can correct the input and retry.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no signed-in account")]
    Unauthenticated,

    #[error("signed-in account has no admin role")]
    Forbidden,

    #[error("admin account is not linked to any company")]
    ScopeNotFound,

    #[error("could not create a login for the new user: {0}")]
    IdentityCreationError(String),

    #[error("department '{0}' does not exist in this company")]
    InvalidDepartment(String),

    #[error("backend request failed: {0}")]
    PersistenceError(String),

    #[error("{0}")]
    ValidationError(String),
}

impl DashboardError {
    /// Redirect target for fatal session failures, `None` for everything
    /// that can be corrected in place.
    pub fn redirect(&self) -> Option<Redirect> {
        match self {
            DashboardError::Unauthenticated | DashboardError::Forbidden => Some(Redirect::Login),
            DashboardError::ScopeNotFound => Some(Redirect::Error),
            _ => None,
        }
    }

    /// True when the current view survives the failure.
    pub fn recoverable(&self) -> bool {
        self.redirect().is_none()
    }
}

impl From<StoreError> for DashboardError {
    fn from(err: StoreError) -> Self {
        DashboardError::PersistenceError(err.to_string())
    }
}
