use serde::{Deserialize, Serialize};

/// Employee profile row. Optional fields are stored as nulls; the
/// presentation layer substitutes its own placeholder when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    pub const TABLE: &'static str = "user";
}

/// Input for the two-phase creation workflow: a login identity first,
/// then a profile row keyed by the identity's generated id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub position: Option<String>,
    pub department_id: Option<String>,
}

/// Field set accepted by the user edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct UserChanges {
    pub name: String,
    pub position: Option<String>,
    pub department_id: Option<String>,
}

/// Credentials echoed back to the operator after a successful creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedUser {
    pub user_id: String,
    pub email: String,
    pub password: String,
}
