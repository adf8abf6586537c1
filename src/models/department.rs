use serde::{Deserialize, Serialize};

/// Department row. Referenced by `User::department_id` and by the
/// notification join relation, never owned by either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub company_id: String,
    pub name: String,
}

impl Department {
    pub const TABLE: &'static str = "department";
}

/// Field set accepted by the department edit form (name only).
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentChanges {
    pub name: String,
}
