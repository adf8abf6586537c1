use serde::Deserialize;

/// Row of the admin capability table linking an auth principal to the
/// company it may administer.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminRecord {
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

impl AdminRecord {
    pub const TABLE: &'static str = "admin";
}

/// Admin roles accepted by the dashboard. Any other stored value is
/// treated the same as no role at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    Company,
    Department,
}

impl AdminRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Company" => Some(AdminRole::Company),
            "Department" => Some(AdminRole::Department),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Company => "Company",
            AdminRole::Department => "Department",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_only() {
        assert_eq!(AdminRole::parse("Company"), Some(AdminRole::Company));
        assert_eq!(AdminRole::parse("Department"), Some(AdminRole::Department));
        assert_eq!(AdminRole::parse("company"), None);
        assert_eq!(AdminRole::parse("Employee"), None);
        assert_eq!(AdminRole::parse(""), None);
    }
}
