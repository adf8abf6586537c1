// Entity repositories, one per backend table, all parameterized by the
// company scope. Reads degrade to empty results; writes propagate their
// failures to the interaction that triggered them.
pub mod associations;
pub mod departments;
pub mod notifications;
pub mod users;

pub use associations::{AssociationResolver, SweepReport};
pub use departments::DepartmentRepository;
pub use notifications::NotificationRepository;
pub use users::{Confirmation, DeleteOutcome, UserRepository};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{Row, StoreError};

/// Decode raw rows through the serde schema of the entity type. This is
/// the single mapping point between backend rows and typed entities.
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(StoreError::from))
        .collect()
}

/// Normalize optional form input: trim, collapse empty to `None`.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
