pub mod admin;
pub mod department;
pub mod notification;
pub mod user;

pub use admin::{AdminRecord, AdminRole};
pub use department::{Department, DepartmentChanges};
pub use notification::{Notification, NotificationChanges};
pub use user::{CreatedUser, NewUser, User, UserChanges};
