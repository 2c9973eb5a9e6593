pub mod access;
pub mod error;
pub mod lifecycle;
pub mod store;

pub use access::{AccessDecision, LessonAccess};
pub use error::{PermissionError, Result};
pub use lifecycle::{assigned_course_ids, AssignmentLifecycle, BatchReport};
pub use store::{AccessStore, AssignmentStore, PgPermissionStore};
