pub mod auth;
pub mod lesson_access;
pub mod rate_limit;

pub use auth::{require_admin, require_auth, AuthUser};
pub use lesson_access::require_lesson_access;
pub use rate_limit::{upload_rate_limit, UploadRateGuard};
