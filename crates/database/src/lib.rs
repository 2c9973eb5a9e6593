pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{Database, DatabaseConfig};
pub use error::{DatabaseError, Result};
pub use repositories::{
    courses::CourseRepository,
    lessons::LessonRepository,
    users::UserRepository,
};
