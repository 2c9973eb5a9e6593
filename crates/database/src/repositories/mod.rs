pub mod courses;
pub mod lessons;
pub mod users;
