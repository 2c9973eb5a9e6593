use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// File attached to a lesson by a teacher or admin
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonMaterial {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLessonMaterial {
    pub lesson_id: Uuid,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    #[validate(length(min = 1, max = 127))]
    pub content_type: String,

    #[validate(range(min = 1))]
    pub size_bytes: i64,
}
