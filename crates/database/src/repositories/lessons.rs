use lms_models::{Lesson, LessonMaterial, NewLessonMaterial};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LessonRepository {
    pool: PgPool,
}

impl LessonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>, sqlx::Error> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, course_id, title, position, created_at, updated_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    /// Record an uploaded file against a lesson
    pub async fn insert_material(
        &self,
        material: NewLessonMaterial,
        uploaded_by: Uuid,
    ) -> Result<LessonMaterial, sqlx::Error> {
        let material = sqlx::query_as::<_, LessonMaterial>(
            r#"
            INSERT INTO lesson_materials (id, lesson_id, file_name, content_type, size_bytes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, lesson_id, file_name, content_type, size_bytes, uploaded_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(material.lesson_id)
        .bind(material.file_name)
        .bind(material.content_type)
        .bind(material.size_bytes)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(material)
    }
}
