use lms_models::Course;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the published courses of a program. Draft and archived courses
    /// are never assignable and never shown.
    pub async fn list_published_by_program(
        &self,
        program_id: Uuid,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, program_id, name, status, category, age_group,
                   lesson_count, created_at, updated_at
            FROM courses
            WHERE program_id = $1 AND status = 'published'
            ORDER BY name ASC
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, program_id, name, status, category, age_group,
                   lesson_count, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }
}
