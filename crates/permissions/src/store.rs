use crate::error::Result;
use async_trait::async_trait;
use lms_models::{Assignment, AssignmentStatus, NewAssignment};
use sqlx::PgPool;
use uuid::Uuid;

/// Persistence operations the assignment lifecycle depends on.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn insert(&self, assignment: NewAssignment) -> Result<Assignment>;

    async fn list(&self, status: Option<AssignmentStatus>) -> Result<Vec<Assignment>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>>;

    async fn set_status(&self, id: Uuid, status: AssignmentStatus) -> Result<Assignment>;
}

/// Lookups the lesson access check depends on.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Parent course of a lesson, when the lesson exists.
    async fn lesson_course(&self, lesson_id: Uuid) -> Result<Option<Uuid>>;

    async fn has_active_course_assignment(
        &self,
        teacher_id: Uuid,
        course_id: Uuid,
    ) -> Result<bool>;
}

/// Postgres-backed store. The partial unique index on
/// (teacher_id, resource_type, resource_id) for non-revoked rows turns a
/// duplicate live assignment into an insert error.
#[derive(Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for PgPermissionStore {
    async fn insert(&self, assignment: NewAssignment) -> Result<Assignment> {
        let created = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments
                (id, teacher_id, resource_type, resource_id, status, start_at, end_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, teacher_id, resource_type, resource_id, status,
                      start_at, end_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(assignment.teacher_id)
        .bind(assignment.resource_type.as_str())
        .bind(assignment.resource_id)
        .bind(assignment.status.as_str())
        .bind(assignment.start_at)
        .bind(assignment.end_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self, status: Option<AssignmentStatus>) -> Result<Vec<Assignment>> {
        let assignments = match status {
            Some(status) => {
                sqlx::query_as::<_, Assignment>(
                    r#"
                    SELECT id, teacher_id, resource_type, resource_id, status,
                           start_at, end_at, created_at, updated_at
                    FROM assignments
                    WHERE status = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Assignment>(
                    r#"
                    SELECT id, teacher_id, resource_type, resource_id, status,
                           start_at, end_at, created_at, updated_at
                    FROM assignments
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(assignments)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, teacher_id, resource_type, resource_id, status,
                   start_at, end_at, created_at, updated_at
            FROM assignments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn set_status(&self, id: Uuid, status: AssignmentStatus) -> Result<Assignment> {
        let updated = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, teacher_id, resource_type, resource_id, status,
                      start_at, end_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}

#[async_trait]
impl AccessStore for PgPermissionStore {
    async fn lesson_course(&self, lesson_id: Uuid) -> Result<Option<Uuid>> {
        let course_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT course_id
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course_id)
    }

    async fn has_active_course_assignment(
        &self,
        teacher_id: Uuid,
        course_id: Uuid,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM assignments
                WHERE teacher_id = $1
                  AND resource_type = 'course'
                  AND resource_id = $2
                  AND status = 'active'
            )
            "#,
        )
        .bind(teacher_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
