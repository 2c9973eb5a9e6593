use lms_models::{User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List users, optionally narrowed to a single role
    pub async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, sqlx::Error> {
        let users = match role {
            Some(role) => {
                sqlx::query_as::<_, User>(
                    r#"
                    SELECT id, full_name, email, role, created_at
                    FROM users
                    WHERE role = $1
                    ORDER BY full_name ASC
                    "#,
                )
                .bind(role.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(
                    r#"
                    SELECT id, full_name, email, role, created_at
                    FROM users
                    ORDER BY full_name ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(users)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
