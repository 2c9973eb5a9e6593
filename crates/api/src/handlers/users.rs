use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use lms_models::{User, UserRole};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// List users, optionally filtered by role. The assignment modal uses
/// `role=teacher` to populate its teacher selector.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UsersResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.users.list(query.role).await {
        Ok(users) => Ok(Json(UsersResponse { users })),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("list_users_failed", &e.to_string())),
            ))
        }
    }
}
