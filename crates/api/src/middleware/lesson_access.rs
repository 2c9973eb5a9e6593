use crate::handlers::ErrorResponse;
use crate::middleware::AuthUser;
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use lms_permissions::AccessDecision;
use std::sync::Arc;
use uuid::Uuid;

/// Middleware gating lesson reads behind an active course assignment.
/// Runs after `require_auth`; the two denial outcomes stay distinct so
/// a broken lesson reference is not mistaken for a permission problem.
pub async fn require_lesson_access(
    State(state): State<Arc<crate::AppState>>,
    Path(lesson_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let user = request.extensions().get::<AuthUser>().cloned().ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "unauthenticated",
                "Authentication is required",
            )),
        )
    })?;

    let decision = state
        .access
        .check(user.user_id, user.role, lesson_id)
        .await
        .map_err(|e| {
            tracing::error!("Lesson access check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("access_check_failed", &e.to_string())),
            )
        })?;

    match decision {
        AccessDecision::Granted => Ok(next.run(request).await),
        AccessDecision::LessonNotFound => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("lesson_not_found", "Lesson does not exist")),
        )),
        AccessDecision::NotAssigned => {
            tracing::warn!(
                "User {} denied access to lesson {}: no active assignment",
                user.user_id,
                lesson_id
            );
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new(
                    "course_not_assigned",
                    "No active assignment covers this lesson's course",
                )),
            ))
        }
    }
}
