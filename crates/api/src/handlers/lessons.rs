use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lms_models::Lesson;
use std::sync::Arc;
use uuid::Uuid;

/// Fetch one lesson. The access-control middleware has already resolved
/// assignment coverage for non-admin principals; admins reach this
/// handler unchecked, so a missing lesson still returns 404 here.
pub async fn get_lesson(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Lesson>, (StatusCode, Json<ErrorResponse>)> {
    match state.lessons.find_by_id(lesson_id).await {
        Ok(Some(lesson)) => Ok(Json(lesson)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("lesson_not_found", "Lesson does not exist")),
        )),
        Err(e) => {
            tracing::error!("Failed to fetch lesson: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("get_lesson_failed", &e.to_string())),
            ))
        }
    }
}
