use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lms_models::Course;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

/// List the published courses of a program
pub async fn list_program_courses(
    State(state): State<Arc<AppState>>,
    Path(program_id): Path<Uuid>,
) -> Result<Json<CoursesResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.courses.list_published_by_program(program_id).await {
        Ok(courses) => Ok(Json(CoursesResponse { courses })),
        Err(e) => {
            tracing::error!("Failed to list courses: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("list_courses_failed", &e.to_string())),
            ))
        }
    }
}
