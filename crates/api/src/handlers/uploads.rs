use crate::handlers::ErrorResponse;
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Extension, Json};
use lms_models::{LessonMaterial, NewLessonMaterial};
use std::sync::Arc;
use validator::Validate;

/// Record an uploaded lesson material. The upload rate guard has already
/// admitted this request.
pub async fn create_upload(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<NewLessonMaterial>,
) -> Result<Json<LessonMaterial>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("validation_failed", &e.to_string())),
        ));
    }

    match state.lessons.find_by_id(request.lesson_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("lesson_not_found", "Lesson does not exist")),
            ))
        }
        Err(e) => {
            tracing::error!("Failed to resolve lesson for upload: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("upload_failed", &e.to_string())),
            ));
        }
    }

    match state.lessons.insert_material(request, user.user_id).await {
        Ok(material) => Ok(Json(material)),
        Err(e) => {
            tracing::error!("Failed to record upload: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("upload_failed", &e.to_string())),
            ))
        }
    }
}
