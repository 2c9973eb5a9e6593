use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Assignment lifecycle - Protected (admin)
        .route(
            "/api/permissions",
            get(handlers::permissions::list_assignments)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/permissions/assigned/:teacher_id",
            get(handlers::permissions::assigned_courses)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/permissions/assign",
            post(handlers::permissions::create_assignment)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/permissions/assign-batch",
            post(handlers::permissions::assign_batch)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/permissions/status/:id",
            patch(handlers::permissions::update_status)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/permissions/bulk",
            post(handlers::permissions::process_pending)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        // Reference data
        .route(
            "/api/users",
            get(handlers::users::list_users)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/courses/programs/:program_id",
            get(handlers::courses::list_program_courses)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Lesson reads - require_auth runs first, then the assignment check
        .route(
            "/api/lessons/:lesson_id",
            get(handlers::lessons::get_lesson)
                .route_layer(from_fn_with_state(
                    state.clone(),
                    middleware::require_lesson_access,
                ))
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Uploads - authenticated, rate limited per principal
        .route(
            "/api/uploads",
            post(handlers::uploads::create_upload)
                .route_layer(from_fn_with_state(state.clone(), middleware::upload_rate_limit))
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .with_state(state)
}
