use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lms_models::{
    AssignBatch, Assignment, AssignmentStatus, NewAssignment, Notice, ResourceType,
    StatusAction, UpdateAssignmentStatus,
};
use lms_permissions::{assigned_course_ids, BatchReport, PermissionError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AssignmentsResponse {
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Deserialize)]
pub struct ListAssignmentsQuery {
    pub status: Option<AssignmentStatus>,
}

/// List assignment records, optionally filtered by status
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAssignmentsQuery>,
) -> Result<Json<AssignmentsResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.lifecycle.list(query.status).await {
        Ok(assignments) => Ok(Json(AssignmentsResponse { assignments })),
        Err(e) => {
            tracing::error!("Failed to list assignments: {}", e);
            Err(error_response(e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignedCoursesQuery {
    /// Assignment currently being edited; its course never self-disables.
    pub exclude: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AssignedCoursesResponse {
    pub course_ids: Vec<Uuid>,
}

/// Course ids a teacher already holds live assignments for. The course
/// picker greys these out.
pub async fn assigned_courses(
    State(state): State<Arc<AppState>>,
    Path(teacher_id): Path<Uuid>,
    Query(query): Query<AssignedCoursesQuery>,
) -> Result<Json<AssignedCoursesResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.lifecycle.list(None).await {
        Ok(assignments) => {
            let mut course_ids: Vec<Uuid> =
                assigned_course_ids(&assignments, teacher_id, query.exclude)
                    .into_iter()
                    .collect();
            course_ids.sort();
            Ok(Json(AssignedCoursesResponse { course_ids }))
        }
        Err(e) => {
            tracing::error!("Failed to compute assigned courses: {}", e);
            Err(error_response(e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub teacher_id: Uuid,
    pub resource_type: ResourceType,
    pub resource_id: Uuid,
    pub start_at: Option<NaiveDate>,
    pub end_at: Option<NaiveDate>,
}

/// Create a single assignment. Admin-created records start active.
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<Json<Assignment>, (StatusCode, Json<ErrorResponse>)> {
    let assignment = NewAssignment {
        teacher_id: request.teacher_id,
        resource_type: request.resource_type,
        resource_id: request.resource_id,
        status: AssignmentStatus::Active,
        start_at: request.start_at,
        end_at: request.end_at,
    };

    match state.lifecycle.create(assignment).await {
        Ok(created) => Ok(Json(created)),
        Err(e) => {
            tracing::error!("Failed to create assignment: {}", e);
            Err(error_response(e))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub report: BatchReport,
    pub notice: Notice,
}

/// Create one course assignment per selected course, reporting partial
/// success as "created N of M"
pub async fn assign_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssignBatch>,
) -> Result<Json<BatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.lifecycle.assign_batch(request).await {
        Ok(report) => {
            let message = format!(
                "Created {} of {} assignments",
                report.succeeded, report.attempted
            );
            Ok(Json(BatchResponse {
                report,
                notice: batch_notice(&report, message),
            }))
        }
        Err(e) => {
            tracing::error!("Batch assignment failed: {}", e);
            Err(error_response(e))
        }
    }
}

/// Patch one assignment's status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAssignmentStatus>,
) -> Result<Json<Assignment>, (StatusCode, Json<ErrorResponse>)> {
    match state.lifecycle.update_status(id, request.status).await {
        Ok(updated) => Ok(Json(updated)),
        Err(e) => {
            tracing::error!("Failed to update assignment status: {}", e);
            Err(error_response(e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkProcessRequest {
    pub action: StatusAction,
}

#[derive(Debug, Serialize)]
pub struct BulkProcessResponse {
    pub report: BatchReport,
    pub notice: Notice,
    pub assignments: Vec<Assignment>,
    pub pending: Vec<Assignment>,
}

/// Apply one status action to every pending assignment, then return the
/// refreshed full list and pending subset regardless of partial failure.
pub async fn process_pending(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkProcessRequest>,
) -> Result<Json<BulkProcessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let report = match state.lifecycle.process_pending(request.action).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Bulk processing failed: {}", e);
            return Err(error_response(e));
        }
    };

    let assignments = state.lifecycle.list(None).await.map_err(|e| {
        tracing::error!("Failed to refresh assignments: {}", e);
        error_response(e)
    })?;
    let pending = state
        .lifecycle
        .list(Some(AssignmentStatus::Pending))
        .await
        .map_err(|e| {
            tracing::error!("Failed to refresh pending assignments: {}", e);
            error_response(e)
        })?;

    let message = format!(
        "Processed {} of {} pending assignments",
        report.succeeded, report.attempted
    );

    Ok(Json(BulkProcessResponse {
        notice: batch_notice(&report, message),
        report,
        assignments,
        pending,
    }))
}

fn batch_notice(report: &BatchReport, message: String) -> Notice {
    if report.attempted == 0 {
        Notice::info(message)
    } else if report.is_complete() {
        Notice::success(message)
    } else if report.succeeded == 0 {
        Notice::error(message)
    } else {
        Notice::info(message)
    }
}

fn error_response(e: PermissionError) -> (StatusCode, Json<ErrorResponse>) {
    match &e {
        PermissionError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("validation_failed", message)),
        ),
        PermissionError::NotFound(message) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("not_found", message)),
        ),
        PermissionError::IllegalTransition { .. } => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("illegal_transition", &e.to_string())),
        ),
        PermissionError::Database(db) if is_unique_violation(db) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                "already_assigned",
                "A live assignment already exists for this teacher and resource",
            )),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        ),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
