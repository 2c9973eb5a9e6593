use crate::handlers::ErrorResponse;
use crate::middleware::AuthUser;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// 20 uploads per 60 seconds per principal
const UPLOAD_MAX_REQUESTS: usize = 20;
const UPLOAD_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct RateLimitError {
    error: String,
    message: String,
    retry_after: u64,
}

/// Sliding-window counter over recent request instants, keyed by
/// principal id. State lives in process memory only: it is reset on
/// restart and not shared across instances. Entries are serialized
/// per key; keys never interfere.
pub struct UploadRateGuard {
    max_requests: usize,
    window: Duration,
    requests: DashMap<Uuid, Vec<Instant>>,
}

impl UploadRateGuard {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: DashMap::new(),
        }
    }

    pub fn upload_defaults() -> Self {
        Self::new(UPLOAD_MAX_REQUESTS, UPLOAD_WINDOW)
    }

    /// Admit or reject one request. On rejection returns how long until
    /// the oldest recorded slot ages out; a rejected request consumes no
    /// slot.
    pub fn try_acquire(&self, user_id: Uuid) -> Result<(), Duration> {
        self.try_acquire_at(user_id, Instant::now())
    }

    fn try_acquire_at(&self, user_id: Uuid, now: Instant) -> Result<(), Duration> {
        let mut timestamps = self.requests.entry(user_id).or_default();

        // Recompute the live window on every request.
        timestamps.retain(|&t| now.duration_since(t) < self.window);

        if timestamps.len() >= self.max_requests {
            let oldest = timestamps[0];
            return Err(self.window - now.duration_since(oldest));
        }

        timestamps.push(now);
        Ok(())
    }
}

/// Middleware bounding upload frequency per authenticated principal.
/// Unauthenticated requests are rejected before any rate accounting.
pub async fn upload_rate_limit(
    State(state): State<Arc<crate::AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(user) = request.extensions().get::<AuthUser>().cloned() else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "unauthenticated",
                "Authentication is required before uploading",
            )),
        )
            .into_response());
    };

    match state.upload_guard.try_acquire(user.user_id) {
        Ok(()) => Ok(next.run(request).await),
        Err(retry_after) => {
            let retry_after = retry_after.as_secs().max(1);
            tracing::warn!("Upload rate limit exceeded for user {}", user.user_id);
            Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitError {
                    error: "rate_limit_exceeded".to_string(),
                    message: format!(
                        "Too many uploads. Please try again in {} seconds.",
                        retry_after
                    ),
                    retry_after,
                }),
            )
                .into_response())
        }
    }
}
