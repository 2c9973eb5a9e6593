use crate::handlers::ErrorResponse;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use lms_auth::{Claims, JwtService};
use lms_models::UserRole;
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated principal attached to the request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    fn from_claims(claims: Claims) -> Result<Self, (StatusCode, Json<ErrorResponse>)> {
        let user_id = claims.user_id().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("invalid_token", "Invalid user ID in token")),
            )
        })?;

        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(
    headers: &HeaderMap,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "missing_auth_header",
                    "Authorization header is required",
                )),
            )
        })?
        .to_str()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "invalid_auth_header",
                    "Invalid Authorization header format",
                )),
            )
        })?;

    if !auth_header.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "invalid_auth_scheme",
                "Authorization header must use Bearer scheme",
            )),
        ));
    }

    Ok(auth_header[7..].to_string())
}

/// Validate a JWT and return its claims
pub fn validate_token(
    jwt: &JwtService,
    token: &str,
) -> Result<Claims, (StatusCode, Json<ErrorResponse>)> {
    jwt.validate_access_token(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("invalid_token", &e.to_string())),
        )
    })
}

/// Middleware to require authentication
pub async fn require_auth(
    State(state): State<Arc<crate::AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer_token(&headers)?;
    let claims = validate_token(&state.jwt, &token)?;

    // Add user context to request extensions
    request.extensions_mut().insert(AuthUser::from_claims(claims)?);

    Ok(next.run(request).await)
}

/// Middleware to require the admin role
pub async fn require_admin(
    State(state): State<Arc<crate::AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer_token(&headers)?;
    let claims = validate_token(&state.jwt, &token)?;
    let user = AuthUser::from_claims(claims)?;

    if !user.role.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(
                "insufficient_permissions",
                "This action requires the admin role",
            )),
        ));
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
