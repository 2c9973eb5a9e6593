// LMS API Server
// REST backend for course assignment management and teacher content access

mod config;
mod handlers;
mod middleware;
mod routes;

use config::Config;
use dotenvy::dotenv;
use lms_permissions::{AssignmentLifecycle, LessonAccess, PgPermissionStore};
use middleware::UploadRateGuard;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub lifecycle: AssignmentLifecycle<PgPermissionStore>,
    pub access: LessonAccess<PgPermissionStore>,
    pub users: lms_database::UserRepository,
    pub courses: lms_database::CourseRepository,
    pub lessons: lms_database::LessonRepository,
    pub jwt: lms_auth::JwtService,
    pub upload_guard: UploadRateGuard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,lms_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("🚀 Starting LMS API Server");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();
    tracing::info!("🔌 Server: {}:{}", config.server_host, config.server_port);

    // Initialize database
    tracing::info!("🗄️  Connecting to database...");
    let database = lms_database::Database::new(config.database.clone())
        .await
        .expect("Failed to connect to database");
    database.migrate().await.expect("Database migration failed");
    database.ping().await.expect("Database ping failed");
    tracing::info!("✅ Database connected");

    // Initialize JWT service
    let jwt = lms_auth::JwtService::from_env();
    tracing::info!("🔐 JWT service initialized");

    // Permission services share one Postgres-backed store
    let store = PgPermissionStore::new(database.pool().clone());
    let lifecycle = AssignmentLifecycle::new(store.clone());
    let access = LessonAccess::new(store);
    tracing::info!("🔑 Permission services initialized");

    // Upload rate guard: in-process state, reset on restart
    let upload_guard = UploadRateGuard::upload_defaults();
    tracing::info!("⏱️  Upload rate guard initialized");

    // Create app state
    let state = Arc::new(AppState {
        lifecycle,
        access,
        users: lms_database::UserRepository::new(database.pool().clone()),
        courses: lms_database::CourseRepository::new(database.pool().clone()),
        lessons: lms_database::LessonRepository::new(database.pool().clone()),
        jwt,
        upload_guard,
    });

    // Create router
    let app = routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("✅ Server ready at http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");

    Ok(())
}
