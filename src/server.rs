//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (role guards, logging, compression, etc.)
//! - Graceful shutdown handling

use crate::auth::{require_role, Role, RoleGuard};
use crate::config::AppConfig;
use crate::db;
use crate::routes::{admin_class, api_info, auth, health, not_found, parent, teacher, users};
use crate::state::AppState;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Routes are divided into:
/// - Public routes: probes, login, account CRUD, class administration and
///   the parent lookup lists
/// - Teacher routes: /api/teacher/* (teacher token required)
/// - Parent routes: /api/parent/* except the lookup lists (parent token
///   required)
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Auth
        .route("/api/auth/login", post(auth::login))
        // Accounts
        .route("/api/users", get(users::list_users))
        .route("/api/users/add", post(users::add_user))
        .route("/api/users/update/{id}", put(users::update_user))
        .route("/api/users/delete/{id}", delete(users::delete_user))
        // Class administration
        .route("/admin/years", get(admin_class::years))
        .route("/admin/teachers", get(admin_class::teachers))
        .route("/admin/classes/{year_id}", get(admin_class::classes_by_year))
        .route(
            "/admin/class",
            post(admin_class::create_class).put(admin_class::update_class),
        )
        .route("/admin/class/{id}", delete(admin_class::delete_class))
        // Parent lookup lists, usable before login
        .route("/api/parent/years", get(parent::years))
        .route("/api/parent/semesters/{year_id}", get(parent::semesters))
        .route("/api/parent/notifications", get(parent::notifications));

    let teacher_routes = Router::new()
        .route("/api/teacher/profile", get(teacher::profile))
        .route("/api/teacher/stats", get(teacher::stats))
        .route("/api/teacher/today-schedule", get(teacher::today_schedule))
        .route("/api/teacher/scores", get(teacher::class_scores))
        .route("/api/teacher/save-score", post(teacher::save_score))
        .route("/api/teacher/academic-years", get(teacher::academic_years))
        .route("/api/teacher/teaching-classes", get(teacher::teaching_classes))
        .layer(from_fn_with_state(
            RoleGuard::new(state.tokens.clone(), Role::Teacher),
            require_role,
        ));

    let parent_routes = Router::new()
        .route("/api/parent/student", get(parent::linked_student))
        .route(
            "/api/parent/scores/{year_id}/{semester_id}",
            get(parent::scores),
        )
        .route("/api/parent/teachers", get(parent::teachers))
        .route("/api/parent/messages/{receiver_id}", get(parent::conversation))
        .route("/api/parent/messages", post(parent::send_message))
        .route("/api/parent/timetable", get(parent::week_timetable))
        .route(
            "/api/parent/requests",
            get(parent::list_leave_requests).post(parent::create_leave_request),
        )
        .route("/api/parent/homeroom-teacher", get(parent::homeroom_teacher))
        .route(
            "/api/parent/profile",
            get(parent::profile).put(parent::update_profile),
        )
        .route("/api/parent/children", get(parent::children))
        .route("/api/parent/attendance", get(parent::attendance_history))
        .layer(from_fn_with_state(
            RoleGuard::new(state.tokens.clone(), Role::Parent),
            require_role,
        ));

    Router::new()
        .merge(public_routes)
        .merge(teacher_routes)
        .merge(parent_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
///
/// Initializes logging, connects to the database (running pending
/// migrations), builds the router and serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    let database = db::connect(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), database));

    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!("Starting schoolgate on {}", addr);
    tracing::info!(
        "Timeout: {}s, token TTL: {}h, CORS: {}",
        config.timeout_secs,
        config.token_ttl_hours,
        config.enable_cors
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Logging middleware
async fn log_requests(request: Request, next: axum::middleware::Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
