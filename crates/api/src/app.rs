use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, chats, events, health, reports, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting is disabled when the per-minute quota is 0.
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes. Middleware order: auth runs first, then rate
    // limiting (which needs the authenticated user).
    let protected_routes = Router::new()
        // Profile routes
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/users/:user_id", get(users::get_profile))
        .route("/api/v1/users/:user_id", put(users::update_profile))
        // Event routes
        .route("/api/v1/events", post(events::create_event))
        .route("/api/v1/events", get(events::list_events))
        .route("/api/v1/events/open", get(events::list_open_events))
        .route("/api/v1/events/mine", get(events::list_my_events))
        .route("/api/v1/events/approve", post(events::approve_latest_event))
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route(
            "/api/v1/events/:event_id/approve",
            post(events::approve_event),
        )
        .route("/api/v1/events/:event_id/chat", post(events::ensure_chat))
        // Chat room routes
        .route("/api/v1/chats", get(chats::list_rooms))
        .route("/api/v1/chats/:chat_id", get(chats::get_room))
        .route("/api/v1/chats/:chat_id", delete(chats::delete_room))
        .route("/api/v1/chats/:chat_id/join", post(chats::join_room))
        .route("/api/v1/chats/:chat_id/exit", post(chats::exit_room))
        .route("/api/v1/chats/:chat_id/members", get(chats::list_members))
        .route("/api/v1/chats/:chat_id/members", post(chats::add_member))
        .route(
            "/api/v1/chats/:chat_id/members/:user_id",
            delete(chats::remove_member),
        )
        .route(
            "/api/v1/chats/:chat_id/settings",
            put(chats::update_settings),
        )
        .route("/api/v1/chats/:chat_id/name", put(chats::rename_room))
        .route("/api/v1/chats/:chat_id/messages", get(chats::list_messages))
        .route("/api/v1/chats/:chat_id/messages", post(chats::send_message))
        // Report filing
        .route("/api/v1/reports", post(reports::file_report))
        // Rate limiting runs after auth (needs the user ID from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin routes (authenticated + configured administrator identity)
    let admin_routes = Router::new()
        .route("/api/v1/admin/reports", get(reports::list_reports))
        .route(
            "/api/v1/admin/reports/:report_id/ignore",
            post(reports::ignore_report),
        )
        .route(
            "/api/v1/admin/reports/:report_id/ban",
            post(reports::ban_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
