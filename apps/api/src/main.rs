//! AcademIA navigation API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use academia_application::{NavigationService, UnreadBadgeProvider};
use academia_core::AppError;
use academia_infrastructure::{
    HttpUnreadBadgeProvider, PostgresAuditLogRepository, PostgresAuditRepository,
    PostgresNavigationRepository, TemplateMenuProvider, ZeroUnreadBadgeProvider,
};
use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let badge_provider_kind = env::var("BADGE_PROVIDER").unwrap_or_else(|_| "zero".to_owned());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let navigation_repository = Arc::new(PostgresNavigationRepository::new(pool.clone()));
    let menu_provider = Arc::new(TemplateMenuProvider::new(navigation_repository.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));

    let badge_provider: Arc<dyn UnreadBadgeProvider> = match badge_provider_kind.as_str() {
        "zero" => Arc::new(ZeroUnreadBadgeProvider),
        "http" => {
            let messaging_base_url = required_env("MESSAGING_BASE_URL")?;
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build messaging HTTP client: {error}"))
                })?;
            Arc::new(HttpUnreadBadgeProvider::new(http_client, messaging_base_url))
        }
        _ => {
            return Err(AppError::Validation(format!(
                "BADGE_PROVIDER must be either 'zero' or 'http', got '{badge_provider_kind}'"
            )));
        }
    };

    let navigation_service = NavigationService::new(
        navigation_repository,
        menu_provider,
        badge_provider,
        audit_repository,
        audit_log_repository,
    );

    let app_state = AppState {
        navigation_service,
        pool,
    };

    let protected_routes = Router::new()
        .route(
            "/api/navigation/menu",
            get(handlers::navigation::menu_handler),
        )
        .route(
            "/api/navigation/items",
            get(handlers::navigation::list_nav_items_handler)
                .post(handlers::navigation::create_nav_item_handler),
        )
        .route(
            "/api/navigation/items/{nav_item_id}",
            put(handlers::navigation::update_nav_item_handler)
                .delete(handlers::navigation::delete_nav_item_handler),
        )
        .route(
            "/api/navigation/roles/{role}/tree",
            get(handlers::navigation::role_tree_handler),
        )
        .route(
            "/api/navigation/roles/{role}/placements",
            post(handlers::navigation::attach_item_handler)
                .delete(handlers::navigation::reset_role_handler),
        )
        .route(
            "/api/navigation/roles/{role}/placements/{placement_id}",
            delete(handlers::navigation::detach_placement_handler),
        )
        .route(
            "/api/navigation/roles/{role}/placements/{placement_id}/move",
            post(handlers::navigation::move_placement_handler),
        )
        .route(
            "/api/navigation/roles/{role}/bootstrap",
            post(handlers::navigation::bootstrap_defaults_handler),
        )
        .route(
            "/api/navigation/roles/{role}/reconcile",
            post(handlers::navigation::reconcile_role_handler),
        )
        .route(
            "/api/navigation/reinitialize",
            post(handlers::navigation::reinitialize_all_handler),
        )
        .route(
            "/api/navigation/audit",
            get(handlers::navigation::list_audit_log_handler),
        )
        .route_layer(from_fn(middleware::require_identity));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "academia-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
