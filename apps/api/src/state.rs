use academia_application::NavigationService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub navigation_service: NavigationService,
    pub pool: PgPool,
}
