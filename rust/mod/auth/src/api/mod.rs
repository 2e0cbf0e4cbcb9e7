pub mod guard;
mod login;
mod register;
mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Build the public auth router: index, register, login, logout.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .route("/", get(|| async { views::index_page() }))
        .merge(register::routes())
        .merge(login::routes())
        .with_state(svc)
}

/// Put every route of `router` behind the session guard.
pub fn protect(svc: Arc<AuthService>, router: Router) -> Router {
    router.route_layer(axum::middleware::from_fn_with_state(svc, guard::require_session))
}
