//! Access guard: only requests with a live session reach the wrapped routes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use staffvault_core::ServiceError;

use crate::api::{AppState, LOGIN_PATH};
use crate::service::cookie::read_cookie;

/// Middleware for protected routes.
///
/// Without a valid session the request is answered with `302 Found` to the
/// login page and the inner handler never runs. With one, the
/// [`AuthDecision`](crate::model::AuthDecision) is stored in request
/// extensions and the request passes through untouched.
pub async fn require_session(State(svc): State<AppState>, mut req: Request, next: Next) -> Response {
    let cookie = read_cookie(req.headers(), &svc.config().session.cookie_name);

    match svc.authorize(cookie) {
        Ok(decision) if decision.authenticated => {
            req.extensions_mut().insert(decision);
            next.run(req).await
        }
        Ok(_) => {
            debug!(path = %req.uri().path(), "no session, redirecting to login");
            redirect_to_login()
        }
        Err(e) => ServiceError::from(e).into_response(),
    }
}

fn redirect_to_login() -> Response {
    (StatusCode::FOUND, [(LOCATION, LOGIN_PATH)]).into_response()
}
