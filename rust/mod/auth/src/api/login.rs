use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};

use staffvault_core::ServiceError;

use crate::api::{AppState, views};
use crate::model::LoginRequest;
use crate::service::cookie::{read_cookie, removal_cookie, session_cookie};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout).post(logout))
}

async fn login_form() -> impl IntoResponse {
    views::login_page(None, "")
}

/// Handle POST /login: on success set the session cookie and redirect to
/// the landing page; otherwise re-render the form without a cookie.
async fn login(State(svc): State<AppState>, Form(input): Form<LoginRequest>) -> Response {
    let username = input.username.clone();

    match svc.login(input) {
        Ok(ok) => {
            let config = svc.config();
            (
                [(SET_COOKIE, session_cookie(&config.session, &ok.cookie_value))],
                Redirect::to(&config.login.landing_path),
            )
                .into_response()
        }
        Err(e) if e.is_server_error() => ServiceError::from(e).into_response(),
        Err(e) => (e.status_code(), views::login_page(Some(&e.user_message()), &username))
            .into_response(),
    }
}

/// Handle GET/POST /logout. Always clears the cookie.
async fn logout(State(svc): State<AppState>, headers: HeaderMap) -> Response {
    let config = svc.config();
    let cookie = read_cookie(&headers, &config.session.cookie_name);

    if let Err(e) = svc.logout(cookie) {
        return ServiceError::from(e).into_response();
    }

    (
        [(SET_COOKIE, removal_cookie(&config.session))],
        views::login_page(Some("Logged out"), ""),
    )
        .into_response()
}
