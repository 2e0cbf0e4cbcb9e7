use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};

use staffvault_core::ServiceError;

use crate::api::{AppState, LOGIN_PATH, views};
use crate::model::Registration;

pub fn routes() -> Router<AppState> {
    Router::new().route("/register", get(register_form).post(register))
}

async fn register_form() -> impl IntoResponse {
    views::register_page(None, "", "", "")
}

async fn register(State(svc): State<AppState>, Form(input): Form<Registration>) -> Response {
    // Keep the non-secret fields to refill the form on failure.
    let (username, first_name, last_name) = (
        input.username.clone(),
        input.first_name.clone(),
        input.last_name.clone(),
    );

    match svc.register(input) {
        Ok(_) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) if e.is_server_error() => ServiceError::from(e).into_response(),
        Err(e) => (
            e.status_code(),
            views::register_page(Some(&e.user_message()), &username, &first_name, &last_name),
        )
            .into_response(),
    }
}
