mod views;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use staffvault_core::{ListParams, ServiceError};

use crate::model::StaffForm;
use crate::service::{StaffError, StaffService};

pub type AppState = Arc<StaffService>;

const LIST_PATH: &str = "/staff";

/// Build the staff router. Callers are expected to wrap it in the session
/// guard.
pub fn build_router(svc: Arc<StaffService>) -> Router {
    Router::new()
        .route("/staff", get(list))
        .route("/staff/new", get(new_form).post(create))
        .route("/staff/search", get(search))
        .route("/staff/{id}/edit", get(edit_form).post(update))
        .route("/staff/{id}/delete", post(delete))
        .with_state(svc)
}

async fn list(State(svc): State<AppState>, Query(params): Query<ListParams>) -> Response {
    match svc.list(&params) {
        Ok(result) => views::list_page(&result, &params).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

async fn new_form() -> impl IntoResponse {
    views::form_page("Add staff", "/staff/new", None, &StaffForm::default())
}

async fn create(State(svc): State<AppState>, Form(form): Form<StaffForm>) -> Response {
    let result = form.validate().and_then(|input| svc.create(input));
    match result {
        Ok(_) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => form_error(e, "Add staff", "/staff/new", &form),
    }
}

async fn edit_form(State(svc): State<AppState>, Path(id): Path<String>) -> Response {
    match svc.get(&id) {
        Ok(record) => views::form_page(
            "Edit staff",
            &format!("/staff/{}/edit", id),
            None,
            &StaffForm::from_record(&record),
        )
        .into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

async fn update(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StaffForm>,
) -> Response {
    let result = form.validate().and_then(|input| svc.update(&id, input));
    match result {
        Ok(record) => views::updated_page(&record).into_response(),
        Err(e) => form_error(e, "Edit staff", &format!("/staff/{}/edit", id), &form),
    }
}

async fn delete(State(svc): State<AppState>, Path(id): Path<String>) -> Response {
    match svc.delete(&id) {
        Ok(()) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    first_name: String,
}

/// Without a name the bare search form is shown.
async fn search(State(svc): State<AppState>, Query(q): Query<SearchQuery>) -> Response {
    let name = q.first_name.trim();
    if name.is_empty() {
        return views::search_page("", None).into_response();
    }
    match svc.search_by_first_name(name) {
        Ok(records) => views::search_page(name, Some(records.as_slice())).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// Validation errors re-render the form; anything else is a plain error
/// response.
fn form_error(e: StaffError, title: &str, action: &str, form: &StaffForm) -> Response {
    match e {
        StaffError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            views::form_page(title, action, Some(&msg), form),
        )
            .into_response(),
        other => ServiceError::from(other).into_response(),
    }
}
