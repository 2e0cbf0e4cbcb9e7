//! Route assembly: public auth pages, guarded staff pages, system endpoints.

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

use auth::AuthModule;
use staff::StaffModule;
use staffvault_core::Module;

/// Build the complete router.
///
/// Everything the staff module serves sits behind the session guard; the
/// auth pages and system endpoints stay public.
pub fn build_router(auth: &AuthModule, staff: &StaffModule) -> Router {
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    auth.routes()
        .merge(auth.protect(staff.routes()))
        .merge(system_routes)
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "staffvaultd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use auth::service::{AuthConfig, HashConfig, SessionConfig};
    use staffvault_sql::{SQLStore, SqliteStore};

    use super::*;

    pub(crate) fn test_auth_config() -> AuthConfig {
        AuthConfig {
            session: SessionConfig {
                secret: "0123456789abcdef0123456789abcdef-test".to_string(),
                ..Default::default()
            },
            hash: HashConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            ..Default::default()
        }
    }

    fn app() -> Router {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthModule::new(Arc::clone(&sql), test_auth_config()).unwrap();
        let staff = StaffModule::new(sql).unwrap();
        build_router(&auth, &staff)
    }

    async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>, form: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(COOKIE, format!("session={}", c));
        }
        let body = match form {
            Some(f) => {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(f.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    fn issued_cookie(resp: &Response) -> String {
        let header = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        let pair = header.split(';').next().unwrap();
        pair.split_once('=').unwrap().1.to_string()
    }

    #[tokio::test]
    async fn system_endpoints_are_public() {
        let app = app();
        for uri in ["/health", "/version", "/", "/login", "/register"] {
            let resp = send(&app, "GET", uri, None, None).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn every_staff_route_is_guarded() {
        let app = app();
        let cases = [
            ("GET", "/staff"),
            ("GET", "/staff/new"),
            ("POST", "/staff/new"),
            ("GET", "/staff/search?first_name=Grace"),
            ("GET", "/staff/abc/edit"),
            ("POST", "/staff/abc/edit"),
            ("POST", "/staff/abc/delete"),
        ];
        for (method, uri) in cases {
            let resp = send(&app, method, uri, None, None).await;
            assert_eq!(resp.status(), StatusCode::FOUND, "{method} {uri}");
            assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
        }
    }

    #[tokio::test]
    async fn login_opens_staff_pages_until_logout() {
        let app = app();

        let resp = send(
            &app,
            "POST",
            "/register",
            None,
            Some("username=alice&password=GoodPass1%21&first_name=A&last_name=L"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let resp = send(&app, "POST", "/login", None, Some("username=alice&password=GoodPass1%21")).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/staff");
        let cookie = issued_cookie(&resp);

        let resp = send(
            &app,
            "POST",
            "/staff/new",
            Some(&cookie),
            Some("first_name=Grace&last_name=Hopper&position=Admiral&age=45&salary=4100&years_of_service=12&date_of_birth=1906-12-09&has_official_car=no"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let resp = send(&app, "GET", "/staff", Some(&cookie), None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, "GET", "/logout", Some(&cookie), None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, "GET", "/staff", Some(&cookie), None).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
}
