use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, friends, profile};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(profile::router())
                .merge(friends::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_bytes(res: Response) -> Vec<u8> {
        res.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(res: Response) -> Value {
        serde_json::from_slice(&body_bytes(res).await).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let creds = json!({ "email": email, "password": "secret1" });
        let res = send(app, request("POST", "/api/v1/register", None, Some(creds.clone()))).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = send(app, request("POST", "/api/v1/login", None, Some(creds))).await;
        assert_eq!(res.status(), StatusCode::OK);
        String::from_utf8(body_bytes(res).await).unwrap()
    }

    async fn add_friend(app: &Router, token: &str, first: &str, last: &str) -> i64 {
        let body = json!({ "firstName": first, "lastName": last, "phoneNumber": "555-0100" });
        let res = send(app, request("POST", "/api/v1/friends", Some(token), Some(body))).await;
        assert_eq!(res.status(), StatusCode::OK);
        body_json(res).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = build_app(AppState::fake());
        let res = send(&app, request("GET", "/api/v1/health", None, None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_bytes(res).await, b"ok");
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;

        let res = send(&app, request("GET", "/api/v1/me", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let me = body_json(res).await;
        assert_eq!(me["email"], "ada@example.com");
        assert_eq!(me["id"], 1);
    }

    #[tokio::test]
    async fn duplicate_registration_is_bad_request() {
        let app = build_app(AppState::fake());
        let creds = json!({ "email": "dup@example.com", "password": "secret1" });
        let first = send(&app, request("POST", "/api/v1/register", None, Some(creds.clone()))).await;
        assert_eq!(first.status(), StatusCode::OK);
        let second = send(&app, request("POST", "/api/v1/register", None, Some(creds))).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(second).await["error"], "Email already registered");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = build_app(AppState::fake());
        let creds = json!({ "email": "a@b.co", "password": "12345" });
        let res = send(&app, request("POST", "/api/v1/register", None, Some(creds))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_login_is_unauthorized() {
        let app = build_app(AppState::fake());
        register_and_login(&app, "ada@example.com").await;
        let creds = json!({ "email": "ada@example.com", "password": "wrong-pass" });
        let res = send(&app, request("POST", "/api/v1/login", None, Some(creds))).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_routes_need_a_valid_token() {
        let app = build_app(AppState::fake());
        for uri in ["/api/v1/friends", "/api/v1/profile", "/api/v1/me", "/api/v1/friends/1"] {
            let res = send(&app, request("GET", uri, None, None)).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
            let res = send(&app, request("GET", uri, Some("garbage"), None)).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let state = AppState::fake();
        let issued = time::OffsetDateTime::now_utc() - time::Duration::hours(1);
        let token = state.keys.issue_at(1, "a@b.co", issued).unwrap();
        let app = build_app(state);
        let res = send(&app, request("GET", "/api/v1/friends", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await["error"], "Token expired");
    }

    #[tokio::test]
    async fn new_account_has_placeholder_profile_and_can_update_it() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;

        let res = send(&app, request("GET", "/api/v1/profile", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let profile = body_json(res).await;
        assert_eq!(profile["firstName"], "Default");
        assert_eq!(profile["lastName"], "User");

        let update = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "birthDate": "1815-12-10",
            "photoUrl": "https://example.com/ada.png"
        });
        let res = send(&app, request("POST", "/api/v1/profile", Some(&token), Some(update))).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request("GET", "/api/v1/profile/1", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let profile = body_json(res).await;
        assert_eq!(profile["firstName"], "Ada");
        assert_eq!(profile["birthDate"], "1815-12-10");
    }

    #[tokio::test]
    async fn malformed_bodies_get_json_errors() {
        let app = build_app(AppState::fake());
        let res = send(
            &app,
            request("POST", "/api/v1/register", None, Some(json!({ "email": "a@b.co" }))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(res).await["error"].is_string());

        let token = register_and_login(&app, "ada@example.com").await;
        let update = json!({ "firstName": "Ada", "lastName": "L", "birthDate": "" });
        let res = send(&app, request("POST", "/api/v1/profile", Some(&token), Some(update))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(res).await["error"].is_string());

        let res = send(&app, request("GET", "/api/v1/friends?page=abc", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(res).await["error"].is_string());
    }

    #[tokio::test]
    async fn profile_of_another_account_is_not_found() {
        let app = build_app(AppState::fake());
        let _alice = register_and_login(&app, "alice@example.com").await;
        let bob = register_and_login(&app, "bob@example.com").await;

        let res = send(&app, request("GET", "/api/v1/profile/1", Some(&bob), None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn friend_crud_roundtrip() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;
        let id = add_friend(&app, &token, "Charles", "Babbage").await;

        let uri = format!("/api/v1/friends/{id}");
        let res = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["lastName"], "Babbage");

        let body = json!({ "firstName": "Charles", "lastName": "B.", "phoneNumber": "555" });
        let res = send(&app, request("PUT", &uri, Some(&token), Some(body))).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request("DELETE", &uri, Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn friend_without_last_name_is_rejected() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;
        let body = json!({ "firstName": "Solo", "phoneNumber": "555" });
        let res = send(&app, request("POST", "/api/v1/friends", Some(&token), Some(body))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn friends_of_other_accounts_are_invisible() {
        let app = build_app(AppState::fake());
        let alice = register_and_login(&app, "alice@example.com").await;
        let bob = register_and_login(&app, "bob@example.com").await;
        let id = add_friend(&app, &bob, "Eve", "Secret").await;

        let uri = format!("/api/v1/friends/{id}");
        let body = json!({ "firstName": "X", "lastName": "Y", "phoneNumber": "1" });
        for (method, body) in [("GET", None), ("PUT", Some(body)), ("DELETE", None)] {
            let res = send(&app, request(method, &uri, Some(&alice), body)).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{method}");
        }

        let res = send(&app, request("GET", &uri, Some(&bob), None)).await;
        assert_eq!(body_json(res).await["firstName"], "Eve");
    }

    #[tokio::test]
    async fn list_paginates_and_clamps() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;
        for i in 0..25 {
            add_friend(&app, &token, &format!("F{i}"), &format!("L{i}")).await;
        }

        let res = send(&app, request("GET", "/api/v1/friends?page=1&pageSize=10", Some(&token), None)).await;
        let page = body_json(res).await;
        assert_eq!(page["friends"].as_array().unwrap().len(), 10);
        assert_eq!(page["totalCount"], 25);
        assert_eq!(page["totalPages"], 3);

        let res = send(&app, request("GET", "/api/v1/friends?page=99&pageSize=10", Some(&token), None)).await;
        let page = body_json(res).await;
        assert_eq!(page["currentPage"], 3);
        assert_eq!(page["friends"].as_array().unwrap().len(), 5);

        let res = send(&app, request("GET", "/api/v1/friends?pageSize=0", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_list_has_zero_pages() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;
        let res = send(&app, request("GET", "/api/v1/friends", Some(&token), None)).await;
        let page = body_json(res).await;
        assert_eq!(page["friends"], json!([]));
        assert!(page.get("items").is_none());
        assert_eq!(page["totalPages"], 0);
        assert_eq!(page["currentPage"], 1);
        assert_eq!(page["pageSize"], 10);
    }

    #[tokio::test]
    async fn search_matches_ordered_fragments() {
        let app = build_app(AppState::fake());
        let token = register_and_login(&app, "ada@example.com").await;
        add_friend(&app, &token, "John", "Smithson").await;
        add_friend(&app, &token, "Smith", "John").await;

        let res = send(&app, request("GET", "/api/v1/friends/search?searchTerm=jo%20smith", Some(&token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let page = body_json(res).await;
        assert_eq!(page["totalCount"], 1);
        assert_eq!(page["friends"][0]["firstName"], "John");

        let res = send(&app, request("GET", "/api/v1/friends/search?searchTerm=nobody", Some(&token), None)).await;
        let page = body_json(res).await;
        assert_eq!(page["totalCount"], 0);
        assert_eq!(page["totalPages"], 0);

        let res = send(&app, request("GET", "/api/v1/friends/search", Some(&token), None)).await;
        assert_eq!(body_json(res).await["totalCount"], 2);
    }
}
