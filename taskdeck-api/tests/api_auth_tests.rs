/// Integration tests for the API's authentication and input surfaces
///
/// These tests drive the full router with `tower::ServiceExt::oneshot` and
/// a lazy connection pool, covering every path that must be decided before
/// storage is touched:
/// - missing / malformed / invalid credentials (401)
/// - request validation failures (422)
///
/// Paths that need real rows (ownership checks, cascades) are covered by
/// the policy unit tests in taskdeck-shared plus a live-database
/// environment; nothing here requires a running Postgres.
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use sqlx::postgres::PgPoolOptions;
use taskdeck_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
};
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Builds a router backed by a lazy pool that never actually connects
fn test_app() -> axum::Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    build_router(AppState::new(pool, config))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    for (method, uri) in [
        ("GET", "/v1/tasks"),
        ("POST", "/v1/tasks"),
        ("GET", "/v1/users"),
        ("DELETE", "/v1/users/00000000-0000-0000-0000-000000000000"),
        ("PATCH", "/v1/tasks/00000000-0000-0000-0000-000000000000/complete"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );

        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .header("authorization", "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_cannot_access_api() {
    use taskdeck_shared::auth::jwt::{create_token, Claims, TokenType};
    use taskdeck_shared::models::user::UserRole;
    use uuid::Uuid;

    // Refresh tokens are for /v1/auth/refresh only
    let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Refresh);
    let token = create_token(&claims, TEST_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_rejects_invalid_input() {
    let cases = [
        // bad email
        serde_json::json!({
            "username": "jdoe",
            "email": "not-an-email",
            "password": "LongEnough1!"
        }),
        // short password
        serde_json::json!({
            "username": "jdoe",
            "email": "jdoe@example.com",
            "password": "short"
        }),
        // short username
        serde_json::json!({
            "username": "ab",
            "email": "jdoe@example.com",
            "password": "LongEnough1!"
        }),
    ];

    for payload in cases {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/users")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "payload {} should be rejected",
            payload
        );

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["details"].is_array());
    }
}

#[tokio::test]
async fn test_login_rejects_empty_fields() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"username": "", "password": ""}).to_string(),
        ))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_refresh_rejects_invalid_token() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"refresh_token": "bogus"}).to_string(),
        ))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    use taskdeck_shared::auth::jwt::{create_token, Claims, TokenType};
    use taskdeck_shared::models::user::UserRole;
    use uuid::Uuid;

    let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
    let token = create_token(&claims, TEST_SECRET).unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "refresh_token": token }).to_string(),
        ))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
