//! HTTP Surface Tests
//!
//! `POST /api/{resource}/list` and `GET /health` driven through the router
//! with `oneshot`: bearer-token auth, status mapping and the page shape.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use recordgate::auth::{AccessRule, OwnershipPolicy, Role, TokenVerifier};
use recordgate::config::{default_resources, ResourceConfig, ServerConfig};
use recordgate::engine::{EngineSettings, QueryEngine};
use recordgate::http::{build_router, AppState};
use recordgate::storage::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

const SECRET: &str = "http-test-secret";

fn token(sub: i64, role: Role, exp_offset: i64) -> String {
    let claims = json!({
        "sub": sub.to_string(),
        "role": role,
        "exp": chrono::Utc::now().timestamp() + exp_offset,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn router() -> Router {
    let store = MemoryStore::new();
    store.create_table("invoices", ["id", "user_id", "invoice_number", "amount"]);
    store
        .insert_many(
            "invoices",
            (1..=6).map(|id| {
                json!({
                    "id": id,
                    "user_id": if id <= 4 { 1 } else { 2 },
                    "invoice_number": format!("INV-{:03}", id),
                    "amount": id * 100,
                })
            }),
        )
        .unwrap();
    // Registered as a resource but missing from the store
    let mut resources = default_resources();
    resources.push(ResourceConfig::new("ledger", "ledger", AccessRule::Shared));

    let policy = OwnershipPolicy::new().with_rule("invoices", AccessRule::owned("user_id"));
    let engine = QueryEngine::with_store(Arc::new(store), Arc::new(policy), EngineSettings::default());
    let state = AppState::new(engine, TokenVerifier::new(SECRET), &resources);

    build_router(&ServerConfig::default(), state)
}

async fn post_list(resource: &str, bearer: Option<String>, body: &str) -> (StatusCode, Value) {
    let mut request = Request::post(format!("/api/{}/list", resource))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = router()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_returns_page_shape() {
    let body = r#"{"sort": {"field": "amount", "direction": "desc"}, "limit": 3}"#;
    let (status, page) = post_list("invoice", Some(token(1, Role::User, 3600)), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 4);
    assert_eq!(page["per_page"], 3);
    assert_eq!(page["current_page"], 1);
    assert_eq!(page["last_page"], 2);
    assert_eq!(page["data"][0]["invoice_number"], "INV-004");
    assert_eq!(page["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_body_uses_defaults() {
    let (status, page) = post_list("invoice", Some(token(2, Role::User, 3600)), "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["per_page"], 10);
}

#[tokio::test]
async fn test_admin_is_not_scoped() {
    let (status, page) = post_list("invoice", Some(token(99, Role::Admin, 3600)), "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 6);
}

#[tokio::test]
async fn test_missing_and_expired_token_rejected() {
    let (status, body) = post_list("invoice", None, "{}").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "RG_AUTH_REQUIRED");
    assert_eq!(body["status"], 401);

    let (status, body) = post_list("invoice", Some(token(1, Role::User, -3600)), "{}").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "RG_AUTH_TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_client_errors_are_400() {
    let bearer = || Some(token(1, Role::User, 3600));

    let unknown_field = r#"{"filters": [{"field": "__nonexistent", "operator": "equals", "value": "x"}]}"#;
    let (status, body) = post_list("invoice", bearer(), unknown_field).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RG_INVALID_FILTER_FIELD");
    assert!(body["error"].as_str().unwrap().contains("__nonexistent"));

    let unsupported = r#"{"filters": [{"field": "amount", "fieldType": "number", "operator": "contains", "value": 1}]}"#;
    let (status, body) = post_list("invoice", bearer(), unsupported).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RG_UNSUPPORTED_OPERATOR");

    let (status, body) = post_list("invoice", bearer(), r#"{"limit": 5000}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RG_LIMIT_EXCEEDED");

    let (status, body) = post_list("invoice", bearer(), "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RG_MALFORMED_REQUEST");
}

#[tokio::test]
async fn test_unknown_resource_is_404() {
    let (status, body) = post_list("widgets", Some(token(1, Role::User, 3600)), "{}").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RG_UNKNOWN_RESOURCE");
}

#[tokio::test]
async fn test_missing_table_is_500() {
    let (status, body) = post_list("ledger", Some(token(1, Role::Admin, 3600)), "{}").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "RG_CONFIGURATION_ERROR");
}
