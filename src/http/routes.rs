//! List and health routes

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::errors::ApiError;
use crate::auth::{CallerIdentity, TokenVerifier};
use crate::config::ResourceConfig;
use crate::engine::QueryEngine;
use crate::executor::PageResult;
use crate::planner::QueryRequest;

/// State shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    engine: QueryEngine,
    verifier: Arc<TokenVerifier>,
    /// Route name -> table
    resources: Arc<HashMap<String, String>>,
}

impl AppState {
    pub fn new<'a, I>(engine: QueryEngine, verifier: TokenVerifier, resources: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceConfig>,
    {
        let resources = resources
            .into_iter()
            .map(|r| (r.name.clone(), r.table.clone()))
            .collect();

        Self {
            engine,
            verifier: Arc::new(verifier),
            resources: Arc::new(resources),
        }
    }

    fn table_for(&self, resource: &str) -> Option<&str> {
        self.resources.get(resource).map(String::as_str)
    }
}

/// The verified caller of a request
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub CallerIdentity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        Ok(Caller(state.verifier.verify_bearer(header)?))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /api/{resource}/list` and `GET /health`
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/{resource}/list", post(list_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Caller(caller): Caller,
    body: Bytes,
) -> Result<Json<PageResult<Value>>, ApiError> {
    let table = state
        .table_for(&resource)
        .ok_or_else(|| ApiError::UnknownResource(resource.clone()))?;
    let request = parse_request(&body)?;

    // Dropping the handler (client went away) cancels the query.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let page = state.engine.list(&caller, table, request, &cancel).await?;
    Ok(Json(page))
}

/// An empty body lists with defaults
fn parse_request(body: &[u8]) -> Result<QueryRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QueryRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_request(b"").unwrap(), QueryRequest::default());
        assert_eq!(parse_request(b"  \n").unwrap(), QueryRequest::default());
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        let body = br#"{"filters": [{"field": "name", "operator": "resembles", "value": "x"}]}"#;
        assert!(matches!(parse_request(body), Err(ApiError::MalformedBody(_))));
    }

    #[test]
    fn test_parse_request_body() {
        let body = br#"{"sort": {"field": "name", "direction": "desc"}, "limit": 5}"#;
        let request = parse_request(body).unwrap();
        assert_eq!(request.limit, Some(5));
        assert!(request.sort.is_some());
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
    }
}
