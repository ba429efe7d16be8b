//! HTTP routes for Curricula
//!
//! One module per surface: course registration/sorting, per-user course
//! progress, authentication, and operational probes. Handlers parse and
//! validate input explicitly, call a service, and map `CatalogError` to a
//! status code and JSON error body.

pub mod auth_routes;
pub mod courses;
pub mod health;
pub mod user_courses;

pub use auth_routes::handle_auth_request;
pub use courses::handle_courses_request;
pub use health::{health_check, version_info};
pub use user_courses::handle_user_courses_request;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{extract_token_from_header, Claims};
use crate::server::AppState;
use crate::types::CatalogError;

pub(crate) type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Request bodies larger than this are rejected outright.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

pub(crate) fn error_response(err: CatalogError) -> Response<BoxBody> {
    let (status, message) = err.into_status_code_and_body();
    json_response(
        status,
        &ErrorResponse {
            error: message,
            code: None,
        },
    )
}

pub(crate) fn method_not_allowed() -> Response<BoxBody> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorResponse {
            error: "Method not allowed".into(),
            code: None,
        },
    )
}

pub(crate) fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub(crate) fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) async fn parse_json_body<T: for<'de> Deserialize<'de>>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, CatalogError> {
    let body = req
        .collect()
        .await
        .map_err(|e| CatalogError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > MAX_BODY_BYTES {
        return Err(CatalogError::Http("Request body too large".into()));
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| CatalogError::Http(format!("Invalid JSON: {}", e)))
}

pub(crate) fn get_auth_header(req: &Request<hyper::body::Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Resolve the bearer token to verified claims, or fail with 401.
pub(crate) fn require_auth(
    req: &Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Result<Claims, CatalogError> {
    let token = extract_token_from_header(get_auth_header(req))
        .ok_or_else(|| CatalogError::Unauthorized("Missing bearer token".into()))?;
    state.jwt.verify_token(token)
}

/// Pull a single query parameter off the request URI.
pub(crate) fn query_param(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    let query = req.uri().query()?;
    for param in query.split('&') {
        if let Some((key, value)) = param.split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}
