//! HTTP routes for authentication
//!
//! - POST /auth/register - create an account, returns a JWT
//! - POST /auth/login    - authenticate, returns a JWT
//! - GET  /auth/me       - current account info from the bearer token

use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::{
    cors_preflight, error_response, json_response, method_not_allowed, parse_json_body,
    require_auth, BoxBody,
};
use crate::server::AppState;
use crate::services::Session;
use crate::store::User;
use crate::types::CatalogError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Account fields exposed over HTTP; the password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.identifier,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub expires_at: u64,
    pub user: AccountResponse,
}

impl SessionResponse {
    fn new(message: &str, session: Session) -> Self {
        Self {
            message: message.into(),
            token: session.token,
            expires_at: session.expires_at,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AccountResponse,
}

/// Dispatch /auth/* requests; `None` means the path is unknown.
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/auth") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    // Remove query string for matching
    let path = path.split('?').next().unwrap_or(path);

    let response = match (method, path) {
        (&Method::POST, "/auth/register") => handle_register(req, state).await,
        (&Method::POST, "/auth/login") => handle_login(req, state).await,
        (&Method::GET, "/auth/me") => handle_me(req, state).await,

        (_, "/auth/register") | (_, "/auth/login") | (_, "/auth/me") => method_not_allowed(),

        _ => return None,
    };

    Some(response)
}

/// POST /auth/register
async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: RegisterRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if body.email.trim().is_empty() || body.password.is_empty() || body.name.trim().is_empty() {
        return error_response(CatalogError::BadRequest(
            "Missing required fields: email, password, name".into(),
        ));
    }

    match state
        .accounts
        .register(&body.email, &body.password, &body.name)
        .await
    {
        Ok(session) => json_response(
            StatusCode::CREATED,
            &SessionResponse::new("User registered successfully", session),
        ),
        Err(e) => error_response(e),
    }
}

/// POST /auth/login
async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: LoginRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if body.email.trim().is_empty() || body.password.is_empty() {
        return error_response(CatalogError::BadRequest(
            "Missing required fields: email, password".into(),
        ));
    }

    match state.accounts.login(&body.email, &body.password).await {
        Ok(session) => json_response(
            StatusCode::OK,
            &SessionResponse::new("User logged in successfully", session),
        ),
        Err(e) => error_response(e),
    }
}

/// GET /auth/me
async fn handle_me(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let claims = match require_auth(&req, &state) {
        Ok(claims) => claims,
        Err(e) => return error_response(e),
    };

    match state.accounts.profile(&claims.user_id).await {
        Ok(user) => json_response(
            StatusCode::OK,
            &MeResponse { user: user.into() },
        ),
        Err(e) => error_response(e),
    }
}
