//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. One `AppState` is
//! built at startup and shared across connections; routing is a plain
//! `match (method, path)` over the route modules.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::routes;
use crate::services::{AccountService, CourseService, EnrollmentService};
use crate::store::Stores;
use crate::types::CatalogError;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Shared application state
///
/// Explicit constructor wiring: every service gets its repository handles
/// here, once, at startup. There is no container and no lazy resolution.
pub struct AppState {
    pub args: Args,
    pub jwt: JwtValidator,
    /// Which backend the repositories run on ("mongodb" or "memory")
    pub storage_backend: &'static str,
    pub courses: CourseService,
    pub enrollments: EnrollmentService,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(args: Args, stores: Stores, storage_backend: &'static str) -> Result<Self, CatalogError> {
        let jwt = match &args.jwt_secret {
            Some(secret) => JwtValidator::new(secret.clone(), args.jwt_expiry_seconds)?,
            None if args.dev_mode => JwtValidator::new_dev(),
            None => {
                return Err(CatalogError::Config(
                    "JWT_SECRET is required in production mode".into(),
                ))
            }
        };

        let courses = CourseService::new(&stores);
        let enrollments = EnrollmentService::new(&stores);
        let accounts = AccountService::new(&stores, jwt.clone());

        Ok(Self {
            args,
            jwt,
            storage_backend,
            courses,
            enrollments,
            accounts,
        })
    }
}

/// Accept connections and serve requests until the process exits.
pub async fn run(state: Arc<AppState>) -> Result<(), CatalogError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Curricula listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - dev JWT secret in use");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // Module dispatchers consume the request when the prefix matches.
    if path.starts_with("/auth") {
        if let Some(response) = routes::handle_auth_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found_response(&path));
    }

    if path.starts_with("/courses") {
        if let Some(response) = routes::handle_courses_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found_response(&path));
    }

    if path.starts_with("/user-courses") {
        if let Some(response) = routes::handle_user_courses_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found_response(&path));
    }

    let response = match (method, path.as_str()) {
        // Liveness probe - returns 200 while the service is running
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            to_boxed(routes::health_check(Arc::clone(&state)))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => to_boxed(routes::version_info()),

        _ => not_found_response(&path),
    };

    Ok(response)
}

fn to_boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}

fn not_found_response(path: &str) -> Response<BoxBody> {
    let body = serde_json::json!({
        "error": format!("Not found: {}", path),
    })
    .to_string();

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)).map_err(|never| match never {}).boxed())
        .unwrap()
}
