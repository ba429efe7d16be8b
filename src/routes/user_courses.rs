//! HTTP routes for per-user course progress
//!
//! - POST /user-courses/start      - start a course (bearer token required)
//! - POST /user-courses/complete   - complete the active course (bearer
//!   token required)
//! - GET  /user-courses/unlockable - courses the user may start next

use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::{
    cors_preflight, error_response, json_response, method_not_allowed, parse_json_body,
    query_param, require_auth, BoxBody,
};
use crate::server::AppState;
use crate::store::{Course, Enrollment};
use crate::types::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub message: String,
    pub course: Enrollment,
}

#[derive(Debug, Serialize)]
pub struct UnlockableResponse {
    pub message: String,
    pub courses: Vec<Course>,
}

fn validate_progress(body: &ProgressRequest) -> Result<(), CatalogError> {
    if body.user_id.trim().is_empty() || body.course_id.trim().is_empty() {
        return Err(CatalogError::BadRequest(
            "userId and courseId are required".into(),
        ));
    }
    Ok(())
}

/// Dispatch /user-courses/* requests; `None` means the path is unknown.
pub async fn handle_user_courses_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/user-courses") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    // Remove query string for matching
    let path = path.split('?').next().unwrap_or(path);

    let response = match (method, path) {
        (&Method::POST, "/user-courses/start") => handle_start(req, state).await,
        (&Method::POST, "/user-courses/complete") => handle_complete(req, state).await,
        (&Method::GET, "/user-courses/unlockable") => handle_unlockable(req, state).await,

        (_, "/user-courses/start")
        | (_, "/user-courses/complete")
        | (_, "/user-courses/unlockable") => method_not_allowed(),

        _ => return None,
    };

    Some(response)
}

/// POST /user-courses/start
async fn handle_start(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = require_auth(&req, &state) {
        return error_response(e);
    }

    let body: ProgressRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if let Err(e) = validate_progress(&body) {
        return error_response(e);
    }

    match state.enrollments.start(&body.user_id, &body.course_id).await {
        Ok(course) => json_response(
            StatusCode::CREATED,
            &EnrollmentResponse {
                message: "Course started successfully".into(),
                course,
            },
        ),
        Err(e) => error_response(e),
    }
}

/// POST /user-courses/complete
async fn handle_complete(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = require_auth(&req, &state) {
        return error_response(e);
    }

    let body: ProgressRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if let Err(e) = validate_progress(&body) {
        return error_response(e);
    }

    match state
        .enrollments
        .complete(&body.user_id, &body.course_id)
        .await
    {
        Ok(course) => json_response(
            StatusCode::OK,
            &EnrollmentResponse {
                message: "Course completed successfully".into(),
                course,
            },
        ),
        Err(e) => error_response(e),
    }
}

/// GET /user-courses/unlockable?userId=...
async fn handle_unlockable(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let user_id = query_param(&req, "userId").unwrap_or_default();

    match state.enrollments.unlockable(&user_id).await {
        Ok(courses) => json_response(
            StatusCode::OK,
            &UnlockableResponse {
                message: "Unlockable courses retrieved successfully".into(),
                courses,
            },
        ),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_request_requires_both_ids() {
        let missing: ProgressRequest = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert!(validate_progress(&missing).is_err());

        let blank: ProgressRequest =
            serde_json::from_str(r#"{"userId":" ","courseId":"c1"}"#).unwrap();
        assert!(validate_progress(&blank).is_err());

        let ok: ProgressRequest =
            serde_json::from_str(r#"{"userId":"u1","courseId":"c1"}"#).unwrap();
        assert!(validate_progress(&ok).is_ok());
    }
}
