//! HTTP routes for course registration
//!
//! - POST /courses/sort   - compute a teaching order, nothing persisted
//! - POST /courses/create - register courses and dependency edges (bearer
//!   token required)

use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::graph::CoursePair;
use crate::routes::{
    cors_preflight, error_response, json_response, method_not_allowed, parse_json_body,
    require_auth, BoxBody,
};
use crate::server::AppState;
use crate::services::CourseService;
use crate::store::Course;
use crate::types::CatalogError;

#[derive(Debug, Deserialize)]
pub struct CourseScheduleRequest {
    pub courses: Vec<CoursePair>,
}

/// One entry of the sorted teaching order
#[derive(Debug, Serialize)]
pub struct SortedCourse {
    pub course: String,
    pub order: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub data: Vec<Course>,
}

/// Reject pairs with blank names before they reach the graph engine.
fn validate_pairs(pairs: &[CoursePair]) -> Result<(), CatalogError> {
    for pair in pairs {
        if pair.desired_course.trim().is_empty() || pair.required_course.trim().is_empty() {
            return Err(CatalogError::BadRequest(
                "desiredCourse and requiredCourse must be non-empty strings".into(),
            ));
        }
    }
    Ok(())
}

/// Dispatch /courses/* requests; `None` means the path is unknown.
pub async fn handle_courses_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/courses") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    // Remove query string for matching
    let path = path.split('?').next().unwrap_or(path);

    let response = match (method, path) {
        (&Method::POST, "/courses/sort") => handle_sort(req).await,
        (&Method::POST, "/courses/create") => handle_create(req, state).await,

        (_, "/courses/sort") | (_, "/courses/create") => method_not_allowed(),

        _ => return None,
    };

    Some(response)
}

/// POST /courses/sort
///
/// Pure computation: returns the topological teaching order with zero-based
/// indices, or 400 when the pairs contain a cycle.
async fn handle_sort(req: Request<hyper::body::Incoming>) -> Response<BoxBody> {
    let body: CourseScheduleRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if let Err(e) = validate_pairs(&body.courses) {
        return error_response(e);
    }

    match CourseService::validate_order(&body.courses) {
        Ok(order) => {
            let sorted: Vec<SortedCourse> = order
                .into_iter()
                .enumerate()
                .map(|(index, course)| SortedCourse {
                    course,
                    order: index,
                })
                .collect();
            json_response(StatusCode::OK, &sorted)
        }
        Err(e) => error_response(e),
    }
}

/// POST /courses/create
///
/// Validates the schedule first; on a cycle nothing is written. Otherwise
/// registers nodes and edges idempotently and returns the desired courses
/// touched, in input order.
async fn handle_create(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(e) = require_auth(&req, &state) {
        return error_response(e);
    }

    let body: CourseScheduleRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };

    if let Err(e) = validate_pairs(&body.courses) {
        return error_response(e);
    }

    match state.courses.register_courses(&body.courses).await {
        Ok(data) => json_response(
            StatusCode::CREATED,
            &CreatedResponse {
                message: "Courses created successfully".into(),
                data,
            },
        ),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(desired: &str, required: &str) -> CoursePair {
        CoursePair {
            desired_course: desired.into(),
            required_course: required.into(),
        }
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_pairs(&[pair("", "Finance")]).is_err());
        assert!(validate_pairs(&[pair("Investment", "  ")]).is_err());
        assert!(validate_pairs(&[pair("Investment", "Finance")]).is_ok());
        assert!(validate_pairs(&[]).is_ok());
    }

    #[test]
    fn schedule_request_uses_camel_case() {
        let body = r#"{"courses":[{"desiredCourse":"Investment","requiredCourse":"Finance"}]}"#;
        let parsed: CourseScheduleRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.courses[0].desired_course, "Investment");
        assert_eq!(parsed.courses[0].required_course, "Finance");
    }
}
