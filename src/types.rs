//! Error types for Curricula

use hyper::StatusCode;

/// Main error type for catalog operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The submitted prerequisite pairs admit no topological order.
    #[error("Cyclic dependency detected in courses")]
    CyclicDependency,

    /// The user already has an enrollment that is not completed.
    #[error("You already have an active course.")]
    ActiveCourseExists,

    /// At least one required course is not completed for this user.
    #[error("You must complete all prerequisites to start this course.")]
    PrerequisitesNotMet,

    /// No not-yet-completed enrollment exists for this user and course.
    #[error("No active course found to complete.")]
    NoActiveEnrollment,

    #[error("User ID is required")]
    MissingUserId,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl CatalogError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CyclicDependency => StatusCode::BAD_REQUEST,
            Self::ActiveCourseExists => StatusCode::BAD_REQUEST,
            Self::PrerequisitesNotMet => StatusCode::BAD_REQUEST,
            Self::NoActiveEnrollment => StatusCode::NOT_FOUND,
            Self::MissingUserId => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = self.to_string();
        (status, body)
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for CatalogError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for CatalogError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Unauthorized(format!("JWT error: {}", err))
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(
            CatalogError::CyclicDependency.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::ActiveCourseExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::NoActiveEnrollment.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::MissingUserId.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn cyclic_dependency_message_is_stable() {
        // Clients match on this string; it is part of the API surface.
        let (status, body) = CatalogError::CyclicDependency.into_status_code_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Cyclic dependency detected in courses");
    }
}
