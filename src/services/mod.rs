//! Application services
//!
//! Business logic between the HTTP routes and the entity store. Each
//! service owns the repository handles it needs; wiring happens once at
//! startup in `AppState`.

pub mod accounts;
pub mod courses;
pub mod enrollments;

pub use accounts::{AccountService, Session};
pub use courses::CourseService;
pub use enrollments::EnrollmentService;
