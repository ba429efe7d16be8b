//! Database schemas for Curricula
//!
//! Defines MongoDB document structures for courses, dependency edges,
//! enrollments, and user accounts.

mod course;
mod dependency;
mod enrollment;
mod metadata;
mod user;

pub use course::{CourseDoc, COURSE_COLLECTION};
pub use dependency::{DependencyDoc, DEPENDENCY_COLLECTION};
pub use enrollment::{EnrollmentDoc, ENROLLMENT_COLLECTION};
pub use metadata::Metadata;
pub use user::{UserDoc, USER_COLLECTION};
