//! Enrollment document schema
//!
//! One record per (user, course) start. A user has at most one record with
//! `is_completed == false` at a time; `completed_at` is set exactly when
//! `is_completed` flips to true. Records are never deleted.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for enrollments
pub const ENROLLMENT_COLLECTION: &str = "user_courses";

/// Enrollment document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
// `Default` is implemented manually below (bson::DateTime is not Default).
pub struct EnrollmentDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// User who started the course
    pub user_id: ObjectId,

    /// Course being taken
    pub course_id: ObjectId,

    /// Completion flag
    #[serde(default)]
    pub is_completed: bool,

    /// When the course was started
    pub started_at: DateTime,

    /// When the course was completed, if it has been
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime>,
}

// `bson::DateTime` does not implement `Default`, so `EnrollmentDoc` cannot
// `#[derive(Default)]` like the other schemas. The `MongoCollection<T>` impl
// requires `T: Default` as a bound but never calls `T::default()`, so this
// impl only needs to exist; the epoch is the natural zero for `started_at`.
impl Default for EnrollmentDoc {
    fn default() -> Self {
        Self {
            _id: None,
            metadata: Metadata::default(),
            user_id: ObjectId::default(),
            course_id: ObjectId::default(),
            is_completed: false,
            started_at: DateTime::from_millis(0),
            completed_at: None,
        }
    }
}

impl EnrollmentDoc {
    pub fn new(user_id: ObjectId, course_id: ObjectId) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            course_id,
            is_completed: false,
            started_at: DateTime::now(),
            completed_at: None,
        }
    }
}

impl IntoIndexes for EnrollmentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Active-course and completion lookups
            (
                doc! { "user_id": 1, "is_completed": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_completion_index".to_string())
                        .build(),
                ),
            ),
            // Per-course completion checks
            (
                doc! { "user_id": 1, "course_id": 1, "is_completed": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_course_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for EnrollmentDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
