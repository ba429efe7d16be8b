//! Dependency edge document schema
//!
//! Directed edge `required -> desired` between two resolved course
//! documents. Edge identity is the pair of course ObjectIds, enforced by a
//! unique compound index, so re-registering the same pair is a no-op.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for dependency edges
pub const DEPENDENCY_COLLECTION: &str = "course_dependencies";

/// Dependency edge document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DependencyDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Course that requires the prerequisite
    pub desired_course_id: ObjectId,

    /// Prerequisite course
    pub required_course_id: ObjectId,
}

impl DependencyDoc {
    pub fn new(desired_course_id: ObjectId, required_course_id: ObjectId) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            desired_course_id,
            required_course_id,
        }
    }
}

impl IntoIndexes for DependencyDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One edge per (desired, required) pair
            (
                doc! { "desired_course_id": 1, "required_course_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("edge_unique".to_string())
                        .build(),
                ),
            ),
            // Prerequisite lookups by desired course
            (
                doc! { "desired_course_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("desired_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for DependencyDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
