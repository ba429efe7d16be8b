//! Course document schema
//!
//! A course node in the prerequisite graph. Courses are created lazily on
//! first reference and never deleted in normal operation.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for courses
pub const COURSE_COLLECTION: &str = "courses";

/// Course document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CourseDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Course name, unique across the catalog
    pub name: String,
}

impl CourseDoc {
    pub fn new(name: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
        }
    }
}

impl IntoIndexes for CourseDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for CourseDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
