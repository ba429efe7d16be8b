//! Entity store
//!
//! Domain entities and the repository interfaces the services run against.
//! Two backends implement them: `mongo` for production and `memory` for
//! dev mode without a reachable MongoDB (also used by the service tests).
//! Services never touch collections directly; everything goes through
//! these traits, so there is no lazy loading and no hidden cascade.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Result;

pub use memory::MemoryStore;
pub use mongo::MongoStores;

/// A course node. Identity is the unique name; the id is store-generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
}

/// Directed prerequisite edge `required -> desired` between resolved courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub id: String,
    pub desired_course_id: String,
    pub required_course_id: String,
}

/// Per-(user, course) progress record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub is_completed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Account record backing the authentication surface.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub identifier: String,
    pub name: String,
    pub password_hash: String,
}

/// Course nodes: find-or-create by name, lookup by id.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Course>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Course>>;
    async fn create(&self, name: &str) -> Result<Course>;
    async fn list_all(&self) -> Result<Vec<Course>>;
}

/// Dependency edges keyed on resolved course ids.
#[async_trait]
pub trait DependencyStore: Send + Sync {
    async fn find_by_pair(
        &self,
        desired_course_id: &str,
        required_course_id: &str,
    ) -> Result<Option<Dependency>>;
    async fn create(
        &self,
        desired_course_id: &str,
        required_course_id: &str,
    ) -> Result<Dependency>;
    /// All edges where the given course is the desired (downstream) side.
    async fn find_by_desired(&self, desired_course_id: &str) -> Result<Vec<Dependency>>;
    async fn list_all(&self) -> Result<Vec<Dependency>>;
}

/// Enrollment records. `create` starts a course (started_at = now);
/// `complete` flips the flag and stamps completed_at on the same record.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// The user's active enrollment, any course.
    async fn find_active(&self, user_id: &str) -> Result<Option<Enrollment>>;
    /// The user's active enrollment for one course.
    async fn find_active_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>>;
    /// The user's completed enrollment for one course.
    async fn find_completed_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>>;
    /// All of the user's completed enrollments.
    async fn list_completed(&self, user_id: &str) -> Result<Vec<Enrollment>>;
    async fn create(&self, user_id: &str, course_id: &str) -> Result<Enrollment>;
    async fn complete(&self, enrollment_id: &str) -> Result<Enrollment>;
}

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;
    async fn create(&self, identifier: &str, name: &str, password_hash: &str) -> Result<User>;
}

/// Repository bundle handed to the services at startup.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub courses: Arc<dyn CourseStore>,
    pub dependencies: Arc<dyn DependencyStore>,
    pub enrollments: Arc<dyn EnrollmentStore>,
}

impl Stores {
    /// In-memory backend, one shared store behind all four interfaces.
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            courses: store.clone(),
            dependencies: store.clone(),
            enrollments: store,
        }
    }

    /// MongoDB backend on the given client; creates collections and indexes.
    pub async fn mongo(client: &crate::db::MongoClient) -> Result<Self> {
        let stores = MongoStores::new(client).await?;
        Ok(Self {
            users: Arc::new(stores.users()),
            courses: Arc::new(stores.courses()),
            dependencies: Arc::new(stores.dependencies()),
            enrollments: Arc::new(stores.enrollments()),
        })
    }
}
