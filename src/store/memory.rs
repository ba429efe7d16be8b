//! In-memory store backend
//!
//! Keeps every record in `RwLock`-guarded vectors, preserving insertion
//! order so listings stay deterministic. Backs dev mode when MongoDB is
//! unreachable, and the service test suites.

use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;
use chrono::Utc;

use crate::store::{
    Course, CourseStore, Dependency, DependencyStore, Enrollment, EnrollmentStore, User, UserStore,
};
use crate::types::{CatalogError, Result};

/// One shared backing store behind all four repository interfaces.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    courses: RwLock<Vec<Course>>,
    dependencies: RwLock<Vec<Dependency>>,
    enrollments: RwLock<Vec<Enrollment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Course>> {
        Ok(self.courses.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Course>> {
        Ok(self
            .courses
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn create(&self, name: &str) -> Result<Course> {
        let mut courses = self.courses.write().await;
        // Uniqueness on name, same as the Mongo unique index.
        if courses.iter().any(|c| c.name == name) {
            return Err(CatalogError::Database(format!(
                "duplicate course name: {}",
                name
            )));
        }
        let course = Course {
            id: Self::next_id(),
            name: name.to_string(),
        };
        courses.push(course.clone());
        Ok(course)
    }

    async fn list_all(&self) -> Result<Vec<Course>> {
        Ok(self.courses.read().await.clone())
    }
}

#[async_trait]
impl DependencyStore for MemoryStore {
    async fn find_by_pair(
        &self,
        desired_course_id: &str,
        required_course_id: &str,
    ) -> Result<Option<Dependency>> {
        Ok(self
            .dependencies
            .read()
            .await
            .iter()
            .find(|d| {
                d.desired_course_id == desired_course_id
                    && d.required_course_id == required_course_id
            })
            .cloned())
    }

    async fn create(
        &self,
        desired_course_id: &str,
        required_course_id: &str,
    ) -> Result<Dependency> {
        let mut dependencies = self.dependencies.write().await;
        if dependencies.iter().any(|d| {
            d.desired_course_id == desired_course_id && d.required_course_id == required_course_id
        }) {
            return Err(CatalogError::Database("duplicate dependency edge".into()));
        }
        let dependency = Dependency {
            id: Self::next_id(),
            desired_course_id: desired_course_id.to_string(),
            required_course_id: required_course_id.to_string(),
        };
        dependencies.push(dependency.clone());
        Ok(dependency)
    }

    async fn find_by_desired(&self, desired_course_id: &str) -> Result<Vec<Dependency>> {
        Ok(self
            .dependencies
            .read()
            .await
            .iter()
            .filter(|d| d.desired_course_id == desired_course_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Dependency>> {
        Ok(self.dependencies.read().await.clone())
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn find_active(&self, user_id: &str) -> Result<Option<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .find(|e| e.user_id == user_id && !e.is_completed)
            .cloned())
    }

    async fn find_active_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id && !e.is_completed)
            .cloned())
    }

    async fn find_completed_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id && e.is_completed)
            .cloned())
    }

    async fn list_completed(&self, user_id: &str) -> Result<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && e.is_completed)
            .cloned()
            .collect())
    }

    async fn create(&self, user_id: &str, course_id: &str) -> Result<Enrollment> {
        let enrollment = Enrollment {
            id: Self::next_id(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            is_completed: false,
            started_at: Utc::now(),
            completed_at: None,
        };
        self.enrollments.write().await.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn complete(&self, enrollment_id: &str) -> Result<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        let record = enrollments
            .iter_mut()
            .find(|e| e.id == enrollment_id)
            .ok_or_else(|| CatalogError::NotFound("Enrollment not found".into()))?;
        record.is_completed = true;
        record.completed_at = Some(Utc::now());
        Ok(record.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.identifier == identifier)
            .cloned())
    }

    async fn create(&self, identifier: &str, name: &str, password_hash: &str) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.identifier == identifier) {
            return Err(CatalogError::Database(format!(
                "duplicate identifier: {}",
                identifier
            )));
        }
        let user = User {
            id: Self::next_id(),
            identifier: identifier.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn course_create_is_unique_by_name() {
        let store = MemoryStore::new();
        CourseStore::create(&store, "Finance").await.unwrap();
        assert!(CourseStore::create(&store, "Finance").await.is_err());

        let found = store.find_by_name("Finance").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn active_enrollment_lookup_ignores_completed() {
        let store = MemoryStore::new();
        let e = EnrollmentStore::create(&store, "u1", "c1").await.unwrap();
        assert!(store.find_active("u1").await.unwrap().is_some());

        store.complete(&e.id).await.unwrap();
        assert!(store.find_active("u1").await.unwrap().is_none());
        assert!(store
            .find_completed_for_course("u1", "c1")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn completion_stamps_timestamp_on_same_record() {
        let store = MemoryStore::new();
        let e = EnrollmentStore::create(&store, "u1", "c1").await.unwrap();
        assert!(e.completed_at.is_none());

        let done = store.complete(&e.id).await.unwrap();
        assert_eq!(done.id, e.id);
        assert!(done.is_completed);
        assert!(done.completed_at.is_some());
    }
}
