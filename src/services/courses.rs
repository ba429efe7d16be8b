//! Course registry
//!
//! Validates prerequisite pairs as a dependency graph and, on success,
//! upserts course nodes and dependency edges. Registration is
//! all-or-nothing per call: cyclic input is rejected before any write.

use std::sync::Arc;

use tracing::{debug, info};

use crate::graph::{topo_sort, CourseGraph, CoursePair};
use crate::store::{Course, CourseStore, DependencyStore, Stores};
use crate::types::Result;

pub struct CourseService {
    courses: Arc<dyn CourseStore>,
    dependencies: Arc<dyn DependencyStore>,
}

impl CourseService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            courses: stores.courses.clone(),
            dependencies: stores.dependencies.clone(),
        }
    }

    /// Compute a teaching order for the pairs, or fail with
    /// `CyclicDependency`. Pure; touches no storage.
    pub fn validate_order(pairs: &[CoursePair]) -> Result<Vec<String>> {
        topo_sort(&CourseGraph::from_pairs(pairs))
    }

    /// Register courses and dependency edges from the pairs, in input order.
    ///
    /// Each pair resolves its required course first, then its desired
    /// course, creating either on first reference; the edge is keyed on the
    /// resolved ids, so resubmitting the same pairs creates nothing new.
    /// Returns the desired-course entities in input order - one entry per
    /// pair, so a course desired by several pairs appears several times.
    pub async fn register_courses(&self, pairs: &[CoursePair]) -> Result<Vec<Course>> {
        Self::validate_order(pairs)?;

        let mut registered = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let required = self.find_or_create_course(&pair.required_course).await?;
            let desired = self.find_or_create_course(&pair.desired_course).await?;

            if self
                .dependencies
                .find_by_pair(&desired.id, &required.id)
                .await?
                .is_none()
            {
                self.dependencies.create(&desired.id, &required.id).await?;
                debug!(
                    desired = %desired.name,
                    required = %required.name,
                    "created dependency edge"
                );
            }

            registered.push(desired);
        }

        info!(pairs = pairs.len(), "registered course schedule");
        Ok(registered)
    }

    async fn find_or_create_course(&self, name: &str) -> Result<Course> {
        if let Some(course) = self.courses.find_by_name(name).await? {
            return Ok(course);
        }
        self.courses.create(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Stores;
    use crate::types::CatalogError;

    fn pairs(raw: &[(&str, &str)]) -> Vec<CoursePair> {
        raw.iter()
            .map(|(desired, required)| CoursePair {
                desired_course: desired.to_string(),
                required_course: required.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn registers_nodes_and_edges_once() {
        let stores = Stores::memory();
        let service = CourseService::new(&stores);

        let input = pairs(&[("Investment", "Finance"), ("PortfolioTheories", "Investment")]);
        let registered = service.register_courses(&input).await.unwrap();

        assert_eq!(registered.len(), 2);
        assert_eq!(registered[0].name, "Investment");
        assert_eq!(registered[1].name, "PortfolioTheories");

        assert_eq!(stores.courses.list_all().await.unwrap().len(), 3);
        assert_eq!(stores.dependencies.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reregistration_is_idempotent() {
        let stores = Stores::memory();
        let service = CourseService::new(&stores);

        let input = pairs(&[("Investment", "Finance"), ("PortfolioTheories", "Investment")]);
        service.register_courses(&input).await.unwrap();
        let second = service.register_courses(&input).await.unwrap();

        assert_eq!(second.len(), 2);
        assert_eq!(stores.courses.list_all().await.unwrap().len(), 3);
        assert_eq!(stores.dependencies.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cyclic_input_persists_nothing() {
        let stores = Stores::memory();
        let service = CourseService::new(&stores);

        let input = pairs(&[("B", "A"), ("C", "B"), ("A", "C")]);
        let err = service.register_courses(&input).await.unwrap_err();
        assert!(matches!(err, CatalogError::CyclicDependency));

        assert!(stores.courses.list_all().await.unwrap().is_empty());
        assert!(stores.dependencies.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_desired_course_is_returned_per_pair() {
        let stores = Stores::memory();
        let service = CourseService::new(&stores);

        let input = pairs(&[("C", "A"), ("C", "B")]);
        let registered = service.register_courses(&input).await.unwrap();

        // Accumulation semantics: C is the desired course of both pairs.
        assert_eq!(registered.len(), 2);
        assert_eq!(registered[0].id, registered[1].id);
        assert_eq!(stores.courses.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn validate_order_is_pure() {
        let stores = Stores::memory();

        let input = pairs(&[("Investment", "Finance")]);
        let order = CourseService::validate_order(&input).unwrap();
        assert_eq!(order, vec!["Finance", "Investment"]);

        // Nothing was written.
        assert!(stores.courses.list_all().await.unwrap().is_empty());
    }
}
