//! Enrollment tracking and the unlockable-course query
//!
//! State machine per (user, course): not started -> active -> completed,
//! with completed terminal. There is no drop or restart operation.
//!
//! The single-active-course check here is check-then-act: two concurrent
//! `start` calls for one user can both observe no active course. Closing
//! that window needs a store-level transaction or conditional write; the
//! store backends do not provide one today.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::store::{Course, CourseStore, DependencyStore, Enrollment, EnrollmentStore, Stores};
use crate::types::{CatalogError, Result};

pub struct EnrollmentService {
    courses: Arc<dyn CourseStore>,
    dependencies: Arc<dyn DependencyStore>,
    enrollments: Arc<dyn EnrollmentStore>,
}

impl EnrollmentService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            courses: stores.courses.clone(),
            dependencies: stores.dependencies.clone(),
            enrollments: stores.enrollments.clone(),
        }
    }

    /// Start a course for a user.
    ///
    /// Fails with `ActiveCourseExists` if the user has any not-yet-completed
    /// enrollment (regardless of course), and with `PrerequisitesNotMet`
    /// unless every required predecessor of the course has a completed
    /// enrollment for this user.
    pub async fn start(&self, user_id: &str, course_id: &str) -> Result<Enrollment> {
        if self.enrollments.find_active(user_id).await?.is_some() {
            return Err(CatalogError::ActiveCourseExists);
        }

        let dependencies = self.dependencies.find_by_desired(course_id).await?;
        for dependency in &dependencies {
            let completed = self
                .enrollments
                .find_completed_for_course(user_id, &dependency.required_course_id)
                .await?;
            if completed.is_none() {
                debug!(
                    user_id,
                    course_id,
                    required = %dependency.required_course_id,
                    "prerequisite not completed"
                );
                return Err(CatalogError::PrerequisitesNotMet);
            }
        }

        let enrollment = self.enrollments.create(user_id, course_id).await?;
        info!(user_id, course_id, "course started");
        Ok(enrollment)
    }

    /// Complete the user's active enrollment for a course.
    ///
    /// Updates the existing record in place: completion flag set, completion
    /// timestamp stamped. Fails with `NoActiveEnrollment` if the user has no
    /// active enrollment for that course.
    pub async fn complete(&self, user_id: &str, course_id: &str) -> Result<Enrollment> {
        let active = self
            .enrollments
            .find_active_for_course(user_id, course_id)
            .await?
            .ok_or(CatalogError::NoActiveEnrollment)?;

        let enrollment = self.enrollments.complete(&active.id).await?;
        info!(user_id, course_id, "course completed");
        Ok(enrollment)
    }

    /// Courses the user may consider starting next.
    ///
    /// With no completions, returns every course that has no prerequisite at
    /// all. Otherwise returns courses with at least one completed
    /// prerequisite that the user has not completed yet - ANY satisfied
    /// prerequisite unlocks, unlike `start` which demands all of them. The
    /// asymmetry is intentional and must not be reconciled here.
    pub async fn unlockable(&self, user_id: &str) -> Result<Vec<Course>> {
        if user_id.is_empty() {
            return Err(CatalogError::MissingUserId);
        }

        let completed: HashSet<String> = self
            .enrollments
            .list_completed(user_id)
            .await?
            .into_iter()
            .map(|enrollment| enrollment.course_id)
            .collect();

        let edges = self.dependencies.list_all().await?;
        let courses = self.courses.list_all().await?;

        if completed.is_empty() {
            let has_prerequisite: HashSet<&str> = edges
                .iter()
                .map(|edge| edge.desired_course_id.as_str())
                .collect();
            return Ok(courses
                .into_iter()
                .filter(|course| !has_prerequisite.contains(course.id.as_str()))
                .collect());
        }

        let by_id: HashMap<&str, &Course> = courses
            .iter()
            .map(|course| (course.id.as_str(), course))
            .collect();

        let mut seen = HashSet::new();
        let mut unlockable = Vec::new();
        for edge in &edges {
            if completed.contains(&edge.required_course_id)
                && !completed.contains(&edge.desired_course_id)
                && seen.insert(edge.desired_course_id.clone())
            {
                if let Some(course) = by_id.get(edge.desired_course_id.as_str()) {
                    unlockable.push((*course).clone());
                }
            }
        }
        Ok(unlockable)
    }

    /// The user's active enrollment, if any. Used by tests and diagnostics.
    pub async fn active(&self, user_id: &str) -> Result<Option<Enrollment>> {
        self.enrollments.find_active(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CoursePair;
    use crate::services::CourseService;
    use crate::store::Stores;

    fn pairs(raw: &[(&str, &str)]) -> Vec<CoursePair> {
        raw.iter()
            .map(|(desired, required)| CoursePair {
                desired_course: desired.to_string(),
                required_course: required.to_string(),
            })
            .collect()
    }

    /// Registers the standard fixture graph and returns the two services.
    ///
    /// Finance -> Investment -> {InvestmentManagement, PortfolioTheories},
    /// PortfolioTheories -> PortfolioConstruction,
    /// InvestmentManagement -> InvestmentStyle.
    async fn fixture(stores: &Stores) -> (CourseService, EnrollmentService) {
        let courses = CourseService::new(stores);
        courses
            .register_courses(&pairs(&[
                ("Investment", "Finance"),
                ("InvestmentManagement", "Investment"),
                ("PortfolioTheories", "Investment"),
                ("PortfolioConstruction", "PortfolioTheories"),
                ("InvestmentStyle", "InvestmentManagement"),
            ]))
            .await
            .unwrap();
        (courses, EnrollmentService::new(stores))
    }

    async fn course_id(stores: &Stores, name: &str) -> String {
        stores
            .courses
            .find_by_name(name)
            .await
            .unwrap()
            .expect("course registered")
            .id
    }

    #[tokio::test]
    async fn start_rejects_second_active_course() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;
        let finance = course_id(&stores, "Finance").await;
        let investment = course_id(&stores, "Investment").await;

        enrollments.start("user-1", &finance).await.unwrap();

        let err = enrollments.start("user-1", &investment).await.unwrap_err();
        assert!(matches!(err, CatalogError::ActiveCourseExists));
    }

    #[tokio::test]
    async fn start_requires_all_prerequisites_completed() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;
        let finance = course_id(&stores, "Finance").await;
        let investment = course_id(&stores, "Investment").await;

        let err = enrollments.start("user-1", &investment).await.unwrap_err();
        assert!(matches!(err, CatalogError::PrerequisitesNotMet));

        // Complete the prerequisite, then the retried start succeeds.
        enrollments.start("user-1", &finance).await.unwrap();
        enrollments.complete("user-1", &finance).await.unwrap();

        let enrollment = enrollments.start("user-1", &investment).await.unwrap();
        assert!(!enrollment.is_completed);
        assert!(enrollment.completed_at.is_none());
    }

    #[tokio::test]
    async fn complete_without_active_enrollment_fails() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;
        let finance = course_id(&stores, "Finance").await;

        let err = enrollments.complete("user-1", &finance).await.unwrap_err();
        assert!(matches!(err, CatalogError::NoActiveEnrollment));
    }

    #[tokio::test]
    async fn complete_updates_the_started_record() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;
        let finance = course_id(&stores, "Finance").await;

        let started = enrollments.start("user-1", &finance).await.unwrap();
        let completed = enrollments.complete("user-1", &finance).await.unwrap();

        assert_eq!(started.id, completed.id);
        assert!(completed.is_completed);
        assert!(completed.completed_at.is_some());
        assert!(enrollments.active("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn completed_course_cannot_be_completed_again() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;
        let finance = course_id(&stores, "Finance").await;

        enrollments.start("user-1", &finance).await.unwrap();
        enrollments.complete("user-1", &finance).await.unwrap();

        let err = enrollments.complete("user-1", &finance).await.unwrap_err();
        assert!(matches!(err, CatalogError::NoActiveEnrollment));
    }

    #[tokio::test]
    async fn unlockable_requires_user_id() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;

        let err = enrollments.unlockable("").await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingUserId));
    }

    #[tokio::test]
    async fn unlockable_with_no_completions_returns_roots() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;

        let courses = enrollments.unlockable("user-1").await.unwrap();
        let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();

        // Finance is the only course with no incoming dependency edge.
        assert_eq!(names, vec!["Finance"]);
    }

    #[tokio::test]
    async fn unlockable_uses_any_satisfied_prerequisite() {
        let stores = Stores::memory();
        let courses = CourseService::new(&stores);
        // C requires both A and B.
        courses
            .register_courses(&pairs(&[("C", "A"), ("C", "B")]))
            .await
            .unwrap();
        let enrollments = EnrollmentService::new(&stores);

        let a = course_id(&stores, "A").await;
        enrollments.start("user-1", &a).await.unwrap();
        enrollments.complete("user-1", &a).await.unwrap();

        // start would refuse C (B is not completed), but the unlock query
        // advertises it on the strength of A alone.
        let unlockable = enrollments.unlockable("user-1").await.unwrap();
        let names: HashSet<&str> = unlockable.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains("C"));

        let c = course_id(&stores, "C").await;
        let err = enrollments.start("user-1", &c).await.unwrap_err();
        assert!(matches!(err, CatalogError::PrerequisitesNotMet));
    }

    #[tokio::test]
    async fn unlockable_excludes_completed_and_deduplicates() {
        let stores = Stores::memory();
        let (_, enrollments) = fixture(&stores).await;
        let finance = course_id(&stores, "Finance").await;
        let investment = course_id(&stores, "Investment").await;

        enrollments.start("user-1", &finance).await.unwrap();
        enrollments.complete("user-1", &finance).await.unwrap();
        enrollments.start("user-1", &investment).await.unwrap();
        enrollments.complete("user-1", &investment).await.unwrap();

        let unlockable = enrollments.unlockable("user-1").await.unwrap();
        let names: HashSet<&str> = unlockable.iter().map(|c| c.name.as_str()).collect();

        // Investment is completed, so it no longer appears even though
        // Finance unlocks it; its two dependents do.
        assert_eq!(
            names,
            HashSet::from(["InvestmentManagement", "PortfolioTheories"])
        );

        // Each course appears once.
        assert_eq!(unlockable.len(), names.len());
    }
}
