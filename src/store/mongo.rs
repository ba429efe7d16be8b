//! MongoDB store backend
//!
//! Implements the repository interfaces on top of the typed collection
//! wrapper. Each trait method is a single filter or update; uniqueness of
//! course names, user identifiers, and dependency pairs is enforced by the
//! collection indexes declared in `db::schemas`.

use bson::{doc, oid::ObjectId, DateTime};

use async_trait::async_trait;

use crate::db::schemas::{
    CourseDoc, DependencyDoc, EnrollmentDoc, UserDoc, COURSE_COLLECTION, DEPENDENCY_COLLECTION,
    ENROLLMENT_COLLECTION, USER_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::store::{
    Course, CourseStore, Dependency, DependencyStore, Enrollment, EnrollmentStore, User, UserStore,
};
use crate::types::{CatalogError, Result};

fn parse_oid(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| CatalogError::BadRequest(format!("Invalid id: {}", id)))
}

fn doc_id(id: Option<ObjectId>) -> Result<String> {
    id.map(|oid| oid.to_hex())
        .ok_or_else(|| CatalogError::Database("Document missing _id".into()))
}

/// Typed collections for all four record types.
pub struct MongoStores {
    users: MongoCollection<UserDoc>,
    courses: MongoCollection<CourseDoc>,
    dependencies: MongoCollection<DependencyDoc>,
    enrollments: MongoCollection<EnrollmentDoc>,
}

impl MongoStores {
    /// Open (and index) all collections.
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            users: client.collection(USER_COLLECTION).await?,
            courses: client.collection(COURSE_COLLECTION).await?,
            dependencies: client.collection(DEPENDENCY_COLLECTION).await?,
            enrollments: client.collection(ENROLLMENT_COLLECTION).await?,
        })
    }

    pub fn users(&self) -> MongoUserStore {
        MongoUserStore {
            collection: self.users.clone(),
        }
    }

    pub fn courses(&self) -> MongoCourseStore {
        MongoCourseStore {
            collection: self.courses.clone(),
        }
    }

    pub fn dependencies(&self) -> MongoDependencyStore {
        MongoDependencyStore {
            collection: self.dependencies.clone(),
        }
    }

    pub fn enrollments(&self) -> MongoEnrollmentStore {
        MongoEnrollmentStore {
            collection: self.enrollments.clone(),
        }
    }
}

pub struct MongoCourseStore {
    collection: MongoCollection<CourseDoc>,
}

impl TryFrom<CourseDoc> for Course {
    type Error = CatalogError;

    fn try_from(doc: CourseDoc) -> Result<Self> {
        Ok(Course {
            id: doc_id(doc._id)?,
            name: doc.name,
        })
    }
}

#[async_trait]
impl CourseStore for MongoCourseStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Course>> {
        let oid = parse_oid(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(Course::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Course>> {
        self.collection
            .find_one(doc! { "name": name })
            .await?
            .map(Course::try_from)
            .transpose()
    }

    async fn create(&self, name: &str) -> Result<Course> {
        let inserted = self
            .collection
            .insert_one(CourseDoc::new(name.to_string()))
            .await?;
        Ok(Course {
            id: inserted.to_hex(),
            name: name.to_string(),
        })
    }

    async fn list_all(&self) -> Result<Vec<Course>> {
        self.collection
            .find_many(doc! {})
            .await?
            .into_iter()
            .map(Course::try_from)
            .collect()
    }
}

pub struct MongoDependencyStore {
    collection: MongoCollection<DependencyDoc>,
}

impl TryFrom<DependencyDoc> for Dependency {
    type Error = CatalogError;

    fn try_from(doc: DependencyDoc) -> Result<Self> {
        Ok(Dependency {
            id: doc_id(doc._id)?,
            desired_course_id: doc.desired_course_id.to_hex(),
            required_course_id: doc.required_course_id.to_hex(),
        })
    }
}

#[async_trait]
impl DependencyStore for MongoDependencyStore {
    async fn find_by_pair(
        &self,
        desired_course_id: &str,
        required_course_id: &str,
    ) -> Result<Option<Dependency>> {
        let desired = parse_oid(desired_course_id)?;
        let required = parse_oid(required_course_id)?;
        self.collection
            .find_one(doc! {
                "desired_course_id": desired,
                "required_course_id": required,
            })
            .await?
            .map(Dependency::try_from)
            .transpose()
    }

    async fn create(
        &self,
        desired_course_id: &str,
        required_course_id: &str,
    ) -> Result<Dependency> {
        let desired = parse_oid(desired_course_id)?;
        let required = parse_oid(required_course_id)?;
        let inserted = self
            .collection
            .insert_one(DependencyDoc::new(desired, required))
            .await?;
        Ok(Dependency {
            id: inserted.to_hex(),
            desired_course_id: desired.to_hex(),
            required_course_id: required.to_hex(),
        })
    }

    async fn find_by_desired(&self, desired_course_id: &str) -> Result<Vec<Dependency>> {
        let desired = parse_oid(desired_course_id)?;
        self.collection
            .find_many(doc! { "desired_course_id": desired })
            .await?
            .into_iter()
            .map(Dependency::try_from)
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<Dependency>> {
        self.collection
            .find_many(doc! {})
            .await?
            .into_iter()
            .map(Dependency::try_from)
            .collect()
    }
}

pub struct MongoEnrollmentStore {
    collection: MongoCollection<EnrollmentDoc>,
}

impl TryFrom<EnrollmentDoc> for Enrollment {
    type Error = CatalogError;

    fn try_from(doc: EnrollmentDoc) -> Result<Self> {
        Ok(Enrollment {
            id: doc_id(doc._id)?,
            user_id: doc.user_id.to_hex(),
            course_id: doc.course_id.to_hex(),
            is_completed: doc.is_completed,
            started_at: doc.started_at.to_chrono(),
            completed_at: doc.completed_at.map(|at| at.to_chrono()),
        })
    }
}

#[async_trait]
impl EnrollmentStore for MongoEnrollmentStore {
    async fn find_active(&self, user_id: &str) -> Result<Option<Enrollment>> {
        let user = parse_oid(user_id)?;
        self.collection
            .find_one(doc! { "user_id": user, "is_completed": false })
            .await?
            .map(Enrollment::try_from)
            .transpose()
    }

    async fn find_active_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>> {
        let user = parse_oid(user_id)?;
        let course = parse_oid(course_id)?;
        self.collection
            .find_one(doc! {
                "user_id": user,
                "course_id": course,
                "is_completed": false,
            })
            .await?
            .map(Enrollment::try_from)
            .transpose()
    }

    async fn find_completed_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>> {
        let user = parse_oid(user_id)?;
        let course = parse_oid(course_id)?;
        self.collection
            .find_one(doc! {
                "user_id": user,
                "course_id": course,
                "is_completed": true,
            })
            .await?
            .map(Enrollment::try_from)
            .transpose()
    }

    async fn list_completed(&self, user_id: &str) -> Result<Vec<Enrollment>> {
        let user = parse_oid(user_id)?;
        self.collection
            .find_many(doc! { "user_id": user, "is_completed": true })
            .await?
            .into_iter()
            .map(Enrollment::try_from)
            .collect()
    }

    async fn create(&self, user_id: &str, course_id: &str) -> Result<Enrollment> {
        let user = parse_oid(user_id)?;
        let course = parse_oid(course_id)?;
        let record = EnrollmentDoc::new(user, course);
        let started_at = record.started_at.to_chrono();
        let inserted = self.collection.insert_one(record).await?;
        Ok(Enrollment {
            id: inserted.to_hex(),
            user_id: user.to_hex(),
            course_id: course.to_hex(),
            is_completed: false,
            started_at,
            completed_at: None,
        })
    }

    async fn complete(&self, enrollment_id: &str) -> Result<Enrollment> {
        let oid = parse_oid(enrollment_id)?;
        let existing = self
            .collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(|| CatalogError::NotFound("Enrollment not found".into()))?;

        let completed_at = DateTime::now();
        self.collection
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": {
                    "is_completed": true,
                    "completed_at": completed_at,
                    "metadata.updated_at": DateTime::now(),
                }},
            )
            .await?;

        let mut enrollment = Enrollment::try_from(existing)?;
        enrollment.is_completed = true;
        enrollment.completed_at = Some(completed_at.to_chrono());
        Ok(enrollment)
    }
}

pub struct MongoUserStore {
    collection: MongoCollection<UserDoc>,
}

impl TryFrom<UserDoc> for User {
    type Error = CatalogError;

    fn try_from(doc: UserDoc) -> Result<Self> {
        Ok(User {
            id: doc_id(doc._id)?,
            identifier: doc.identifier,
            name: doc.name,
            password_hash: doc.password_hash,
        })
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let oid = parse_oid(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        self.collection
            .find_one(doc! { "identifier": identifier })
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, identifier: &str, name: &str, password_hash: &str) -> Result<User> {
        let inserted = self
            .collection
            .insert_one(UserDoc::new(
                identifier.to_string(),
                name.to_string(),
                password_hash.to_string(),
            ))
            .await?;
        Ok(User {
            id: inserted.to_hex(),
            identifier: identifier.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        })
    }
}
