//! Prerequisite graph engine
//!
//! Builds an ephemeral, request-scoped dependency graph from
//! (desired, required) course-name pairs and computes a deterministic
//! topological teaching order over it.

pub mod builder;
pub mod sort;

pub use builder::{CourseGraph, CoursePair};
pub use sort::topo_sort;
