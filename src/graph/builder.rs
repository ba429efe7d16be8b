//! Prerequisite graph construction
//!
//! Turns a flat list of (desired, required) course-name pairs into an
//! adjacency structure and in-degree table. Nodes are interned into a
//! first-seen-ordered table so every downstream traversal is deterministic
//! regardless of hash order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single prerequisite relationship: `required` must be completed before
/// `desired` may start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePair {
    pub desired_course: String,
    pub required_course: String,
}

/// Request-scoped dependency graph over course names.
///
/// Node indices follow first-seen order of the input pairs, with each
/// pair's desired course interned before its required course.
#[derive(Debug, Default)]
pub struct CourseGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    dependents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl CourseGraph {
    /// Build the graph from an ordered sequence of pairs.
    ///
    /// Pure function of the input; performs no I/O.
    pub fn from_pairs(pairs: &[CoursePair]) -> Self {
        let mut graph = CourseGraph::default();

        for pair in pairs {
            let desired = graph.intern(&pair.desired_course);
            let required = graph.intern(&pair.required_course);

            graph.dependents[required].push(desired);
            graph.in_degree[desired] += 1;
        }

        graph
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.dependents.push(Vec::new());
        self.in_degree.push(0);
        idx
    }

    /// Number of distinct course names seen across all pairs.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn name(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    pub(crate) fn dependents_of(&self, idx: usize) -> &[usize] {
        &self.dependents[idx]
    }

    pub(crate) fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(desired: &str, required: &str) -> CoursePair {
        CoursePair {
            desired_course: desired.into(),
            required_course: required.into(),
        }
    }

    #[test]
    fn distinct_names_become_nodes() {
        let graph = CourseGraph::from_pairs(&[
            pair("Investment", "Finance"),
            pair("InvestmentManagement", "Investment"),
        ]);

        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn in_degree_counts_prerequisites() {
        let graph = CourseGraph::from_pairs(&[
            pair("C", "A"),
            pair("C", "B"),
            pair("B", "A"),
        ]);

        // C appears first, so index 0; A second; B third.
        assert_eq!(graph.in_degrees(), &[2, 0, 1]);
        assert_eq!(graph.name(0), "C");
        assert_eq!(graph.name(1), "A");
        assert_eq!(graph.name(2), "B");
    }

    #[test]
    fn required_only_names_get_zero_in_degree() {
        let graph = CourseGraph::from_pairs(&[pair("B", "A")]);

        let a = graph
            .in_degrees()
            .iter()
            .enumerate()
            .find(|(i, _)| graph.name(*i) == "A")
            .map(|(_, d)| *d);
        assert_eq!(a, Some(0));
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = CourseGraph::from_pairs(&[]);
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_pairs_accumulate_in_degree() {
        // The builder does not deduplicate input pairs; a repeated pair
        // raises the in-degree twice and the sorter will report a cycle-free
        // graph only if the count drains to zero. This mirrors the upstream
        // accumulation semantics.
        let graph = CourseGraph::from_pairs(&[pair("B", "A"), pair("B", "A")]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.in_degrees()[0], 2); // B interned first
    }
}
