//! Topological ordering via Kahn's algorithm
//!
//! The queue is seeded with zero-in-degree nodes in first-seen order and
//! drained FIFO, so ties are always broken by input order and the output is
//! reproducible run to run.

use std::collections::VecDeque;

use crate::graph::CourseGraph;
use crate::types::CatalogError;

/// Compute a teaching order for the graph.
///
/// Returns each distinct course name exactly once, every required course
/// ahead of its desired courses. Fails with `CyclicDependency` when the
/// graph admits no such order; no partial result is returned.
pub fn topo_sort(graph: &CourseGraph) -> Result<Vec<String>, CatalogError> {
    let mut in_degree = graph.in_degrees().to_vec();

    let mut queue: VecDeque<usize> = VecDeque::new();
    for (idx, &degree) in in_degree.iter().enumerate() {
        if degree == 0 {
            queue.push_back(idx);
        }
    }

    let mut sorted = Vec::with_capacity(graph.len());
    while let Some(idx) = queue.pop_front() {
        sorted.push(graph.name(idx).to_string());

        for &dependent in graph.dependents_of(idx) {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if sorted.len() != graph.len() {
        return Err(CatalogError::CyclicDependency);
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CoursePair;

    fn pairs(raw: &[(&str, &str)]) -> Vec<CoursePair> {
        raw.iter()
            .map(|(desired, required)| CoursePair {
                desired_course: desired.to_string(),
                required_course: required.to_string(),
            })
            .collect()
    }

    fn sort(raw: &[(&str, &str)]) -> Result<Vec<String>, CatalogError> {
        topo_sort(&CourseGraph::from_pairs(&pairs(raw)))
    }

    #[test]
    fn orders_requirements_before_dependents() {
        let input = pairs(&[
            ("Investment", "Finance"),
            ("InvestmentManagement", "Investment"),
            ("PortfolioTheories", "Investment"),
            ("PortfolioConstruction", "PortfolioTheories"),
            ("InvestmentStyle", "InvestmentManagement"),
        ]);
        let sorted = topo_sort(&CourseGraph::from_pairs(&input)).unwrap();

        assert_eq!(
            sorted,
            vec![
                "Finance",
                "Investment",
                "InvestmentManagement",
                "PortfolioTheories",
                "InvestmentStyle",
                "PortfolioConstruction",
            ]
        );

        // Every pair's requirement must precede its dependent.
        for pair in &input {
            let req = sorted
                .iter()
                .position(|n| *n == pair.required_course)
                .unwrap();
            let des = sorted
                .iter()
                .position(|n| *n == pair.desired_course)
                .unwrap();
            assert!(req < des, "{} must precede {}", pair.required_course, pair.desired_course);
        }
    }

    #[test]
    fn each_name_appears_exactly_once() {
        let sorted = sort(&[("C", "A"), ("C", "B"), ("D", "C"), ("B", "A")]).unwrap();
        assert_eq!(sorted.len(), 4);
        let mut unique = sorted.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn multiple_roots_keep_first_seen_order() {
        // X and Y are independent roots; X's pair appears first in the
        // input, so X drains first.
        let sorted = sort(&[("B", "X"), ("C", "Y"), ("D", "B")]).unwrap();
        assert_eq!(sorted, vec!["X", "Y", "B", "C", "D"]);
    }

    #[test]
    fn detects_simple_cycle() {
        let err = sort(&[("B", "A"), ("C", "B"), ("A", "C")]).unwrap_err();
        assert!(matches!(err, CatalogError::CyclicDependency));
    }

    #[test]
    fn detects_self_dependency() {
        let err = sort(&[("A", "A")]).unwrap_err();
        assert!(matches!(err, CatalogError::CyclicDependency));
    }

    #[test]
    fn cycle_embedded_in_acyclic_graph_is_rejected() {
        let err = sort(&[("B", "A"), ("C", "B"), ("B", "C"), ("D", "A")]).unwrap_err();
        assert!(matches!(err, CatalogError::CyclicDependency));
    }

    #[test]
    fn repeated_pair_still_sorts() {
        let sorted = sort(&[("B", "A"), ("B", "A")]).unwrap();
        assert_eq!(sorted, vec!["A", "B"]);
    }

    #[test]
    fn empty_input_yields_empty_order() {
        assert_eq!(sort(&[]).unwrap(), Vec::<String>::new());
    }
}
