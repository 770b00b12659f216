//! Cycle detection and topological ordering for the mission hierarchy.
//!
//! A cyclic hierarchy is rejected input: every algorithm that needs an
//! order reports [`ScoringError::CyclicHierarchy`] with the offending
//! strongly connected components instead of continuing without one.

#![allow(clippy::module_name_repetitions)]

use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::ScoringError;
use crate::graph::build::MissionGraph;

/// Missions in topological order (parents before children).
///
/// Reverse the result to visit children first.
///
/// # Errors
///
/// Returns [`ScoringError::CyclicHierarchy`] listing every cyclic component
/// if the hierarchy is not a DAG.
pub fn topological_missions(graph: &MissionGraph) -> Result<Vec<usize>, ScoringError> {
    toposort(&graph.hierarchy, None)
        .map(|order| order.into_iter().map(NodeIndex::index).collect())
        .map_err(|_| ScoringError::CyclicHierarchy {
            components: find_hierarchy_cycles(graph),
        })
}

/// Find all cycles in the mission hierarchy.
///
/// Each entry is a sorted list of mission ids in one strongly connected
/// component. Self-loops are reported as a one-element cycle.
#[must_use]
pub fn find_hierarchy_cycles(graph: &MissionGraph) -> Vec<Vec<String>> {
    cyclic_components(&graph.hierarchy, |node| {
        graph.vertex_id(graph.mission_node(node.index()))
    })
}

/// Find all cycles in the combined mission/data graph.
#[must_use]
pub fn find_combined_cycles(graph: &MissionGraph) -> Vec<Vec<String>> {
    cyclic_components(&graph.combined, |node| graph.vertex_id(node))
}

fn cyclic_components<'g, N, E>(
    g: &DiGraph<N, E>,
    id_of: impl Fn(NodeIndex) -> Option<&'g str>,
) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(g)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| g.find_edge(*node, *node).is_some())
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|idx| {
                    id_of(idx).map_or_else(|| format!("#{}", idx.index()), str::to_string)
                })
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
