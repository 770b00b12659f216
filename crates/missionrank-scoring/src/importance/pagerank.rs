//! Global PageRank over the combined mission/data graph.
//!
//! # Algorithm
//!
//! Standard PageRank uses the iterative power method:
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / out_degree(u)   for each u → v
//!                     + d * Σ PR(s) / N               for each sink s
//! ```
//!
//! where `d` is the damping factor (default 0.85). Sinks (every data asset,
//! and any mission with neither children nor data) hand their rank to all
//! vertices uniformly, so the total stays 1.
//!
//! Iteration stops when the L1 norm of the rank delta drops below the
//! configured tolerance or after `max_iter` rounds.

use missionrank_core::{MissionGraph, PageRankConfig};
use petgraph::{Direction, graph::NodeIndex, visit::IntoNodeIdentifiers};
use serde::Serialize;
use tracing::{instrument, warn};

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRankResult {
    /// PageRank scores indexed by combined-graph node index.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

impl PageRankResult {
    #[must_use]
    pub fn score(&self, node: NodeIndex) -> f64 {
        self.scores.get(node.index()).copied().unwrap_or(0.0)
    }
}

/// Compute PageRank from scratch on the combined graph.
///
/// A graph with no vertices yields an empty, converged result.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.combined.node_count()))]
pub fn pagerank(graph: &MissionGraph, config: &PageRankConfig) -> PageRankResult {
    let g = &graph.combined;
    let n = g.node_count();

    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let out_degree: Vec<usize> = g
        .node_identifiers()
        .map(|node| g.neighbors_directed(node, Direction::Outgoing).count())
        .collect();

    // Initialize ranks uniformly.
    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        let dangling: f64 = out_degree
            .iter()
            .zip(&ranks)
            .filter(|(deg, _)| **deg == 0)
            .map(|(_, rank)| rank)
            .sum();
        let teleport = config.damping.mul_add(dangling / n_f64, base);

        for r in &mut new_ranks {
            *r = teleport;
        }

        // Distribute rank from each node to its outgoing neighbors.
        for node in g.node_identifiers() {
            let idx = node.index();
            if out_degree[idx] == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let share = config.damping * ranks[idx] / out_degree[idx] as f64;
            for neighbor in g.neighbors_directed(node, Direction::Outgoing) {
                new_ranks[neighbor.index()] += share;
            }
        }

        // Check convergence: L1 norm of delta.
        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            iterations,
            tolerance = config.tolerance,
            "PageRank did not converge, using last iterate"
        );
    }

    PageRankResult {
        scores: ranks,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use missionrank_core::{GraphPayload, TraversalLimits};

    fn build(payload: &GraphPayload) -> MissionGraph {
        MissionGraph::build(payload, &TraversalLimits::default()).expect("build")
    }

    fn default_config() -> PageRankConfig {
        PageRankConfig::default()
    }

    #[test]
    fn pagerank_empty_graph() {
        let result = pagerank(&build(&GraphPayload::default()), &default_config());
        assert!(result.scores.is_empty());
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn pagerank_single_node() {
        let result = pagerank(&build(&GraphPayload::default().mission("m", "M")), &default_config());
        assert_eq!(result.scores.len(), 1);
        // Single node gets all the rank.
        assert!((result.scores[0] - 1.0).abs() < 1e-4);
        assert!(result.converged);
    }

    #[test]
    fn data_outranks_the_mission_using_it() {
        let graph = build(
            &GraphPayload::default()
                .mission("m", "M")
                .data_asset("d", "D")
                .uses("m", "d"),
        );
        let result = pagerank(&graph, &default_config());
        assert!(result.converged);
        assert!(result.score(graph.data_node(0)) > result.score(graph.mission_node(0)));
    }

    #[test]
    fn shared_data_outranks_exclusive_data() {
        let graph = build(
            &GraphPayload::default()
                .mission("a", "A")
                .mission("b", "B")
                .data_asset("shared", "Shared")
                .data_asset("solo", "Solo")
                .uses("a", "shared")
                .uses("b", "shared")
                .uses("a", "solo"),
        );
        let result = pagerank(&graph, &default_config());
        assert!(result.score(graph.data_node(0)) > result.score(graph.data_node(1)));
    }

    #[test]
    fn pagerank_scores_sum_to_one() {
        let graph = build(
            &GraphPayload::default()
                .mission("root", "Root")
                .mission("a", "A")
                .mission("b", "B")
                .data_asset("d0", "D0")
                .data_asset("d1", "D1")
                .child_of("a", "root")
                .child_of("b", "root")
                .uses("a", "d0")
                .uses("b", "d0")
                .uses("b", "d1"),
        );
        let result = pagerank(&graph, &default_config());
        let total: f64 = result.scores.iter().sum();
        assert!(
            (total - 1.0).abs() < 1e-9,
            "PageRank scores should sum to 1.0, got {total}"
        );
    }

    #[test]
    fn pagerank_all_disconnected() {
        let graph = build(
            &GraphPayload::default()
                .mission("a", "A")
                .mission("b", "B")
                .data_asset("c", "C")
                .data_asset("d", "D"),
        );
        let result = pagerank(&graph, &default_config());
        assert!(result.converged);
        for score in &result.scores {
            assert!(
                (score - 0.25).abs() < 1e-9,
                "Isolated nodes should all have rank 0.25, got {score}"
            );
        }
    }

    #[test]
    fn pagerank_max_iter_limit() {
        let graph = build(
            &GraphPayload::default()
                .mission("a", "A")
                .mission("b", "B")
                .data_asset("c", "C")
                .child_of("b", "a")
                .uses("b", "c"),
        );
        let config = PageRankConfig {
            max_iter: 1,
            tolerance: 1e-15,
            ..default_config()
        };
        let result = pagerank(&graph, &config);
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }

    #[test]
    fn pagerank_is_deterministic() {
        let graph = build(
            &GraphPayload::default()
                .mission("a", "A")
                .mission("b", "B")
                .data_asset("c", "C")
                .child_of("b", "a")
                .uses("b", "c")
                .uses("a", "c"),
        );
        let first = pagerank(&graph, &default_config());
        let second = pagerank(&graph, &default_config());
        assert_eq!(first, second);
    }
}
