//! PageRank importance of data assets, seen from each mission.
//!
//! # Pipeline
//!
//! 1. [`pagerank::pagerank`] over the whole combined graph.
//! 2. [`closure::ClosureTable`]: every vertex a mission transitively
//!    depends on, memoized per strongly connected component.
//! 3. [`distance::DistanceSearch`]: BFS edge counts from the mission.
//! 4. For each data asset `d` in the mission's closure:
//!
//!    ```text
//!    weight(m, d) = pagerank(d) / distance(m, d)
//!    score(m, d)  = weight(m, d) / Σ weight(m, ·)
//!    ```
//!
//!    A mission whose weights sum to zero keeps zero scores.
//!
//! All working state lives for one [`importance`] call.

pub mod closure;
pub mod distance;
pub mod pagerank;

use std::collections::BTreeMap;

use missionrank_core::{MissionGraph, ScoringConfig, ScoringError, StepBudget, UsageMatrix};
use serde::Serialize;
use tracing::{debug, instrument};

pub use closure::ClosureTable;
pub use distance::DistanceSearch;
pub use pagerank::{PageRankResult, pagerank};

/// Result of the importance propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceReport {
    /// Mission id → (data id → normalized score), reachable data only.
    pub per_mission: BTreeMap<String, BTreeMap<String, f64>>,
    /// `[mission][data]` scores with explicit zeros.
    pub matrix: UsageMatrix,
    pub mission_labels: Vec<String>,
    pub data_labels: Vec<String>,
    /// Global PageRank, indexed by combined-graph node.
    pub pagerank: PageRankResult,
}

/// Compute per-mission data importance.
///
/// Cycles are allowed here: closures and distances are well defined on any
/// directed graph.
///
/// # Errors
///
/// - [`ScoringError::ResourceLimitExceeded`] if the closure walk or the
///   shortest-path searches exceed `config.limits.max_steps`.
/// - [`ScoringError::OrderingInvariant`] if closure memoization visits a
///   component before one of its successors.
#[instrument(skip_all, fields(missions = graph.mission_count(), data = graph.data_count()))]
pub fn importance(
    graph: &MissionGraph,
    config: &ScoringConfig,
) -> Result<ImportanceReport, ScoringError> {
    let ranks = pagerank(graph, &config.pagerank);

    let mut closure_budget = StepBudget::new("dependency closure", config.limits.max_steps);
    let closures = ClosureTable::build(graph, &mut closure_budget)?;

    let mut search_budget = StepBudget::new("shortest-path search", config.limits.max_steps);
    let mut search = DistanceSearch::new(graph.combined.node_count());

    let data_start = graph.mission_count();
    let mut matrix = UsageMatrix::zeros(graph.mission_count(), graph.data_count());
    let mut per_mission = BTreeMap::new();

    for (row, mission) in graph.missions().iter().enumerate() {
        let source = graph.mission_node(row);
        let reach = closures.closure_of(source);
        let wanted = reach.ones().filter(|&i| i >= data_start).count();

        search.run(graph, source, wanted, &mut search_budget)?;

        let mut weights: Vec<(usize, f64)> = Vec::with_capacity(wanted);
        for col in reach.ones().filter(|&i| i >= data_start).map(|i| i - data_start) {
            let node = graph.data_node(col);
            let Some(dist) = search.distance(node).filter(|&d| d > 0) else {
                continue;
            };
            #[allow(clippy::cast_precision_loss)]
            let weight = ranks.score(node) / dist as f64;
            weights.push((col, weight));
        }

        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let mut scores = BTreeMap::new();
        for (col, weight) in weights {
            let score = if total > 0.0 { weight / total } else { 0.0 };
            matrix.set(row, col, score);
            scores.insert(graph.data()[col].id.clone(), score);
        }
        per_mission.insert(mission.id.clone(), scores);
    }

    debug!(
        pagerank_iterations = ranks.iterations,
        converged = ranks.converged,
        components = closures.component_count(),
        closure_steps = closure_budget.used(),
        search_steps = search_budget.used(),
        "importance propagation complete"
    );

    Ok(ImportanceReport {
        per_mission,
        matrix,
        mission_labels: graph.mission_labels(),
        data_labels: graph.data_labels(),
        pagerank: ranks,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
