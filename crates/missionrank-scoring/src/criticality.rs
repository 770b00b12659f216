//! Structural criticality of each data asset.
//!
//! # Definitions
//!
//! Scores are read off the combined graph viewed in reverse, so edges run
//! data → mission and child → parent:
//!
//! | Term          | Definition (on the reversed view) |
//! |---------------|------------|
//! | `depth(v)`    | `0` with no incoming edges, else `1 + max(depth(u))` over incoming `u → v`. |
//! | `breadth(v)`  | Number of outgoing edges of `v`. |
//! | `raw(v)`      | `breadth(v) + 1 / (depth(v) + 1)`. |
//! | `normalized`  | `1 + 3 * (raw - min) / (max - min)`, or `1` when `max == min`. |
//!
//! Nothing points at a data asset in the reversed view, so its depth is 0
//! and its breadth is the number of missions using it: `raw = uses + 1`.
//! Widely used assets score highest.
//!
//! # Traversal State
//!
//! Depths are memoized in a table allocated per [`criticality`] call and
//! dropped afterwards. The DFS is iterative with an explicit on-path set;
//! meeting a vertex that is still on the path is a cycle.

use std::collections::BTreeMap;

use fixedbitset::FixedBitSet;
use missionrank_core::{
    MissionGraph, ScoringError, StepBudget, TraversalLimits,
    graph::{Relation, Vertex, find_combined_cycles, topological_missions},
};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::{IntoNeighborsDirected, Reversed},
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Lowest normalized score.
pub const SCORE_FLOOR: f64 = 1.0;
/// Width of the normalized range: scores lie in `[1, 4]`.
pub const SCORE_SPAN: f64 = 3.0;

/// Per-data criticality scores, keyed by data id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalityReport {
    pub raw: BTreeMap<String, f64>,
    pub normalized: BTreeMap<String, f64>,
    pub depth: BTreeMap<String, usize>,
    pub breadth: BTreeMap<String, usize>,
}

impl CriticalityReport {
    /// Re-key a score map by data label instead of id.
    ///
    /// Labels are not unique; a later asset with the same label wins.
    #[must_use]
    pub fn by_label(graph: &MissionGraph, scores: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
        graph
            .data()
            .iter()
            .filter_map(|d| scores.get(&d.id).map(|s| (d.label.clone(), *s)))
            .collect()
    }
}

/// Compute criticality for every data asset.
///
/// # Errors
///
/// - [`ScoringError::CyclicHierarchy`] if the hierarchy (or, defensively,
///   the combined graph) has a cycle.
/// - [`ScoringError::ResourceLimitExceeded`] if the depth traversal and the
///   breadth counts need more than `limits.max_steps` edge visits.
#[instrument(skip_all, fields(data = graph.data_count()))]
pub fn criticality(
    graph: &MissionGraph,
    limits: &TraversalLimits,
) -> Result<CriticalityReport, ScoringError> {
    topological_missions(graph)?;

    let view = Reversed(&graph.combined);
    let mut depths = DepthTable::new(graph.combined.node_count());
    let mut budget = StepBudget::new("criticality depth traversal", limits.max_steps);

    let mut raw = BTreeMap::new();
    let mut depth = BTreeMap::new();
    let mut breadth = BTreeMap::new();

    for (col, asset) in graph.data().iter().enumerate() {
        let node = graph.data_node(col);
        let d = depths.depth_of(graph, view, node, &mut budget)?;
        let b = view.neighbors_directed(node, Direction::Outgoing).count();
        budget.charge(b)?;

        #[allow(clippy::cast_precision_loss)]
        let score = b as f64 + 1.0 / (d as f64 + 1.0);

        raw.insert(asset.id.clone(), score);
        depth.insert(asset.id.clone(), d);
        breadth.insert(asset.id.clone(), b);
    }

    let normalized = normalize_scores(&raw);

    debug!(steps = budget.used(), "criticality scoring complete");

    Ok(CriticalityReport {
        raw,
        normalized,
        depth,
        breadth,
    })
}

/// Linearly rescale scores into `[SCORE_FLOOR, SCORE_FLOOR + SCORE_SPAN]`.
///
/// All scores map to `SCORE_FLOOR` when they are equal (no range to divide by).
#[must_use]
pub fn normalize_scores(raw: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let (min, max) = raw
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });

    raw.iter()
        .map(|(id, &score)| {
            let value = if max > min {
                SCORE_FLOOR + SCORE_SPAN * (score - min) / (max - min)
            } else {
                SCORE_FLOOR
            };
            (id.clone(), value)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Depth traversal
// ---------------------------------------------------------------------------

/// Memoized longest-incoming-chain lengths for one scoring call.
struct DepthTable {
    memo: Vec<Option<usize>>,
    on_path: FixedBitSet,
}

impl DepthTable {
    fn new(vertex_count: usize) -> Self {
        Self {
            memo: vec![None; vertex_count],
            on_path: FixedBitSet::with_capacity(vertex_count),
        }
    }

    fn depth_of(
        &mut self,
        graph: &MissionGraph,
        view: Reversed<&DiGraph<Vertex, Relation>>,
        start: NodeIndex,
        budget: &mut StepBudget,
    ) -> Result<usize, ScoringError> {
        if let Some(d) = self.memo[start.index()] {
            return Ok(d);
        }

        // (node, predecessors already pushed)
        let mut stack: Vec<(NodeIndex, bool)> = vec![(start, false)];

        while let Some((node, expanded)) = stack.pop() {
            let i = node.index();

            if expanded {
                // Every predecessor is memoized by now.
                let d = view
                    .neighbors_directed(node, Direction::Incoming)
                    .map(|pred| self.memo[pred.index()].map_or(0, |pd| pd + 1))
                    .max()
                    .unwrap_or(0);
                self.memo[i] = Some(d);
                self.on_path.set(i, false);
                continue;
            }

            if self.memo[i].is_some() {
                continue;
            }
            if self.on_path.contains(i) {
                return Err(ScoringError::CyclicHierarchy {
                    components: find_combined_cycles(graph),
                });
            }

            self.on_path.insert(i);
            stack.push((node, true));
            for pred in view.neighbors_directed(node, Direction::Incoming) {
                budget.tick()?;
                if self.memo[pred.index()].is_none() {
                    stack.push((pred, false));
                }
            }
        }

        Ok(self.memo[start.index()].unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
