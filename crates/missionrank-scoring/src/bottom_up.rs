//! Bottom-up usage-percentage propagation.
//!
//! # Algorithm
//!
//! Missions are visited children-first (reverse topological order of the
//! hierarchy, whose edges point `parent → child`):
//!
//! ```text
//! leaf mission:      row[d] = 100 if mission uses d, else 0
//! internal mission:  row     = mean(row(child) for each direct child)
//! ```
//!
//! Usage edges on an internal mission do not contribute to its row; only
//! leaves read usage edges directly.
//!
//! # Output
//!
//! A [`BottomUpReport`] whose matrix values lie in `[0, 100]`. Results
//! depend only on the hierarchy DAG, not on which valid topological order
//! petgraph picks.

use fixedbitset::FixedBitSet;
use missionrank_core::{
    MissionGraph, ScoringError, StepBudget, TraversalLimits, UsageMatrix,
    graph::topological_missions,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Usage assigned to data a leaf mission uses directly.
pub const FULL_USAGE: f64 = 100.0;

/// Result of the bottom-up aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottomUpReport {
    /// Mission labels, one per matrix row.
    pub mission_labels: Vec<String>,
    /// Data labels, one per matrix column.
    pub data_labels: Vec<String>,
    /// `[mission][data]` usage percentages.
    pub matrix: UsageMatrix,
}

/// Compute the usage-percentage matrix.
///
/// # Errors
///
/// - [`ScoringError::CyclicHierarchy`] if the mission hierarchy has a cycle.
/// - [`ScoringError::ResourceLimitExceeded`] if aggregation needs more than
///   `limits.max_steps` cell updates.
/// - [`ScoringError::OrderingInvariant`] if a parent is reached before one
///   of its children.
#[instrument(skip_all, fields(missions = graph.mission_count(), data = graph.data_count()))]
pub fn bottom_up(
    graph: &MissionGraph,
    limits: &TraversalLimits,
) -> Result<BottomUpReport, ScoringError> {
    let order = topological_missions(graph)?;
    let cols = graph.data_count();

    let mut matrix = UsageMatrix::zeros(graph.mission_count(), cols);
    let mut computed = FixedBitSet::with_capacity(graph.mission_count());
    let mut budget = StepBudget::new("bottom-up aggregation", limits.max_steps);
    let mut leaves = 0_usize;

    for &row in order.iter().rev() {
        let children: Vec<usize> = graph.children(row).collect();

        if children.is_empty() {
            leaves += 1;
            for col in graph.used_data(row) {
                budget.tick()?;
                matrix.set(row, col, FULL_USAGE);
            }
        } else {
            let mut sum = vec![0.0_f64; cols];
            for &child in &children {
                if !computed.contains(child) {
                    return Err(ScoringError::OrderingInvariant {
                        vertex: graph.missions()[row].id.clone(),
                        dependency: graph.missions()[child].id.clone(),
                    });
                }
                budget.charge(cols.max(1))?;
                for (acc, value) in sum.iter_mut().zip(matrix.row(child)) {
                    *acc += value;
                }
            }

            #[allow(clippy::cast_precision_loss)]
            let n = children.len() as f64;
            for (cell, acc) in matrix.row_mut(row).iter_mut().zip(sum) {
                *cell = acc / n;
            }
        }

        computed.insert(row);
    }

    debug!(leaves, steps = budget.used(), "bottom-up aggregation complete");

    Ok(BottomUpReport {
        mission_labels: graph.mission_labels(),
        data_labels: graph.data_labels(),
        matrix,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
