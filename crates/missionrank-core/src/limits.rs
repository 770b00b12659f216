//! Resource bounds for graph traversals.
//!
//! Every traversal in the scoring algorithms draws from a [`StepBudget`]
//! created for that invocation only. A dense or pathological payload fails
//! with [`ScoringError::ResourceLimitExceeded`] instead of running unbounded.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Configured traversal limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalLimits {
    /// Maximum number of vertices (missions + data) accepted by the builder.
    /// Default: 50 000.
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,
    /// Maximum number of steps any single traversal may take.
    /// Default: 50 000 000.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_vertices: default_max_vertices(),
            max_steps: default_max_steps(),
        }
    }
}

const fn default_max_vertices() -> usize {
    50_000
}

const fn default_max_steps() -> usize {
    50_000_000
}

/// A countdown of traversal steps for one named traversal.
#[derive(Debug)]
pub struct StepBudget {
    traversal: &'static str,
    limit: usize,
    used: usize,
}

impl StepBudget {
    #[must_use]
    pub const fn new(traversal: &'static str, limit: usize) -> Self {
        Self {
            traversal,
            limit,
            used: 0,
        }
    }

    /// Consume one step.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::ResourceLimitExceeded`] once the limit is passed.
    pub fn tick(&mut self) -> Result<(), ScoringError> {
        self.charge(1)
    }

    /// Consume `steps` steps at once.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::ResourceLimitExceeded`] once the limit is passed.
    pub fn charge(&mut self, steps: usize) -> Result<(), ScoringError> {
        self.used = self.used.saturating_add(steps);
        if self.used > self.limit {
            return Err(ScoringError::ResourceLimitExceeded {
                traversal: self.traversal,
                limit: self.limit,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }
}
