//! Unweighted shortest-path lengths from one mission.
//!
//! Plain BFS over the combined graph, counting edges. Buffers are reused
//! across sources and reset via a touched list, so scoring every mission
//! costs `O(visited)` per source instead of `O(V)`.

use std::collections::VecDeque;

use missionrank_core::{MissionGraph, ScoringError, StepBudget};
use petgraph::{Direction, graph::NodeIndex};

/// BFS state shared by successive sources of one scoring call.
#[derive(Debug)]
pub struct DistanceSearch {
    dist: Vec<Option<usize>>,
    touched: Vec<usize>,
    queue: VecDeque<NodeIndex>,
}

impl DistanceSearch {
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            dist: vec![None; vertex_count],
            touched: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Run BFS from `source`, stopping early once `wanted` data vertices
    /// have been reached.
    ///
    /// # Errors
    ///
    /// [`ScoringError::ResourceLimitExceeded`] when the edge walk exceeds the
    /// budget.
    pub fn run(
        &mut self,
        graph: &MissionGraph,
        source: NodeIndex,
        wanted: usize,
        budget: &mut StepBudget,
    ) -> Result<(), ScoringError> {
        self.reset();

        let data_start = graph.mission_count();
        let mut found = 0_usize;

        self.mark(source.index(), 0);
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            if found >= wanted {
                break;
            }
            let next = self.dist[v.index()].map_or(0, |d| d + 1);

            for w in graph.combined.neighbors_directed(v, Direction::Outgoing) {
                budget.tick()?;
                let wi = w.index();
                if self.dist[wi].is_some() {
                    continue;
                }
                self.mark(wi, next);
                if wi >= data_start {
                    found += 1;
                } else {
                    self.queue.push_back(w);
                }
            }
        }

        self.queue.clear();
        Ok(())
    }

    /// Edge count of the shortest path to `node` found by the last run.
    #[must_use]
    pub fn distance(&self, node: NodeIndex) -> Option<usize> {
        self.dist.get(node.index()).copied().flatten()
    }

    fn mark(&mut self, index: usize, d: usize) {
        self.dist[index] = Some(d);
        self.touched.push(index);
    }

    fn reset(&mut self) {
        for i in self.touched.drain(..) {
            self.dist[i] = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
