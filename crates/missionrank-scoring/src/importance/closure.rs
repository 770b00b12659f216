//! Transitive dependency closures with shared sub-closures.
//!
//! # Algorithm
//!
//! 1. Kosaraju's SCC over the combined graph. petgraph returns components in
//!    reverse topological order, so every component appears after all of
//!    the components it points to. Both of its passes use an explicit
//!    stack, so deep hierarchies do not recurse.
//! 2. Walk components in that order. A component's closure is the union of
//!    the vertices its members point to and the (already computed) closures
//!    of every other component they point to.
//!
//! Every vertex of one component shares one closure, and a shared
//! descendant's closure is computed once no matter how many paths reach it.
//! Diamond-heavy graphs stay linear in the number of edges (times the
//! bitset width) instead of exponential.
//!
//! # Cost
//!
//! One step per edge, plus one step per bitset block for every closure
//! allocated and every union taken. Memory held by the table is therefore
//! bounded by the step budget.

use fixedbitset::FixedBitSet;
use missionrank_core::{MissionGraph, ScoringError, StepBudget};
use petgraph::{algo::kosaraju_scc, graph::NodeIndex};

/// Memoized closures for every vertex of one graph.
///
/// Built per scoring call; never cached across graphs.
#[derive(Debug)]
pub struct ClosureTable {
    component_of: Vec<usize>,
    closures: Vec<FixedBitSet>,
}

impl ClosureTable {
    /// Compute closures for all vertices.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::ResourceLimitExceeded`] when the edge walk and the
    ///   bitset work exceed the budget.
    /// - [`ScoringError::OrderingInvariant`] if a component is reached before
    ///   a component it depends on.
    pub fn build(graph: &MissionGraph, budget: &mut StepBudget) -> Result<Self, ScoringError> {
        let g = &graph.combined;
        let n = g.node_count();
        let components = kosaraju_scc(g);

        let mut component_of = vec![0_usize; n];
        for (k, members) in components.iter().enumerate() {
            for node in members {
                component_of[node.index()] = k;
            }
        }

        let mut closures: Vec<FixedBitSet> = Vec::with_capacity(components.len());

        for (k, members) in components.iter().enumerate() {
            let has_edges = members.iter().any(|&node| g.neighbors(node).next().is_some());
            if !has_edges {
                closures.push(FixedBitSet::new());
                continue;
            }

            let mut reach = FixedBitSet::with_capacity(n);
            let blocks = reach.as_slice().len();
            budget.charge(blocks)?;
            for &node in members {
                for target in g.neighbors(node) {
                    budget.tick()?;
                    reach.insert(target.index());

                    let tk = component_of[target.index()];
                    if tk == k {
                        continue;
                    }
                    let Some(sub) = closures.get(tk) else {
                        return Err(ScoringError::OrderingInvariant {
                            vertex: vertex_label(graph, node),
                            dependency: vertex_label(graph, target),
                        });
                    };
                    budget.charge(blocks)?;
                    reach.union_with(sub);
                }
            }
            closures.push(reach);
        }

        Ok(Self {
            component_of,
            closures,
        })
    }

    /// Every vertex reachable from `node` by one or more edges.
    ///
    /// `node` itself is included only if it lies on a cycle.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a vertex of the graph the table was built for.
    #[must_use]
    pub fn closure_of(&self, node: NodeIndex) -> &FixedBitSet {
        &self.closures[self.component_of[node.index()]]
    }

    /// Number of distinct closures computed (one per component).
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.closures.len()
    }
}

fn vertex_label(graph: &MissionGraph, node: NodeIndex) -> String {
    graph
        .vertex_id(node)
        .map_or_else(|| format!("#{}", node.index()), str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use missionrank_core::{GraphPayload, TraversalLimits};
    use petgraph::visit::Bfs;

    fn build(payload: &GraphPayload) -> MissionGraph {
        MissionGraph::build(payload, &TraversalLimits::default()).expect("build")
    }

    fn table(graph: &MissionGraph) -> ClosureTable {
        let mut budget = StepBudget::new("test", usize::MAX);
        ClosureTable::build(graph, &mut budget).expect("closures")
    }

    /// Plain BFS reachability, excluding the start unless revisited via a cycle.
    fn reachable(graph: &MissionGraph, start: NodeIndex) -> Vec<usize> {
        let g = &graph.combined;
        let mut seen: Vec<usize> = Vec::new();
        for first in g.neighbors(start) {
            let mut bfs = Bfs::new(g, first);
            while let Some(node) = bfs.next(g) {
                seen.push(node.index());
            }
        }
        seen.sort_unstable();
        seen.dedup();
        seen
    }

    fn ones(set: &FixedBitSet) -> Vec<usize> {
        set.ones().collect()
    }

    #[test]
    fn diamond_matches_plain_reachability() {
        // top → {left, right} → bottom → d
        let graph = build(
            &GraphPayload::default()
                .mission("top", "Top")
                .mission("left", "Left")
                .mission("right", "Right")
                .mission("bottom", "Bottom")
                .data_asset("d", "D")
                .child_of("left", "top")
                .child_of("right", "top")
                .child_of("bottom", "left")
                .child_of("bottom", "right")
                .uses("bottom", "d"),
        );
        let closures = table(&graph);
        for row in 0..graph.mission_count() {
            let node = graph.mission_node(row);
            assert_eq!(ones(closures.closure_of(node)), reachable(&graph, node));
        }
        assert_eq!(ones(closures.closure_of(graph.mission_node(0))), [1, 2, 3, 4]);
    }

    #[test]
    fn cycle_members_share_a_closure() {
        let graph = build(
            &GraphPayload::default()
                .mission("a", "A")
                .mission("b", "B")
                .data_asset("d", "D")
                .child_of("a", "b")
                .child_of("b", "a")
                .uses("b", "d"),
        );
        let closures = table(&graph);
        let a = graph.mission_node(0);
        let b = graph.mission_node(1);
        assert_eq!(ones(closures.closure_of(a)), [0, 1, 2]);
        assert_eq!(closures.closure_of(a), closures.closure_of(b));
        assert_eq!(ones(closures.closure_of(a)), reachable(&graph, a));
    }

    #[test]
    fn data_has_empty_closure() {
        let graph = build(
            &GraphPayload::default()
                .mission("m", "M")
                .data_asset("d", "D")
                .uses("m", "d"),
        );
        let closures = table(&graph);
        assert_eq!(closures.closure_of(graph.data_node(0)).count_ones(..), 0);
        assert_eq!(closures.component_count(), 2);
    }

    /// Steps `build` charges on an acyclic graph: every edge crosses
    /// components, so each one costs a tick and a union.
    fn acyclic_cost(graph: &MissionGraph) -> usize {
        let g = &graph.combined;
        let blocks = FixedBitSet::with_capacity(g.node_count()).as_slice().len();
        let with_edges = g
            .node_indices()
            .filter(|&node| g.neighbors(node).next().is_some())
            .count();
        g.edge_count() * (1 + blocks) + with_edges * blocks
    }

    fn mission_chain(len: usize) -> MissionGraph {
        let mut payload = GraphPayload::default();
        for i in 0..len {
            payload = payload.mission(&format!("m{i}"), "m");
        }
        for i in 1..len {
            payload = payload.child_of(&format!("m{i}"), &format!("m{}", i - 1));
        }
        build(&payload)
    }

    #[test]
    fn budget_counts_edges_not_paths() {
        // A ladder of diamonds: paths double at every rung, edges grow linearly.
        let mut payload = GraphPayload::default();
        let rungs = 20;
        for i in 0..=rungs {
            payload = payload
                .mission(&format!("j{i}"), "join")
                .mission(&format!("l{i}"), "left")
                .mission(&format!("r{i}"), "right");
        }
        for i in 0..rungs {
            payload = payload
                .child_of(&format!("l{i}"), &format!("j{i}"))
                .child_of(&format!("r{i}"), &format!("j{i}"))
                .child_of(&format!("j{}", i + 1), &format!("l{i}"))
                .child_of(&format!("j{}", i + 1), &format!("r{i}"));
        }
        let graph = build(&payload);
        let cost = acyclic_cost(&graph);
        let mut budget = StepBudget::new("test", cost);
        let closures = ClosureTable::build(&graph, &mut budget).expect("linear in edges");
        assert_eq!(budget.used(), cost);
        let top = graph.mission_node(0);
        assert_eq!(ones(closures.closure_of(top)), reachable(&graph, top));
    }

    #[test]
    fn bitset_work_is_charged() {
        // 200 vertices need 7 blocks per closure; edges alone would fit.
        let graph = mission_chain(200);
        let edges = graph.combined.edge_count();
        let mut budget = StepBudget::new("dependency closure", edges * 2);
        let err = ClosureTable::build(&graph, &mut budget).expect_err("bitsets over budget");
        assert_eq!(err.code(), missionrank_core::ErrorCode::ResourceLimitExceeded);
        assert_eq!(acyclic_cost(&graph), edges * 8 + 199 * 7);
    }

    #[test]
    fn deep_chain_builds_on_a_small_stack() {
        let graph = mission_chain(5_000);
        let worker = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let mut budget = StepBudget::new("test", usize::MAX);
                let closures = ClosureTable::build(&graph, &mut budget).expect("closures");
                closures.closure_of(graph.mission_node(0)).count_ones(..)
            })
            .expect("spawn");
        assert_eq!(worker.join().expect("no stack overflow"), 4_999);
    }
}
