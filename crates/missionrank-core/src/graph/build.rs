//! Graph construction from an inbound payload.
//!
//! # Vertex Layout
//!
//! Vertices live in a petgraph arena addressed by dense [`NodeIndex`]:
//! missions take indices `0..M` in payload order, data assets take
//! `M..M + D` in payload order. The mission subgraph reuses the same
//! numbering, so mission row `i` is `NodeIndex::new(i)` in both graphs and
//! matrix rows/columns never need an identifier lookup.
//!
//! ## Duplicate Edges
//!
//! Repeated hierarchy or usage records collapse to a single edge so that a
//! duplicated child does not count twice in a parent's mean.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::{debug, instrument};

use crate::error::{InputFault, ScoringError};
use crate::limits::TraversalLimits;
use crate::model::{GraphPayload, Mission, OperationalData};

// ---------------------------------------------------------------------------
// Vertex / Relation
// ---------------------------------------------------------------------------

/// A vertex of the combined graph: a mission row or a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {
    Mission(usize),
    Data(usize),
}

/// Edge relation type. Both point from dependent to dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `parent → child`.
    Decomposes,
    /// `mission → data`.
    Uses,
}

// ---------------------------------------------------------------------------
// MissionGraph
// ---------------------------------------------------------------------------

/// The combined mission/data graph and the mission-only subgraph.
///
/// Immutable once built; safe to share between threads running different
/// scoring algorithms.
#[derive(Debug)]
pub struct MissionGraph {
    /// Missions and data, hierarchy and usage edges.
    pub combined: DiGraph<Vertex, Relation>,
    /// Missions and hierarchy edges only. Node weight = mission row.
    pub hierarchy: DiGraph<usize, ()>,
    missions: Vec<Mission>,
    data: Vec<OperationalData>,
    mission_index: HashMap<String, usize>,
    data_index: HashMap<String, usize>,
    content_hash: String,
}

impl MissionGraph {
    /// Build a [`MissionGraph`] from a payload.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::MalformedInput`] for empty or duplicate identifiers
    ///   and for edges naming an unknown mission or data asset.
    /// - [`ScoringError::ResourceLimitExceeded`] if the payload has more
    ///   vertices than `limits.max_vertices`.
    #[instrument(skip_all, fields(missions = payload.missions.len(), data = payload.data.len()))]
    pub fn build(payload: &GraphPayload, limits: &TraversalLimits) -> Result<Self, ScoringError> {
        let mission_count = payload.missions.len();
        let vertex_count = mission_count + payload.data.len();
        if vertex_count > limits.max_vertices {
            return Err(ScoringError::ResourceLimitExceeded {
                traversal: "graph construction",
                limit: limits.max_vertices,
            });
        }

        let mission_index = index_ids(payload.missions.iter().map(|m| m.id.as_str()), "mission")?;
        let data_index = index_ids(
            payload.data.iter().map(|d| d.id.as_str()),
            "operational data",
        )?;

        let mut combined = DiGraph::<Vertex, Relation>::with_capacity(
            vertex_count,
            payload.hierarchy.len() + payload.usage.len(),
        );
        let mut hierarchy =
            DiGraph::<usize, ()>::with_capacity(mission_count, payload.hierarchy.len());

        for row in 0..mission_count {
            combined.add_node(Vertex::Mission(row));
            hierarchy.add_node(row);
        }
        for col in 0..payload.data.len() {
            combined.add_node(Vertex::Data(col));
        }

        for edge in &payload.hierarchy {
            let child = lookup(&mission_index, &edge.child, "ChildMission", "mission")?;
            let parent = lookup(&mission_index, &edge.parent, "ParentMission", "mission")?;
            let (p, c) = (NodeIndex::new(parent), NodeIndex::new(child));

            if !hierarchy.contains_edge(p, c) {
                hierarchy.add_edge(p, c, ());
                combined.add_edge(p, c, Relation::Decomposes);
            }
        }

        for edge in &payload.usage {
            let row = lookup(&mission_index, &edge.mission, "Mission", "mission")?;
            let col = lookup(&data_index, &edge.data, "OperationalData", "operational data")?;
            let (m, d) = (NodeIndex::new(row), NodeIndex::new(mission_count + col));

            if !combined.contains_edge(m, d) {
                combined.add_edge(m, d, Relation::Uses);
            }
        }

        let content_hash = compute_content_hash(payload, &combined);

        debug!(
            vertices = combined.node_count(),
            edges = combined.edge_count(),
            hierarchy_edges = hierarchy.edge_count(),
            %content_hash,
            "mission graph built"
        );

        Ok(Self {
            combined,
            hierarchy,
            missions: payload.missions.clone(),
            data: payload.data.clone(),
            mission_index,
            data_index,
            content_hash,
        })
    }

    /// Parse a JSON payload and build the graph in one step.
    ///
    /// # Errors
    ///
    /// Any parse or build error, see [`MissionGraph::build`].
    pub fn from_json_str(json: &str, limits: &TraversalLimits) -> Result<Self, ScoringError> {
        Self::build(&GraphPayload::from_json_str(json)?, limits)
    }

    #[must_use]
    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    #[must_use]
    pub fn data_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    #[must_use]
    pub fn data(&self) -> &[OperationalData] {
        &self.data
    }

    /// Matrix row for a mission id.
    #[must_use]
    pub fn mission_row(&self, id: &str) -> Option<usize> {
        self.mission_index.get(id).copied()
    }

    /// Matrix column for a data id.
    #[must_use]
    pub fn data_column(&self, id: &str) -> Option<usize> {
        self.data_index.get(id).copied()
    }

    /// Combined-graph node of a mission row.
    #[must_use]
    pub fn mission_node(&self, row: usize) -> NodeIndex {
        NodeIndex::new(row)
    }

    /// Combined-graph node of a data column.
    #[must_use]
    pub fn data_node(&self, col: usize) -> NodeIndex {
        NodeIndex::new(self.missions.len() + col)
    }

    #[must_use]
    pub fn vertex(&self, node: NodeIndex) -> Option<Vertex> {
        self.combined.node_weight(node).copied()
    }

    /// Identifier of a combined-graph vertex.
    #[must_use]
    pub fn vertex_id(&self, node: NodeIndex) -> Option<&str> {
        match self.vertex(node)? {
            Vertex::Mission(row) => self.missions.get(row).map(|m| m.id.as_str()),
            Vertex::Data(col) => self.data.get(col).map(|d| d.id.as_str()),
        }
    }

    /// Direct hierarchy children of a mission row.
    pub fn children(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.hierarchy
            .neighbors_directed(NodeIndex::new(row), Direction::Outgoing)
            .map(|n| n.index())
    }

    /// Data columns directly used by a mission row.
    pub fn used_data(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.combined
            .edges(self.mission_node(row))
            .filter_map(|edge| match (edge.weight(), self.combined[edge.target()]) {
                (Relation::Uses, Vertex::Data(col)) => Some(col),
                _ => None,
            })
    }

    #[must_use]
    pub fn mission_labels(&self) -> Vec<String> {
        self.missions.iter().map(|m| m.label.clone()).collect()
    }

    #[must_use]
    pub fn data_labels(&self) -> Vec<String> {
        self.data.iter().map(|d| d.label.clone()).collect()
    }

    /// BLAKE3 hash of vertex ids and the canonical edge set.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn index_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
) -> Result<HashMap<String, usize>, ScoringError> {
    let mut index = HashMap::new();
    for (pos, id) in ids.enumerate() {
        if id.is_empty() {
            return Err(ScoringError::malformed(
                InputFault::EmptyIdentifier,
                format!("{kind} #{pos} has an empty UUID"),
            ));
        }
        if index.insert(id.to_string(), pos).is_some() {
            return Err(ScoringError::malformed(
                InputFault::DuplicateIdentifier,
                format!("{kind} UUID {id:?} is declared more than once"),
            ));
        }
    }
    Ok(index)
}

fn lookup(
    index: &HashMap<String, usize>,
    id: &str,
    field: &str,
    kind: &str,
) -> Result<usize, ScoringError> {
    index.get(id).copied().ok_or_else(|| {
        ScoringError::malformed(
            InputFault::UnknownIdentifier,
            format!("{field} {id:?} does not name a declared {kind}"),
        )
    })
}

fn compute_content_hash(payload: &GraphPayload, combined: &DiGraph<Vertex, Relation>) -> String {
    let mut hasher = blake3::Hasher::new();
    for mission in &payload.missions {
        hasher.update(b"m\x00");
        hasher.update(mission.id.as_bytes());
        hasher.update(b"\x00");
    }
    for data in &payload.data {
        hasher.update(b"d\x00");
        hasher.update(data.id.as_bytes());
        hasher.update(b"\x00");
    }
    for edge in combined.edge_references() {
        hasher.update(&edge.source().index().to_le_bytes());
        hasher.update(&edge.target().index().to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
