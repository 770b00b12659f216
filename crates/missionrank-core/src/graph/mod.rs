//! Mission/data dependency graph.
//!
//! # Overview
//!
//! This module turns a [`GraphPayload`](crate::model::GraphPayload) into the
//! petgraph-based structures every scoring algorithm reads:
//!
//! ```text
//! GraphPayload (missions, data, hierarchy edges, usage edges)
//!        ↓  build::MissionGraph::build()
//! MissionGraph
//!   ├─ combined:  missions + data, hierarchy + usage edges (may be cyclic)
//!   └─ hierarchy: missions only, hierarchy edges only
//!        ↓  cycles::topological_missions()
//! parents-first mission order, or CyclicHierarchy
//! ```
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **depends on** B":
//!
//! | Relation      | Payload record                          | Edge              |
//! |---------------|-----------------------------------------|-------------------|
//! | `Decomposes`  | `{ChildMission: c, ParentMission: p}`   | `p → c`           |
//! | `Uses`        | `{OperationalData: d, Mission: m}`      | `m → d`           |
//!
//! Data vertices therefore never have outgoing edges.

pub mod build;
pub mod cycles;

pub use build::{MissionGraph, Relation, Vertex};
pub use cycles::{find_combined_cycles, find_hierarchy_cycles, topological_missions};
