#![forbid(unsafe_code)]
//! missionrank-core library.
//!
//! Builds the mission/data dependency graph that every scoring algorithm in
//! `missionrank-scoring` consumes.
//!
//! # Conventions
//!
//! - **Errors**: Domain failures are [`ScoringError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Edges**: Every edge points from the dependent to the dependency
//!   (`parent → child`, `mission → data`). See [`graph`].

pub mod config;
pub mod error;
pub mod graph;
pub mod limits;
pub mod matrix;
pub mod model;

pub use config::{PageRankConfig, ScoringConfig};
pub use error::{ErrorCode, InputFault, ScoringError};
pub use graph::{MissionGraph, Relation, Vertex};
pub use limits::{StepBudget, TraversalLimits};
pub use matrix::UsageMatrix;
pub use model::{GraphPayload, HierarchyEdge, Mission, OperationalData, UsageEdge};
