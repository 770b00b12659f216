#![forbid(unsafe_code)]
//! missionrank-scoring library.
//!
//! Three independent scorers over one [`MissionGraph`]:
//!
//! | Scorer                        | Output                                   |
//! |-------------------------------|------------------------------------------|
//! | [`bottom_up::bottom_up`]      | usage percentage per (mission, data)     |
//! | [`criticality::criticality`]  | structural score per data asset, `[1,4]` |
//! | [`importance::importance`]    | PageRank share per (mission, data)       |
//!
//! None of them keeps state between calls: visited sets, memo tables and
//! step budgets are allocated per invocation.
//!
//! # Conventions
//!
//! - **Errors**: Scorers return `Result<_, ScoringError>`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod bottom_up;
pub mod criticality;
pub mod importance;

pub use bottom_up::{BottomUpReport, bottom_up};
pub use criticality::{CriticalityReport, criticality};
pub use importance::{ImportanceReport, importance};
pub use missionrank_core::{MissionGraph, ScoringConfig, ScoringError};
