//! Inbound payload records.
//!
//! Field names follow the JSON wire format the scoring service has always
//! accepted:
//!
//! ```json
//! {
//!   "Mission": [{"UUID": "m1", "Name": "Recon"}],
//!   "OperationalData": [{"UUID": "d1", "Name": "Imagery"}],
//!   "MissionHierarchy": [{"ChildMission": "m1", "ParentMission": "m0"}],
//!   "Mission_OperationalData": [{"OperationalData": "d1", "Mission": "m1"}]
//! }
//! ```
//!
//! A missing collection is treated as empty. A record missing one of its
//! fields is rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InputFault, ScoringError};

/// A hierarchical objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    #[serde(rename = "UUID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub label: String,
}

impl Mission {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A data asset consumed by missions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalData {
    #[serde(rename = "UUID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub label: String,
}

impl OperationalData {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// `child` is a decomposition of `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEdge {
    #[serde(rename = "ChildMission")]
    pub child: String,
    #[serde(rename = "ParentMission")]
    pub parent: String,
}

impl HierarchyEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

/// `mission` uses `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEdge {
    #[serde(rename = "OperationalData")]
    pub data: String,
    #[serde(rename = "Mission")]
    pub mission: String,
}

impl UsageEdge {
    pub fn new(data: impl Into<String>, mission: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mission: mission.into(),
        }
    }
}

/// The complete graph description for one scoring invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPayload {
    #[serde(rename = "Mission", default)]
    pub missions: Vec<Mission>,
    #[serde(rename = "OperationalData", default)]
    pub data: Vec<OperationalData>,
    #[serde(rename = "MissionHierarchy", default)]
    pub hierarchy: Vec<HierarchyEdge>,
    #[serde(rename = "Mission_OperationalData", default)]
    pub usage: Vec<UsageEdge>,
}

impl GraphPayload {
    /// Parse a payload from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::MalformedInput`] when the JSON is invalid or a
    /// record lacks a required field.
    pub fn from_json_str(json: &str) -> Result<Self, ScoringError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a payload from a JSON byte slice.
    ///
    /// # Errors
    ///
    /// Same as [`GraphPayload::from_json_str`].
    pub fn from_json_slice(json: &[u8]) -> Result<Self, ScoringError> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Read and parse a payload file.
    ///
    /// # Errors
    ///
    /// An unreadable file is reported as [`InputFault::Unparseable`].
    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let bytes = std::fs::read(path).map_err(|err| {
            ScoringError::malformed(
                InputFault::Unparseable,
                format!("failed to read {}: {err}", path.display()),
            )
        })?;
        Self::from_json_slice(&bytes)
    }

    pub fn mission(mut self, id: &str, label: &str) -> Self {
        self.missions.push(Mission::new(id, label));
        self
    }

    pub fn data_asset(mut self, id: &str, label: &str) -> Self {
        self.data.push(OperationalData::new(id, label));
        self
    }

    pub fn child_of(mut self, child: &str, parent: &str) -> Self {
        self.hierarchy.push(HierarchyEdge::new(child, parent));
        self
    }

    pub fn uses(mut self, mission: &str, data: &str) -> Self {
        self.usage.push(UsageEdge::new(data, mission));
        self
    }
}
