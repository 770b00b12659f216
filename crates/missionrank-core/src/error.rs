use std::fmt;

/// Machine-readable error codes for scoring failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    PayloadUnparseable,
    InvalidRecord,
    EmptyIdentifier,
    DuplicateIdentifier,
    UnknownIdentifier,
    CyclicHierarchy,
    ResourceLimitExceeded,
    OrderingInvariant,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PayloadUnparseable => "E1001",
            Self::InvalidRecord => "E1002",
            Self::EmptyIdentifier => "E1003",
            Self::DuplicateIdentifier => "E1004",
            Self::UnknownIdentifier => "E1005",
            Self::CyclicHierarchy => "E2001",
            Self::ResourceLimitExceeded => "E3001",
            Self::OrderingInvariant => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PayloadUnparseable => "Payload is not valid JSON",
            Self::InvalidRecord => "Payload record is missing a field or has the wrong type",
            Self::EmptyIdentifier => "Identifier is empty",
            Self::DuplicateIdentifier => "Identifier is declared twice",
            Self::UnknownIdentifier => "Edge references an unknown identifier",
            Self::CyclicHierarchy => "Mission hierarchy contains a cycle",
            Self::ResourceLimitExceeded => "Traversal exceeded its resource limit",
            Self::OrderingInvariant => "Internal ordering invariant violated",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::PayloadUnparseable => Some("Check the payload file is well-formed JSON."),
            Self::InvalidRecord => Some("Every record needs its UUID/Name or edge endpoint fields."),
            Self::EmptyIdentifier => Some("Give every mission and data asset a non-empty UUID."),
            Self::DuplicateIdentifier => Some("Deduplicate the Mission / OperationalData lists."),
            Self::UnknownIdentifier => {
                Some("Declare every mission and data asset referenced by an edge.")
            }
            Self::CyclicHierarchy => {
                Some("Remove a MissionHierarchy link so no mission is its own ancestor.")
            }
            Self::ResourceLimitExceeded => {
                Some("Raise [limits] in the config file or split the graph.")
            }
            Self::OrderingInvariant => Some("Report a bug with the payload that triggered it."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which part of the inbound payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFault {
    /// The payload could not be parsed at all.
    Unparseable,
    /// A record was missing a required field or had the wrong shape.
    InvalidRecord,
    /// An identifier was the empty string.
    EmptyIdentifier,
    /// An identifier appeared twice within its vertex type.
    DuplicateIdentifier,
    /// An edge endpoint did not name a vertex of the expected type.
    UnknownIdentifier,
}

impl InputFault {
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::Unparseable => ErrorCode::PayloadUnparseable,
            Self::InvalidRecord => ErrorCode::InvalidRecord,
            Self::EmptyIdentifier => ErrorCode::EmptyIdentifier,
            Self::DuplicateIdentifier => ErrorCode::DuplicateIdentifier,
            Self::UnknownIdentifier => ErrorCode::UnknownIdentifier,
        }
    }
}

/// Errors produced while building the mission graph or scoring it.
///
/// All variants are deterministic for a given payload, so none of them is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// The payload was rejected before any computation started.
    #[error("malformed input: {reason}")]
    MalformedInput { fault: InputFault, reason: String },

    /// One or more strongly connected components of mission ids.
    #[error("cyclic mission hierarchy: {}", format_components(.components))]
    CyclicHierarchy { components: Vec<Vec<String>> },

    /// A traversal consumed more steps (or vertices) than allowed.
    #[error("{traversal} exceeded its limit of {limit}")]
    ResourceLimitExceeded {
        traversal: &'static str,
        limit: usize,
    },

    /// A vertex was processed before one of its dependencies.
    #[error("{vertex} was processed before its dependency {dependency}")]
    OrderingInvariant { vertex: String, dependency: String },
}

impl ScoringError {
    /// Build a [`ScoringError::MalformedInput`].
    pub fn malformed(fault: InputFault, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            fault,
            reason: reason.into(),
        }
    }

    /// The stable error code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedInput { fault, .. } => fault.code(),
            Self::CyclicHierarchy { .. } => ErrorCode::CyclicHierarchy,
            Self::ResourceLimitExceeded { .. } => ErrorCode::ResourceLimitExceeded,
            Self::OrderingInvariant { .. } => ErrorCode::OrderingInvariant,
        }
    }
}

fn format_components(components: &[Vec<String>]) -> String {
    components
        .iter()
        .map(|members| format!("[{}]", members.join(" -> ")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        let fault = match err.classify() {
            serde_json::error::Category::Data => InputFault::InvalidRecord,
            _ => InputFault::Unparseable,
        };
        Self::malformed(fault, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 8] = [
        ErrorCode::PayloadUnparseable,
        ErrorCode::InvalidRecord,
        ErrorCode::EmptyIdentifier,
        ErrorCode::DuplicateIdentifier,
        ErrorCode::UnknownIdentifier,
        ErrorCode::CyclicHierarchy,
        ErrorCode::ResourceLimitExceeded,
        ErrorCode::OrderingInvariant,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn cyclic_error_lists_components() {
        let err = ScoringError::CyclicHierarchy {
            components: vec![vec!["a".into(), "b".into()]],
        };
        assert_eq!(err.to_string(), "cyclic mission hierarchy: [a -> b]");
        assert_eq!(err.code().code(), "E2001");
    }

    #[test]
    fn missing_field_maps_to_invalid_record() {
        let err = serde_json::from_str::<crate::model::Mission>(r#"{"UUID": "m1"}"#)
            .map_err(ScoringError::from)
            .expect_err("Name is required");
        assert_eq!(err.code(), ErrorCode::InvalidRecord);
    }

    #[test]
    fn syntax_error_maps_to_unparseable() {
        let err = serde_json::from_str::<crate::model::Mission>("{not json")
            .map_err(ScoringError::from)
            .expect_err("broken json");
        assert_eq!(err.code(), ErrorCode::PayloadUnparseable);
    }
}
