use std::io;

use thiserror::Error;

use crate::{path::FieldPath, tree::NodeKind};

/// Result alias used across the narrative crates.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Why a field path could not be satisfied by a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldFault {
    /// No node exists at the path (reported up to the first absent segment).
    #[error("missing field: {0}")]
    Missing(FieldPath),
    /// A node exists but has the wrong shape.
    #[error("field {path} expected {expected}, found {found}")]
    Kind {
        /// Location of the offending node.
        path: FieldPath,
        /// Shape the caller required.
        expected: NodeKind,
        /// Shape actually present.
        found: NodeKind,
    },
}

impl FieldFault {
    /// Path the fault was detected at.
    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        match self {
            Self::Missing(path) | Self::Kind { path, .. } => path,
        }
    }
}

/// Advisor configuration rejected before the advisor was consulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required weight is absent.
    #[error("missing weight `{0}`")]
    MissingWeight(String),
    /// A weight lies outside its declared inclusive range.
    #[error("weight `{name}` = {value} outside [{min}, {max}]")]
    WeightOutOfRange {
        /// Weight name.
        name: String,
        /// Supplied value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A required option is absent.
    #[error("missing option `{0}`")]
    MissingOption(String),
    /// An option value is not among the allowed values.
    #[error("option `{name}` = `{value}` not one of {allowed:?}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Supplied value.
        value: String,
        /// Accepted values.
        allowed: Vec<String>,
    },
}

/// Errors surfaced while building, analysing, or rendering a scenario.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The scenario definition lacks a field the template expects, or has it
    /// in the wrong shape.
    #[error("malformed scenario: {0}")]
    MalformedScenario(FieldFault),
    /// The advisor returned a tree the template cannot render.
    #[error("advisor contract violated: {0}")]
    AdvisorContract(FieldFault),
    /// The advisor itself reported a failure.
    #[error("advisor `{advisor}` failed: {message}")]
    Advisor {
        /// Advisor label.
        advisor: String,
        /// Failure description.
        message: String,
    },
    /// The configuration does not meet the advisor's requirements.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    /// A directive reads the analysis but none was supplied.
    #[error("directive `{label}` reads the analysis but no analysis was supplied")]
    AnalysisUnavailable {
        /// Label of the directive.
        label: String,
    },
    /// A field path string could not be parsed.
    #[error("invalid field path `{0}`")]
    InvalidPath(String),
    /// A literal contains a value the tree cannot hold.
    #[error("unsupported literal at `{path}`: {found}")]
    UnsupportedLiteral {
        /// Location inside the literal.
        path: String,
        /// JSON type that was found.
        found: &'static str,
    },
    /// A map key that no field path can address.
    #[error("unreachable key `{key}` at `{path}`")]
    UnreachableKey {
        /// Location of the map holding the key.
        path: String,
        /// Offending key.
        key: String,
    },
    /// No example is registered under the name.
    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),
    /// Reading inputs or writing rendered output failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// A JSON document could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NarrativeError {
    /// Stable short name used in telemetry and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedScenario(_) => "malformed_scenario",
            Self::AdvisorContract(_) => "advisor_contract",
            Self::Advisor { .. } => "advisor",
            Self::Configuration(_) => "configuration",
            Self::AnalysisUnavailable { .. } => "analysis_unavailable",
            Self::InvalidPath(_) => "invalid_path",
            Self::UnsupportedLiteral { .. } => "unsupported_literal",
            Self::UnreachableKey { .. } => "unreachable_key",
            Self::UnknownScenario(_) => "unknown_scenario",
            Self::Io(_) => "io",
            Self::Decode(_) => "decode",
        }
    }

    /// Convenience constructor for advisor failures.
    #[must_use]
    pub fn advisor(advisor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Advisor {
            advisor: advisor.into(),
            message: message.into(),
        }
    }
}
