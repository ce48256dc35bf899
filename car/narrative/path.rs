use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, NarrativeResult};

/// Dot-separated path of map keys, e.g. `caseStudy.stakeholders`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Segments are matched exactly, so surrounding
    /// whitespace is part of the key. Empty segments are rejected.
    pub fn parse(raw: &str) -> NarrativeResult<Self> {
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(NarrativeError::InvalidPath(raw.to_string()));
        }
        Ok(Self { segments })
    }

    /// Builds a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> NarrativeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty() || s.contains('.')) {
            return Err(NarrativeError::InvalidPath(segments.join(".")));
        }
        Ok(Self { segments })
    }

    /// Key segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first `len` segments (clamped to at least one).
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.clamp(1, self.segments.len());
        Self {
            segments: self.segments[..len].to_vec(),
        }
    }

    /// Appends a segment.
    pub fn child(&self, segment: &str) -> NarrativeResult<Self> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self::from_segments(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = NarrativeError;

    fn from_str(s: &str) -> NarrativeResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = NarrativeError;

    fn try_from(value: String) -> NarrativeResult<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = NarrativeError;

    fn try_from(value: &str) -> NarrativeResult<Self> {
        Self::parse(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
