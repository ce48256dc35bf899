use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::NarrativeResult, path::FieldPath, tree::NodeKind};

/// Which document a directive reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The scenario definition.
    #[default]
    Definition,
    /// The advisor's analysis.
    Analysis,
}

/// One `(label, field-path)` step of a document template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Heading printed before the node.
    pub label: String,
    /// Path of the node to print.
    pub path: FieldPath,
    /// Document the path is resolved against.
    #[serde(default)]
    pub source: Source,
    /// Shape the node must have, when the template cares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<NodeKind>,
}

impl Directive {
    /// Directive over the definition.
    pub fn definition(label: impl Into<String>, path: &str) -> NarrativeResult<Self> {
        Self::new(label, path, Source::Definition)
    }

    /// Directive over the analysis.
    pub fn analysis(label: impl Into<String>, path: &str) -> NarrativeResult<Self> {
        Self::new(label, path, Source::Analysis)
    }

    fn new(label: impl Into<String>, path: &str, source: Source) -> NarrativeResult<Self> {
        Ok(Self {
            label: label.into(),
            path: FieldPath::parse(path)?,
            source,
            expect: None,
        })
    }

    /// Requires the node to have `kind`.
    #[must_use]
    pub fn expecting(mut self, kind: NodeKind) -> Self {
        self.expect = Some(kind);
        self
    }
}

/// Ordered list of directives: the document template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderTemplate {
    directives: Vec<Directive>,
}

impl RenderTemplate {
    /// Template from already-built directives.
    #[must_use]
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// Starts a builder; path errors surface from [`TemplateBuilder::build`].
    #[must_use]
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// Template of definition directives from `(label, path)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> NarrativeResult<Self> {
        pairs
            .iter()
            .map(|(label, path)| Directive::definition(*label, path))
            .collect::<NarrativeResult<Vec<_>>>()
            .map(Self::new)
    }

    /// Parses a JSON array of directives.
    pub fn from_json_str(raw: &str) -> NarrativeResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a JSON template file.
    pub fn from_json_file(path: impl AsRef<Path>) -> NarrativeResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Directives in order.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// True without directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// True when any directive reads the analysis.
    #[must_use]
    pub fn reads_analysis(&self) -> bool {
        self.directives
            .iter()
            .any(|directive| directive.source == Source::Analysis)
    }
}

/// Collects directives and parses their paths on [`TemplateBuilder::build`].
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    pending: Vec<(String, String, Source, Option<NodeKind>)>,
}

impl TemplateBuilder {
    /// Adds a definition directive.
    #[must_use]
    pub fn definition(self, label: impl Into<String>, path: impl Into<String>) -> Self {
        self.push(label, path, Source::Definition, None)
    }

    /// Adds a definition directive that asserts the node's shape.
    #[must_use]
    pub fn definition_as(
        self,
        label: impl Into<String>,
        path: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        self.push(label, path, Source::Definition, Some(kind))
    }

    /// Adds an analysis directive.
    #[must_use]
    pub fn analysis(self, label: impl Into<String>, path: impl Into<String>) -> Self {
        self.push(label, path, Source::Analysis, None)
    }

    /// Adds an analysis directive that asserts the node's shape.
    #[must_use]
    pub fn analysis_as(
        self,
        label: impl Into<String>,
        path: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        self.push(label, path, Source::Analysis, Some(kind))
    }

    fn push(
        mut self,
        label: impl Into<String>,
        path: impl Into<String>,
        source: Source,
        expect: Option<NodeKind>,
    ) -> Self {
        self.pending.push((label.into(), path.into(), source, expect));
        self
    }

    /// Parses every path, failing on the first invalid one.
    pub fn build(self) -> NarrativeResult<RenderTemplate> {
        let mut directives = Vec::with_capacity(self.pending.len());
        for (label, path, source, expect) in self.pending {
            directives.push(Directive {
                label,
                path: FieldPath::parse(&path)?,
                source,
                expect,
            });
        }
        Ok(RenderTemplate::new(directives))
    }
}
