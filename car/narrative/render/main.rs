use indexmap::IndexMap;

/// Directives and templates.
pub mod directive;
/// Rendered output container.
pub mod document;
/// Text conventions.
pub mod style;

pub use directive::{Directive, RenderTemplate, Source, TemplateBuilder};
pub use document::RenderedDocument;
pub use style::{HeadingStyle, RenderStyle};

use crate::{
    error::{FieldFault, NarrativeError, NarrativeResult},
    tree::{AnalysisResult, ScenarioDefinition, ScenarioTree},
};

/// Walks a template over a definition (and analysis) and emits text lines.
///
/// Every directive is resolved before any line is produced, so a failing
/// template never yields a partial document.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    /// Renderer with the given style.
    #[must_use]
    pub const fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Active style.
    #[must_use]
    pub const fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Renders a template that only reads the definition.
    pub fn render_definition(
        &self,
        template: &RenderTemplate,
        definition: &ScenarioDefinition,
    ) -> NarrativeResult<RenderedDocument> {
        self.render(template, definition, None)
    }

    /// Renders `template` against `definition` and, for analysis directives,
    /// `analysis`.
    pub fn render(
        &self,
        template: &RenderTemplate,
        definition: &ScenarioDefinition,
        analysis: Option<&AnalysisResult>,
    ) -> NarrativeResult<RenderedDocument> {
        let sections = template
            .directives()
            .iter()
            .map(|directive| {
                resolve(directive, definition, analysis).map(|node| (directive, node))
            })
            .collect::<NarrativeResult<Vec<_>>>()?;

        let mut document = RenderedDocument::default();
        for (directive, node) in sections {
            document.begin_section();
            self.heading(&directive.label, &mut document);
            self.emit(node, &mut document);
        }
        Ok(document)
    }

    fn heading(&self, label: &str, document: &mut RenderedDocument) {
        text(label, "", "", document);
        if self.style.heading == HeadingStyle::Underlined {
            document.push("=".repeat(label.chars().count()));
        }
    }

    fn emit(&self, node: &ScenarioTree, document: &mut RenderedDocument) {
        match node {
            ScenarioTree::Scalar(value) => text(value, "", "", document),
            ScenarioTree::Sequence(items) => self.bullets(items, 0, document),
            ScenarioTree::Map(children) => self.entries(children, 0, document),
        }
    }

    fn bullets(&self, items: &[String], depth: usize, document: &mut RenderedDocument) {
        let pad = self.style.pad(depth);
        let lead = format!("{pad}{}", self.style.bullet);
        let hang = format!("{pad}{}", " ".repeat(self.style.bullet.chars().count()));
        for item in items {
            text(item, &lead, &hang, document);
        }
    }

    fn entries(
        &self,
        children: &IndexMap<String, ScenarioTree>,
        depth: usize,
        document: &mut RenderedDocument,
    ) {
        let pad = self.style.pad(depth);
        for (key, child) in children {
            match child {
                ScenarioTree::Scalar(value) => {
                    let hang = self.style.pad(depth + 1);
                    text(value, &format!("{pad}{key}: "), &hang, document);
                }
                ScenarioTree::Sequence(items) => {
                    document.push(format!("{pad}{key}:"));
                    self.bullets(items, depth + 1, document);
                }
                ScenarioTree::Map(grandchildren) => {
                    document.push(format!("{pad}{key}:"));
                    self.entries(grandchildren, depth + 1, document);
                }
            }
        }
    }
}

/// Pushes `value` one physical line at a time: the first after `lead`, the
/// rest after `hang`.
fn text(value: &str, lead: &str, hang: &str, document: &mut RenderedDocument) {
    for (idx, line) in value.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let prefix = if idx == 0 { lead } else { hang };
        document.push(format!("{prefix}{line}"));
    }
}

fn resolve<'a>(
    directive: &Directive,
    definition: &'a ScenarioDefinition,
    analysis: Option<&'a AnalysisResult>,
) -> NarrativeResult<&'a ScenarioTree> {
    let (found, wrap): (Result<&ScenarioTree, FieldFault>, fn(FieldFault) -> NarrativeError) =
        match directive.source {
            Source::Definition => (
                definition.resolve(&directive.path),
                NarrativeError::MalformedScenario,
            ),
            Source::Analysis => {
                let analysis = analysis.ok_or_else(|| NarrativeError::AnalysisUnavailable {
                    label: directive.label.clone(),
                })?;
                (
                    analysis.resolve(&directive.path),
                    NarrativeError::AdvisorContract,
                )
            }
        };
    let node = found.map_err(wrap)?;
    match directive.expect {
        Some(expected) if node.kind() != expected => Err(wrap(FieldFault::Kind {
            path: directive.path.clone(),
            expected,
            found: node.kind(),
        })),
        _ => Ok(node),
    }
}
