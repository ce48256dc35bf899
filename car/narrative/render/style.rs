use serde::{Deserialize, Serialize};

/// How section headings are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStyle {
    /// The label alone.
    #[default]
    Plain,
    /// The label followed by a line of `=` of the same width.
    Underlined,
}

/// Text conventions used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Prefix for sequence elements.
    pub bullet: String,
    /// Spaces per nesting level.
    pub indent: u8,
    /// Heading decoration.
    pub heading: HeadingStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            bullet: "- ".into(),
            indent: 2,
            heading: HeadingStyle::Plain,
        }
    }
}

impl RenderStyle {
    /// Overrides the bullet.
    #[must_use]
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }

    /// Overrides the indent width.
    #[must_use]
    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Overrides the heading decoration.
    #[must_use]
    pub fn with_heading(mut self, heading: HeadingStyle) -> Self {
        self.heading = heading;
        self
    }

    pub(crate) fn pad(&self, depth: usize) -> String {
        " ".repeat(usize::from(self.indent).saturating_mul(depth))
    }
}
