use std::{fmt, io::Write};

use serde::{Deserialize, Serialize};

/// Lines produced by one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    lines: Vec<String>,
    sections: usize,
}

impl RenderedDocument {
    pub(crate) fn begin_section(&mut self) {
        self.sections += 1;
    }

    pub(crate) fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Lines in output order. No line contains a newline, so the count
    /// matches the physical lines of [`Self::to_text`].
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the document, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True without lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of directives rendered.
    #[must_use]
    pub const fn sections(&self) -> usize {
        self.sections
    }

    /// Newline-terminated text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Writes every line, newline-terminated, to `out`.
    pub fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

impl fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
