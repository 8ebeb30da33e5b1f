use std::fmt;

use crate::config::RenderConfig;

pub const SPACES_PER_INDENT: usize = 2;

/// Handle to a fragment slot reserved with [`Output::placeholder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(usize);

/// Append-only sink of markup fragments with indentation bookkeeping.
///
/// `at_line_start` is tracked explicitly: it is set by [`Output::newline`]
/// and cleared by every [`Output::append`], never derived from the fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    fragments: Vec<String>,
    indentation: i32,
    at_line_start: bool,
    prettyprint: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Output {
    pub fn new(config: &RenderConfig) -> Self {
        Self::with_fragments(Vec::new(), config)
    }

    /// Continue writing after `fragments`, which are kept as-is
    pub fn with_fragments(fragments: Vec<String>, config: &RenderConfig) -> Self {
        Self {
            fragments,
            indentation: config.indentation,
            at_line_start: true,
            prettyprint: config.prettyprint,
        }
    }

    pub fn prettyprint(&self) -> bool {
        self.prettyprint
    }

    pub fn indentation(&self) -> i32 {
        self.indentation
    }

    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Append `text`, indenting first when pretty-printing at a fresh line.
    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        if self.prettyprint && self.at_line_start {
            let width = self.indentation.max(0) as usize * SPACES_PER_INDENT;
            if width > 0 {
                self.fragments.push(" ".repeat(width));
            }
        }
        self.fragments.push(text.into());
        self.at_line_start = false;
        self
    }

    /// Reserve an empty fragment to be filled in later with [`Output::fill`].
    pub fn placeholder(&mut self) -> Placeholder {
        self.fragments.push(String::new());
        Placeholder(self.fragments.len() - 1)
    }

    pub fn fill(&mut self, placeholder: Placeholder, text: impl Into<String>) {
        if let Some(slot) = self.fragments.get_mut(placeholder.0) {
            *slot = text.into();
        }
    }

    /// Line break in pretty mode; nothing otherwise.
    pub fn newline(&mut self) {
        if self.prettyprint {
            self.append("\n");
            self.at_line_start = true;
        }
    }

    /// Line break regardless of the pretty-print setting
    pub fn append_newline(&mut self) {
        self.append("\n");
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    pub fn undent(&mut self) {
        self.indentation -= 1;
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<String> {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(String::is_empty)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}
