use serde::{Deserialize, Serialize};

use crate::error::HtmlResult;

/// Settings threaded through a render session into every buffer it creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit newlines and two-space indentation around block-level tags
    pub prettyprint: bool,
    /// Indentation level the buffer starts at
    pub indentation: i32,
}

impl RenderConfig {
    /// Compact output, no indentation
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed output starting at the left margin
    pub fn pretty() -> Self {
        Self {
            prettyprint: true,
            indentation: 0,
        }
    }

    pub fn with_indentation(mut self, indentation: i32) -> Self {
        self.indentation = indentation;
        self
    }

    /// Load a configuration from YAML, e.g. `prettyprint: true`.
    /// Missing keys fall back to their defaults.
    pub fn from_yaml(yaml: &str) -> HtmlResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
