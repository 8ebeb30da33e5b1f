//! Stylesheets and scripts declared by widget types.
//!
//! Declarations belong to a widget type, not an instance. After a render the
//! session knows which types were used and asks the registry for their
//! combined, deduplicated list.

use log::debug;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::escape::escape_attribute;
use crate::widget::{Widget, WidgetType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalKind {
    Stylesheet,
    Script,
}

impl ExternalKind {
    /// Every kind, in the order aggregated output groups them
    pub const ALL: [ExternalKind; 2] = [ExternalKind::Stylesheet, ExternalKind::Script];
}

/// A stylesheet or script some widget type depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct External {
    pub kind: ExternalKind,
    pub location: String,
}

impl External {
    pub fn stylesheet(location: impl Into<String>) -> Self {
        Self {
            kind: ExternalKind::Stylesheet,
            location: location.into(),
        }
    }

    pub fn script(location: impl Into<String>) -> Self {
        Self {
            kind: ExternalKind::Script,
            location: location.into(),
        }
    }

    /// The tag that loads this external
    pub fn to_html(&self) -> String {
        match self.kind {
            ExternalKind::Stylesheet => format!(
                "<link href=\"{}\" media=\"all\" rel=\"stylesheet\" type=\"text/css\" />",
                escape_attribute(self.location.as_str())
            ),
            ExternalKind::Script => format!(
                "<script src=\"{}\" type=\"text/javascript\"></script>",
                escape_attribute(self.location.as_str())
            ),
        }
    }
}

impl fmt::Display for External {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Per-type external declarations. Build it once, then share it read-only
/// between sessions.
#[derive(Debug, Clone, Default)]
pub struct ExternalRegistry {
    by_type: HashMap<TypeId, Vec<External>>,
}

impl ExternalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an external for widget type `W`. Declaring the same one twice
    /// is a no-op.
    pub fn register<W: Widget>(&mut self, kind: ExternalKind, location: impl Into<String>) -> &mut Self {
        self.register_for(WidgetType::of::<W>(), kind, location)
    }

    pub fn register_for(
        &mut self,
        widget_type: WidgetType,
        kind: ExternalKind,
        location: impl Into<String>,
    ) -> &mut Self {
        let external = External {
            kind,
            location: location.into(),
        };
        let declared = self.by_type.entry(widget_type.id()).or_default();
        if !declared.contains(&external) {
            declared.push(external);
        }
        self
    }

    /// Externals declared by `W` itself, in declaration order
    pub fn declared<W: Widget>(&self) -> &[External] {
        self.declared_for(WidgetType::of::<W>())
    }

    pub fn declared_for(&self, widget_type: WidgetType) -> &[External] {
        self.by_type
            .get(&widget_type.id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.values().all(Vec::is_empty)
    }

    /// The combined externals of `types`: stylesheets first, then scripts.
    /// Within a kind the order follows `types`, then declaration order. A
    /// location appears at most once per kind.
    ///
    /// The result is grouped by kind rather than interleaved in discovery
    /// order, so every `<link>` lands ahead of every `<script>` even when a
    /// later widget brings the stylesheet.
    pub fn aggregate(&self, types: &[WidgetType]) -> Vec<External> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for kind in ExternalKind::ALL {
            for widget_type in types {
                for external in self.declared_for(*widget_type) {
                    if external.kind == kind && seen.insert(external) {
                        out.push(external.clone());
                    }
                }
            }
        }

        debug!(
            "aggregated {} external(s) from {} widget type(s)",
            out.len(),
            types.len()
        );
        out
    }
}
