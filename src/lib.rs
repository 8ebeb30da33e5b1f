//! # NullTrace HTML Builder
//!
//! Widgets that write HTML through a builder, for the NullTrace web views.
//!
//! ## Features
//! - One builder method per HTML tag, with escaping by default
//! - Composable widgets with parent blocks that receive the child
//! - Optional pretty-printing with two-space indentation
//! - Per-type stylesheet and script declarations, aggregated after a render
//!
//! ## Example
//! ```ignore
//! use nulltrace_html::{attrs, render, Doc, HtmlResult, Widget};
//!
//! struct Greeting;
//!
//! impl Widget for Greeting {
//!     fn content(&self, doc: &mut Doc<'_>) -> HtmlResult<()> {
//!         doc.div_with(attrs! { "class" => "greeting" }, |doc| doc.p("Hello & welcome"))
//!     }
//! }
//!
//! let html = render(&Greeting).expect("render failed");
//! assert_eq!(html, "<div class=\"greeting\"><p>Hello &amp; welcome</p></div>");
//! ```

pub mod args;
pub mod attributes;
pub mod character;
pub mod config;
pub mod doc;
pub mod error;
pub mod escape;
pub mod externals;
pub mod needs;
pub mod output;
pub mod session;
pub mod tags;
pub mod widget;

use std::sync::Arc;

// --- Core types ---
pub use args::{Arg, Args, Content};
pub use attributes::{AttrValue, Attributes};
pub use config::RenderConfig;
pub use doc::{Block, Doc};
pub use error::{HtmlError, HtmlResult, MarkupWarning};
pub use escape::{h, nbsp, nbsp_default, raw, RawString, Text};
pub use output::Output;
pub use session::{RenderSession, RenderState};
pub use widget::{inline, Inline, Widget, WidgetId, WidgetType};

// --- Collaborators ---
pub use character::{CharacterRef, CharacterTable};
pub use externals::{External, ExternalKind, ExternalRegistry};
pub use needs::{Inputs, Need, Needs};

/// Render a widget to a compact string
pub fn render(widget: &dyn Widget) -> HtmlResult<String> {
    RenderSession::new(widget).render()
}

/// Render a widget with newlines and indentation
pub fn render_pretty(widget: &dyn Widget) -> HtmlResult<String> {
    RenderSession::new(widget)
        .config(RenderConfig::pretty())
        .render()
}

/// Render a widget to its output fragments, unjoined
pub fn render_fragments(widget: &dyn Widget) -> HtmlResult<Vec<String>> {
    RenderSession::new(widget).render_fragments()
}

/// Render a widget followed by the externals its widget types declared
pub fn render_with_externals(
    widget: &dyn Widget,
    externals: Arc<ExternalRegistry>,
) -> HtmlResult<Vec<String>> {
    RenderSession::new(widget)
        .externals(externals)
        .render_with_externals()
}
