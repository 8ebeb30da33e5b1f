//! Render entry points for a root widget.

use log::debug;
use std::sync::Arc;

use crate::character::CharacterTable;
use crate::config::RenderConfig;
use crate::doc::{Doc, RenderContext};
use crate::error::{HtmlResult, MarkupWarning};
use crate::externals::ExternalRegistry;
use crate::output::Output;
use crate::widget::{Widget, WidgetType, CONTENT};

/// Where a session is in its render lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Constructed,
    Rendering,
    Rendered,
    /// The last render returned an error; its output is incomplete
    Failed,
}

/// Renders one root widget, possibly several times.
///
/// Each render records the widget types it met, in the order first met.
/// That record drives externals aggregation and is replaced by the next
/// render.
pub struct RenderSession<'w> {
    root: &'w dyn Widget,
    config: RenderConfig,
    characters: Arc<CharacterTable>,
    externals: Arc<ExternalRegistry>,
    content_method: String,
    types: Vec<WidgetType>,
    warnings: Vec<MarkupWarning>,
    state: RenderState,
}

impl<'w> RenderSession<'w> {
    pub fn new(root: &'w dyn Widget) -> Self {
        Self {
            root,
            config: RenderConfig::default(),
            characters: CharacterTable::standard(),
            externals: Arc::new(ExternalRegistry::new()),
            content_method: CONTENT.to_string(),
            types: Vec::new(),
            warnings: Vec::new(),
            state: RenderState::Constructed,
        }
    }

    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn characters(mut self, characters: Arc<CharacterTable>) -> Self {
        self.characters = characters;
        self
    }

    pub fn externals(mut self, externals: Arc<ExternalRegistry>) -> Self {
        self.externals = externals;
        self
    }

    /// Render through a named content method instead of `content`
    pub fn content_method(mut self, name: impl Into<String>) -> Self {
        self.content_method = name.into();
        self
    }

    /// Append the root's markup to a caller-owned buffer. The buffer's own
    /// indentation and prettyprint setting are used as they are.
    pub fn render_to(&mut self, output: &mut Output) -> HtmlResult<()> {
        debug!(
            "rendering {} via '{}'",
            self.root.widget_type().name(),
            self.content_method
        );
        self.state = RenderState::Rendering;

        let mut context = RenderContext::new(self.characters.clone());
        context.discover(self.root.widget_type());
        let result = self
            .root
            .content_method(&self.content_method, &mut Doc::new(output, &mut context));

        let (types, warnings) = context.finish();
        self.types = types;
        self.warnings = warnings;

        match result {
            Ok(()) => {
                self.state = RenderState::Rendered;
                debug!(
                    "rendered {} fragment(s), {} widget type(s), {} warning(s)",
                    output.fragments().len(),
                    self.types.len(),
                    self.warnings.len()
                );
                Ok(())
            }
            Err(err) => {
                self.state = RenderState::Failed;
                debug!("render of {} failed: {}", self.root.widget_type().name(), err);
                Err(err)
            }
        }
    }

    pub fn render(&mut self) -> HtmlResult<String> {
        let mut output = Output::new(&self.config);
        self.render_to(&mut output)?;
        Ok(output.to_string())
    }

    pub fn render_fragments(&mut self) -> HtmlResult<Vec<String>> {
        let mut output = Output::new(&self.config);
        self.render_to(&mut output)?;
        Ok(output.into_fragments())
    }

    /// Append the rendered markup to `target`. Nothing is appended if the
    /// render fails.
    pub fn render_into(&mut self, target: &mut String) -> HtmlResult<()> {
        let rendered = self.render()?;
        target.push_str(&rendered);
        Ok(())
    }

    /// Render the root, then append the externals of every widget type the
    /// render met.
    pub fn render_with_externals(&mut self) -> HtmlResult<Vec<String>> {
        let mut output = Output::new(&self.config);
        self.render_to(&mut output)?;
        for external in self.externals.aggregate(&self.types) {
            output.append(external.to_html());
        }
        Ok(output.into_fragments())
    }

    /// The externals of the widget types met by the previous render. Empty
    /// before the first render.
    pub fn render_externals(&self) -> Vec<String> {
        self.externals
            .aggregate(&self.types)
            .iter()
            .map(|external| external.to_html())
            .collect()
    }

    /// Warnings raised by the previous render
    pub fn warnings(&self) -> &[MarkupWarning] {
        &self.warnings
    }

    /// Widget types met by the previous render, in first-met order
    pub fn widget_types(&self) -> &[WidgetType] {
        &self.types
    }

    pub fn state(&self) -> RenderState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HtmlError;
    use crate::widget::inline;
    use pretty_assertions::assert_eq;

    struct Listing;

    impl Widget for Listing {
        fn content(&self, doc: &mut Doc<'_>) -> HtmlResult<()> {
            doc.ul_with((), |doc| doc.li("one"))
        }

        fn content_method(&self, name: &str, doc: &mut Doc<'_>) -> HtmlResult<()> {
            match name {
                "summary" => doc.p("one item"),
                _ => self.content(doc),
            }
        }
    }

    #[test]
    fn test_lifecycle() {
        let listing = Listing;
        let mut session = RenderSession::new(&listing);
        assert_eq!(session.state(), RenderState::Constructed);
        assert_eq!(session.render().unwrap(), "<ul><li>one</li></ul>");
        assert_eq!(session.state(), RenderState::Rendered);
        assert_eq!(session.widget_types(), [WidgetType::of::<Listing>()]);
    }

    #[test]
    fn test_alternate_content_method() {
        let listing = Listing;
        let mut session = RenderSession::new(&listing).content_method("summary");
        assert_eq!(session.render().unwrap(), "<p>one item</p>");
    }

    #[test]
    fn test_unknown_content_method() {
        let widget = inline(|doc| doc.p("x"));
        let err = RenderSession::new(&widget)
            .content_method("nope")
            .render()
            .unwrap_err();
        assert!(matches!(err, HtmlError::UnknownContentMethod { ref method, .. } if method == "nope"));
    }

    #[test]
    fn test_failed_render() {
        let widget = inline(|doc| doc.character("no_such_character").map(|_| ()));
        let mut session = RenderSession::new(&widget);
        assert!(session.render().is_err());
        assert_eq!(session.state(), RenderState::Failed);

        let mut target = String::from("kept");
        assert!(session.render_into(&mut target).is_err());
        assert_eq!(target, "kept");
    }

    #[test]
    fn test_render_into_appends() {
        let listing = Listing;
        let mut target = String::from("<!-- before -->");
        RenderSession::new(&listing).render_into(&mut target).unwrap();
        assert_eq!(target, "<!-- before --><ul><li>one</li></ul>");
    }

    #[test]
    fn test_render_to_existing_output() {
        let listing = Listing;
        let mut output = Output::with_fragments(vec!["<body>".to_string()], &RenderConfig::default());
        RenderSession::new(&listing).render_to(&mut output).unwrap();
        output.append("</body>");
        assert_eq!(output.to_string(), "<body><ul><li>one</li></ul></body>");
    }

    #[test]
    fn test_warnings_are_replaced_per_render() {
        let widget = inline(|doc| {
            doc.comment("a -- b");
            Ok(())
        });
        let mut session = RenderSession::new(&widget);
        session.render().unwrap();
        session.render().unwrap();
        assert_eq!(session.warnings().len(), 1);
    }
}
