//! The builder handed to every widget's content method.

use log::{trace, warn};
use regex::Regex;
use std::any::TypeId;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use crate::args::{Args, Content};
use crate::attributes::Attributes;
use crate::character::{CharacterRef, CharacterTable};
use crate::config::RenderConfig;
use crate::error::{HtmlError, HtmlResult, MarkupWarning};
use crate::escape::{self, RawString, Text};
use crate::needs::{Needs, Value};
use crate::output::Output;
use crate::tags::is_newliney;
use crate::widget::{Widget, WidgetType};

/// A parent's block, stored in the child's `Doc` until the child calls it
pub type Block<'a> = Box<dyn FnOnce(&mut Doc<'_>) -> HtmlResult<()> + 'a>;

/// Attributes of the default XML declaration, in their required order
const XML_DECLARATION_ORDER: &[&str] = &["version", "encoding", "standalone"];

/// State shared by every `Doc` of one render pass.
#[derive(Debug)]
pub(crate) struct RenderContext {
    characters: Arc<CharacterTable>,
    types: Vec<WidgetType>,
    seen: HashSet<TypeId>,
    warnings: Vec<MarkupWarning>,
}

impl RenderContext {
    pub(crate) fn new(characters: Arc<CharacterTable>) -> Self {
        Self {
            characters,
            types: Vec::new(),
            seen: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a widget type the first time it is rendered
    pub(crate) fn discover(&mut self, widget_type: WidgetType) {
        if self.seen.insert(widget_type.id()) {
            trace!("discovered widget type {}", widget_type.name());
            self.types.push(widget_type);
        }
    }

    pub(crate) fn finish(self) -> (Vec<WidgetType>, Vec<MarkupWarning>) {
        (self.types, self.warnings)
    }
}

/// Writes markup into an [`Output`] on behalf of one widget.
///
/// Nested children get their own `Doc` over the same buffer. A capture swaps
/// in a fresh buffer for the duration of its block.
pub struct Doc<'a> {
    output: &'a mut Output,
    context: &'a mut RenderContext,
    block: Option<Block<'a>>,
}

impl<'a> Doc<'a> {
    pub(crate) fn new(output: &'a mut Output, context: &'a mut RenderContext) -> Self {
        Self {
            output,
            context,
            block: None,
        }
    }

    /// The buffer this widget writes into
    pub fn output(&mut self) -> &mut Output {
        &mut *self.output
    }

    pub fn prettyprint(&self) -> bool {
        self.output.prettyprint()
    }

    // ─── Text ────────────────────────────────────────────────────────────────

    /// Emit escaped text. Raw strings are emitted as they are, and widgets
    /// are rendered in place.
    pub fn text<'c>(&mut self, value: impl Into<Content<'c>>) -> HtmlResult<()> {
        self.emit_content(value.into(), true)
    }

    /// Emit text without escaping it
    pub fn rawtext(&mut self, value: impl Into<Text>) {
        self.output.append(value.into().as_str());
    }

    pub fn newline(&mut self) {
        self.output.newline();
    }

    pub fn h(&self, value: impl Into<Text>) -> RawString {
        escape::h(value)
    }

    pub fn raw(&self, text: impl Into<String>) -> RawString {
        escape::raw(text)
    }

    pub fn nbsp(&self, value: impl Into<Text>) -> RawString {
        escape::nbsp(value)
    }

    /// One non-breaking space
    pub fn nbsp_default(&self) -> RawString {
        escape::nbsp_default()
    }

    /// A hexadecimal character reference for a codepoint or a name known to
    /// the session's character table
    pub fn character(&self, reference: impl Into<CharacterRef>) -> HtmlResult<RawString> {
        self.context.characters.resolve(reference)
    }

    // ─── Tags ────────────────────────────────────────────────────────────────

    /// Emit `<name>` with up to two positional arguments: content and/or
    /// attributes, in either order.
    pub fn element<'c>(&mut self, name: &str, args: impl Into<Args<'c>>) -> HtmlResult<()> {
        self.element_impl(name, args.into(), true)
    }

    /// Like [`Doc::element`] but the content is not escaped
    pub fn element_raw<'c>(&mut self, name: &str, args: impl Into<Args<'c>>) -> HtmlResult<()> {
        self.element_impl(name, args.into(), false)
    }

    /// Emit `<name>`, let `block` write the body, then close it.
    pub fn element_with<'c, F>(
        &mut self,
        name: &str,
        args: impl Into<Args<'c>>,
        block: F,
    ) -> HtmlResult<()>
    where
        F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
    {
        let (content, attributes) = args.into().split(name)?;
        if content.is_some() {
            return Err(HtmlError::ContentAndBlock {
                element: name.to_string(),
            });
        }
        self.open_tag(name, attributes);
        block(self)?;
        self.end_tag(name);
        Ok(())
    }

    fn element_impl(&mut self, name: &str, args: Args<'_>, escape: bool) -> HtmlResult<()> {
        let (content, attributes) = args.split(name)?;
        self.open_tag(name, attributes);
        if let Some(content) = content {
            self.emit_content(content, escape)?;
        }
        self.end_tag(name);
        Ok(())
    }

    /// Emit a self-closing `<name ... />`
    pub fn empty_element(&mut self, name: &str, attributes: impl Into<Attributes>) {
        let attributes = attributes.into();
        if is_newliney(name) && !self.output.at_line_start() {
            self.output.newline();
        }
        self.output
            .append(format!("<{name}{} />", attributes.render()));
        if is_newliney(name) {
            self.output.newline();
        }
    }

    /// Emit an opening tag and indent what follows
    pub fn open_tag(&mut self, name: &str, attributes: impl Into<Attributes>) {
        let attributes = attributes.into();
        if is_newliney(name) && !self.output.at_line_start() {
            self.output.newline();
        }
        self.output.append(format!("<{name}{}>", attributes.render()));
        self.output.indent();
    }

    /// Emit a bare `</name>`. It is not matched against any opening tag and
    /// leaves the indentation alone.
    pub fn close_tag(&mut self, name: &str) {
        self.output.append(format!("</{name}>"));
    }

    /// Closing counterpart of [`Doc::open_tag`]
    pub(crate) fn end_tag(&mut self, name: &str) {
        self.output.undent();
        self.output.append(format!("</{name}>"));
        if is_newliney(name) {
            self.output.newline();
        }
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>`
    pub fn instruct(&mut self) {
        self.instruct_with(crate::attrs! { "version" => "1.0", "encoding" => "UTF-8" });
    }

    /// An XML declaration with custom attributes. `version`, `encoding` and
    /// `standalone` lead, in that order.
    pub fn instruct_with(&mut self, attributes: impl Into<Attributes>) {
        let attributes = attributes.into();
        self.output.append(format!(
            "<?xml{}?>",
            attributes.render_ordered(XML_DECLARATION_ORDER)
        ));
    }

    // ─── Comments ────────────────────────────────────────────────────────────

    /// `<!--text-->` followed by a newline. The text is not escaped.
    pub fn comment(&mut self, text: &str) {
        let conditional = self.open_comment(text);
        self.close_comment(conditional);
    }

    /// A multi-line comment around whatever `block` writes. Text of the form
    /// `[if ...]` opens an IE conditional comment.
    pub fn comment_with<F>(&mut self, text: &str, block: F) -> HtmlResult<()>
    where
        F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
    {
        let conditional = self.open_comment(text);
        self.output.append_newline();
        block(self)?;
        self.output.append_newline();
        self.close_comment(conditional);
        Ok(())
    }

    fn open_comment(&mut self, text: &str) -> bool {
        static CONDITIONAL: OnceLock<Regex> = OnceLock::new();
        let conditional = CONDITIONAL
            .get_or_init(|| Regex::new(r"\[if .*\]").unwrap())
            .is_match(text);

        if text.contains("--") {
            self.warn(MarkupWarning::AdjacentHyphens {
                comment: text.to_string(),
            });
        }

        self.output.append("<!--").append(text);
        if conditional {
            self.output.append(">");
        }
        conditional
    }

    fn close_comment(&mut self, conditional: bool) {
        if conditional {
            self.output.append("<![endif]");
        }
        self.output.append("-->");
        self.output.append_newline();
    }

    // ─── Scripts ─────────────────────────────────────────────────────────────

    /// A `text/javascript` script element. The content is written raw inside
    /// a commented CDATA section.
    pub fn javascript<'c>(&mut self, args: impl Into<Args<'c>>) -> HtmlResult<()> {
        let (content, attributes) = args.into().split("script")?;
        self.open_script(attributes);
        if let Some(content) = content {
            self.emit_content(content, false)?;
        }
        self.close_script();
        Ok(())
    }

    pub fn javascript_with<F>(&mut self, attributes: impl Into<Attributes>, block: F) -> HtmlResult<()>
    where
        F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
    {
        self.open_script(attributes.into());
        block(self)?;
        self.close_script();
        Ok(())
    }

    fn open_script(&mut self, mut attributes: Attributes) {
        attributes.set("type", "text/javascript");
        self.open_tag("script", attributes);
        self.output.append("\n// <![CDATA[\n");
    }

    fn close_script(&mut self) {
        self.output.append("\n// ]]>");
        self.output.append_newline();
        self.output.undent();
        self.output.append("</script>");
        self.output.append_newline();
    }

    // ─── Widgets ─────────────────────────────────────────────────────────────

    /// Render `child` into this buffer, at the current position
    pub fn widget<W: Widget>(&mut self, child: &W) -> HtmlResult<()> {
        self.render_child(child, None)
    }

    /// Render `child`, handing it `block` to call from its own content. The
    /// block runs in the caller's scope and receives the child.
    pub fn widget_with<W, F>(&mut self, child: &W, block: F) -> HtmlResult<()>
    where
        W: Widget,
        F: FnOnce(&mut Doc<'_>, &W) -> HtmlResult<()>,
    {
        self.render_child(child, Some(Box::new(move |doc: &mut Doc<'_>| block(doc, child))))
    }

    /// Construct a `W` from `inputs` and render it:
    /// `doc.widget_of::<Card>(inputs! { "title" => "Hi" })`
    pub fn widget_of<W: Needs>(
        &mut self,
        inputs: impl IntoIterator<Item = (String, Value)>,
    ) -> HtmlResult<()> {
        let child = W::with_inputs(inputs)?;
        self.widget(&child)
    }

    /// Construct a `W` from `inputs` and render it with a block
    pub fn widget_of_with<W, F>(
        &mut self,
        inputs: impl IntoIterator<Item = (String, Value)>,
        block: F,
    ) -> HtmlResult<()>
    where
        W: Needs,
        F: FnOnce(&mut Doc<'_>, &W) -> HtmlResult<()>,
    {
        let child = W::with_inputs(inputs)?;
        self.widget_with(&child, block)
    }

    fn render_child(&mut self, child: &dyn Widget, block: Option<Block<'_>>) -> HtmlResult<()> {
        self.context.discover(child.widget_type());
        let mut doc = Doc {
            output: &mut *self.output,
            context: &mut *self.context,
            block,
        };
        child.content(&mut doc)
    }

    /// Run the block the parent passed along with this widget, if any.
    /// A block runs at most once.
    pub fn call_block(&mut self) -> HtmlResult<()> {
        match self.block.take() {
            Some(block) => block(self),
            None => Ok(()),
        }
    }

    /// Whether a parent block is still waiting to be called
    pub fn has_block(&self) -> bool {
        self.block.is_some()
    }

    /// Run `block` against a fresh buffer and return what it wrote as raw
    /// markup. Nothing reaches this widget's buffer. The parent's block stays
    /// reachable through [`Doc::call_block`] while capturing.
    pub fn capture<F>(&mut self, block: F) -> HtmlResult<RawString>
    where
        F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
    {
        let config = RenderConfig {
            prettyprint: self.output.prettyprint(),
            indentation: 0,
        };
        let mut captured = Output::new(&config);
        std::mem::swap(&mut *self.output, &mut captured);
        let result = block(self);
        // restore the widget's buffer even when the block failed
        std::mem::swap(&mut *self.output, &mut captured);
        result?;
        Ok(RawString::new(captured.to_string()))
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn emit_content(&mut self, content: Content<'_>, escape: bool) -> HtmlResult<()> {
        match content {
            Content::Text(text) if escape => {
                self.output.append(text.escaped().into_owned());
            }
            Content::Text(text) => {
                self.output.append(text.as_str());
            }
            Content::Widget(widget) => self.render_child(widget, None)?,
        }
        Ok(())
    }

    fn warn(&mut self, warning: MarkupWarning) {
        warn!("{warning}");
        self.context.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use pretty_assertions::assert_eq;

    fn render_with<F>(config: RenderConfig, f: F) -> (String, Vec<MarkupWarning>)
    where
        F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
    {
        let mut output = Output::new(&config);
        let mut context = RenderContext::new(CharacterTable::standard());
        f(&mut Doc::new(&mut output, &mut context)).unwrap();
        (output.to_string(), context.warnings)
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
    {
        render_with(RenderConfig::default(), f).0
    }

    #[test]
    fn test_element_forms() {
        assert_eq!(render(|doc| doc.element("div", ())), "<div></div>");
        assert_eq!(render(|doc| doc.element("div", "test text")), "<div>test text</div>");
        assert_eq!(render(|doc| doc.element("div", 42)), "<div>42</div>");
        assert_eq!(
            render(|doc| doc.element("div", ("test text", attrs! { "style" => "display: none;" }))),
            "<div style=\"display: none;\">test text</div>"
        );
    }

    #[test]
    fn test_element_with_block() {
        let html = render(|doc| {
            doc.element_with("div", attrs! { "class" => "foobar" }, |doc| {
                doc.element("span", attrs! { "style" => "display: none;" })
            })
        });
        assert_eq!(html, "<div class=\"foobar\"><span style=\"display: none;\"></span></div>");
    }

    #[test]
    fn test_content_and_block_rejected() {
        let mut output = Output::default();
        let mut context = RenderContext::new(CharacterTable::standard());
        let mut doc = Doc::new(&mut output, &mut context);
        let err = doc.element_with("div", "text", |_| Ok(())).unwrap_err();
        assert!(matches!(err, HtmlError::ContentAndBlock { .. }));
    }

    #[test]
    fn test_element_raw() {
        assert_eq!(render(|doc| doc.element_raw("foo", "<b>&</b>")), "<foo><b>&</b></foo>");
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(render(|doc| { doc.empty_element("br", ()); Ok(()) }), "<br />");
        assert_eq!(
            render(|doc| { doc.empty_element("input", attrs! { "name" => "foo[bar]" }); Ok(()) }),
            "<input name=\"foo[bar]\" />"
        );
    }

    #[test]
    fn test_close_tag_alone() {
        assert_eq!(render(|doc| { doc.close_tag("foo"); Ok(()) }), "</foo>");
        assert_eq!(
            render(|doc| { doc.close_tag("foo"); doc.close_tag("bar"); Ok(()) }),
            "</foo></bar>"
        );
    }

    #[test]
    fn test_instruct() {
        assert_eq!(
            render(|doc| { doc.instruct(); Ok(()) }),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>"
        );
        assert_eq!(
            render(|doc| {
                doc.instruct_with(attrs! { "standalone" => "yes", "version" => "1.1" });
                Ok(())
            }),
            "<?xml version=\"1.1\" standalone=\"yes\"?>"
        );
    }

    #[test]
    fn test_comment_forms() {
        assert_eq!(render(|doc| { doc.comment("foo"); Ok(()) }), "<!--foo-->\n");
        assert_eq!(render(|doc| { doc.comment("&nbsp;"); Ok(()) }), "<!--&nbsp;-->\n");
        assert_eq!(
            render(|doc| doc.comment_with("", |doc| {
                doc.text("Hello")?;
                doc.text(" world!")
            })),
            "<!--\nHello world!\n-->\n"
        );
        assert_eq!(
            render(|doc| doc.comment_with("Hello", |doc| doc.text(" world!"))),
            "<!--Hello\n world!\n-->\n"
        );
    }

    #[test]
    fn test_conditional_comment() {
        assert_eq!(
            render(|doc| doc.comment_with("[if IE]", |doc| doc.text("Hello IE!"))),
            "<!--[if IE]>\nHello IE!\n<![endif]-->\n"
        );
        assert_eq!(
            render(|doc| { doc.comment("[puppies are cute]"); Ok(()) }),
            "<!--[puppies are cute]-->\n"
        );
    }

    #[test]
    fn test_comment_hyphen_warning() {
        let (html, warnings) = render_with(RenderConfig::default(), |doc| {
            doc.comment("he was -- awesome!");
            Ok(())
        });
        assert_eq!(html, "<!--he was -- awesome!-->\n");
        assert_eq!(
            warnings,
            vec![MarkupWarning::AdjacentHyphens {
                comment: "he was -- awesome!".to_string()
            }]
        );
    }

    #[test]
    fn test_javascript() {
        let expected = "<script type=\"text/javascript\">\n// <![CDATA[\nalert(\"&<>'hello\");\n// ]]>\n</script>\n";
        assert_eq!(render(|doc| doc.javascript("alert(\"&<>'hello\");")), expected);

        let expected = "<script type=\"text/javascript\">\n// <![CDATA[\nif (x < y) go();\n// ]]>\n</script>\n";
        assert_eq!(
            render(|doc| doc.javascript_with((), |doc| {
                doc.rawtext("if (x < y) go();");
                Ok(())
            })),
            expected
        );
    }

    #[test]
    fn test_javascript_src_and_arity() {
        let html = render(|doc| doc.javascript(attrs! { "src" => "/my/js/file.js" }));
        assert!(html.starts_with("<script src=\"/my/js/file.js\" type=\"text/javascript\">"));

        let mut output = Output::default();
        let mut context = RenderContext::new(CharacterTable::standard());
        let mut doc = Doc::new(&mut output, &mut context);
        let err = doc.javascript(("foobar", attrs! {}, "fourth")).unwrap_err();
        assert!(matches!(err, HtmlError::TooManyArguments { .. }));
    }

    #[test]
    fn test_character_uses_table() {
        assert_eq!(render(|doc| {
            let arrow = doc.character("right_arrow")?;
            doc.text(arrow)
        }), "&#x2192;");
    }

    #[test]
    fn test_capture_does_not_touch_buffer() {
        let html = render(|doc| {
            doc.text("X")?;
            let captured = doc.capture(|doc| doc.text("Y"))?;
            doc.text("Z")?;
            assert_eq!(captured.as_str(), "Y");
            Ok(())
        });
        assert_eq!(html, "XZ");
    }

    #[test]
    fn test_capture_keeps_buffer_after_error() {
        let mut output = Output::default();
        let mut context = RenderContext::new(CharacterTable::standard());
        let mut doc = Doc::new(&mut output, &mut context);
        doc.text("X").unwrap();
        let err = doc
            .capture(|doc| {
                doc.text("Y")?;
                doc.javascript(("a", attrs! {}, "b"))
            })
            .unwrap_err();
        assert!(matches!(err, HtmlError::TooManyArguments { .. }));
        doc.text("Z").unwrap();
        drop(doc);
        assert_eq!(output.to_string(), "XZ");
    }

    #[test]
    fn test_block_survives_capture_that_ignores_it() {
        let mut output = Output::default();
        let mut context = RenderContext::new(CharacterTable::standard());
        let mut doc = Doc::new(&mut output, &mut context);
        let block: Block<'_> = Box::new(|doc: &mut Doc<'_>| doc.text("block"));
        doc.block = Some(block);
        let captured = doc.capture(|doc| doc.text("aside")).unwrap();
        assert!(doc.has_block());
        doc.call_block().unwrap();
        drop(doc);
        assert_eq!(captured.as_str(), "aside");
        assert_eq!(output.to_string(), "block");
    }

    #[test]
    fn test_pretty_nesting() {
        let (html, _) = render_with(RenderConfig::pretty(), |doc| {
            doc.element_with("div", (), |doc| {
                doc.element_with("ul", (), |doc| {
                    doc.element("li", "one")?;
                    doc.element_with("li", (), |doc| doc.element("span", "two"))
                })
            })
        });
        assert_eq!(
            html,
            "<div>\n  <ul>\n    <li>one</li>\n    <li><span>two</span></li>\n  </ul>\n</div>\n"
        );
    }

    #[test]
    fn test_pretty_empty_element() {
        let (html, _) = render_with(RenderConfig::pretty(), |doc| {
            doc.element_with("p", (), |doc| {
                doc.text("line")?;
                doc.empty_element("br", ());
                doc.text("next")
            })
        });
        assert_eq!(html, "<p>line\n  <br />\n  next</p>\n");
    }
}
