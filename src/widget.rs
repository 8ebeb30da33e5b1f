//! The widget trait and its type identity.

use std::any::{type_name, TypeId};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::doc::Doc;
use crate::error::{HtmlError, HtmlResult};

/// Name of the default content method
pub const CONTENT: &str = "content";

/// A reusable unit of markup.
///
/// Implementors write their markup in [`Widget::content`]. The default
/// content just runs the block the parent passed along, which makes a bare
/// widget a transparent wrapper.
pub trait Widget: 'static {
    fn content(&self, doc: &mut Doc<'_>) -> HtmlResult<()> {
        doc.call_block()
    }

    /// Dispatch a named content method. Widgets with alternate renderings
    /// override this; only [`CONTENT`] is known by default.
    fn content_method(&self, name: &str, doc: &mut Doc<'_>) -> HtmlResult<()> {
        if name == CONTENT {
            self.content(doc)
        } else {
            Err(HtmlError::UnknownContentMethod {
                widget: self.widget_type().name().to_string(),
                method: name.to_string(),
            })
        }
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::of::<Self>()
    }

    /// The id this instance carries, if it holds a [`WidgetId`]
    fn widget_id(&self) -> Option<WidgetId> {
        None
    }

    /// An id unique to this instance, e.g. `parent_7f3a2c10`.
    ///
    /// Widgets holding a [`WidgetId`] get the same id on every call. Without
    /// one the id comes from the instance's address while it lives. Zero-sized
    /// instances share addresses, so each call on one mints a fresh id.
    fn dom_id(&self) -> String {
        let short_name = self.widget_type().short_name();
        if let Some(id) = self.widget_id() {
            return format!("{short_name}_{id}");
        }
        if std::mem::size_of_val(self) == 0 {
            return format!("{short_name}_{}", WidgetId::new());
        }
        let address = self as *const Self as *const () as usize;
        format!("{short_name}_{address:x}")
    }
}

/// Per-instance identity for widgets whose `dom_id` must stay put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        WidgetId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{:x}", self.0)
    }
}

/// Runtime identity of a widget type, used for externals aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetType {
    id: TypeId,
    name: &'static str,
}

impl WidgetType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the name, generics stripped, snake-cased:
    /// `my_app::widgets::NavBar<T>` becomes `nav_bar`
    pub fn short_name(&self) -> String {
        let base = self.name.split('<').next().unwrap_or(self.name);
        let last = base.rsplit("::").next().unwrap_or(base);
        to_snake_case(last)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl<W: ?Sized + Widget> Widget for Box<W> {
    fn content(&self, doc: &mut Doc<'_>) -> HtmlResult<()> {
        (**self).content(doc)
    }

    fn content_method(&self, name: &str, doc: &mut Doc<'_>) -> HtmlResult<()> {
        (**self).content_method(name, doc)
    }

    fn widget_type(&self) -> WidgetType {
        (**self).widget_type()
    }

    fn widget_id(&self) -> Option<WidgetId> {
        (**self).widget_id()
    }

    fn dom_id(&self) -> String {
        (**self).dom_id()
    }
}

impl<W: ?Sized + Widget> Widget for Rc<W> {
    fn content(&self, doc: &mut Doc<'_>) -> HtmlResult<()> {
        (**self).content(doc)
    }

    fn content_method(&self, name: &str, doc: &mut Doc<'_>) -> HtmlResult<()> {
        (**self).content_method(name, doc)
    }

    fn widget_type(&self) -> WidgetType {
        (**self).widget_type()
    }

    fn widget_id(&self) -> Option<WidgetId> {
        (**self).widget_id()
    }

    fn dom_id(&self) -> String {
        (**self).dom_id()
    }
}

/// A widget whose content is a closure
pub struct Inline<F>(F);

/// Wrap a closure as a widget:
/// `inline(|doc| doc.p("hello"))`
pub fn inline<F>(content: F) -> Inline<F>
where
    F: Fn(&mut Doc<'_>) -> HtmlResult<()> + 'static,
{
    Inline(content)
}

impl<F> Widget for Inline<F>
where
    F: Fn(&mut Doc<'_>) -> HtmlResult<()> + 'static,
{
    fn content(&self, doc: &mut Doc<'_>) -> HtmlResult<()> {
        (self.0)(doc)
    }
}

impl<F> fmt::Debug for Inline<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Inline")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NavBar;
    impl Widget for NavBar {}

    struct Generic<T>(T);
    impl<T: 'static> Widget for Generic<T> {}

    #[test]
    fn test_short_name() {
        assert_eq!(WidgetType::of::<NavBar>().short_name(), "nav_bar");
        assert_eq!(WidgetType::of::<Generic<NavBar>>().short_name(), "generic");
    }

    #[test]
    fn test_boxed_widget_keeps_identity() {
        let boxed: Box<dyn Widget> = Box::new(NavBar);
        assert_eq!(boxed.widget_type(), WidgetType::of::<NavBar>());
        assert_eq!(Box::new(NavBar).widget_type(), WidgetType::of::<NavBar>());
    }

    #[test]
    fn test_dom_id_is_per_instance() {
        let a = NavBar;
        let b = Generic(1u8);
        let c = Generic(2u8);
        assert!(a.dom_id().starts_with("nav_bar_"));
        assert!(b.dom_id().starts_with("generic_"));
        assert_ne!(b.dom_id(), c.dom_id());
        assert_eq!(b.dom_id(), b.dom_id());
    }

    #[test]
    fn test_boxed_zero_sized_widgets_get_distinct_ids() {
        let a: Box<dyn Widget> = Box::new(NavBar);
        let b: Box<dyn Widget> = Box::new(NavBar);
        assert_ne!(a.dom_id(), b.dom_id());
        assert!(a.dom_id().starts_with("nav_bar_"));
    }

    #[test]
    fn test_widget_id_keeps_dom_id_stable() {
        struct Menu {
            id: WidgetId,
        }

        impl Widget for Menu {
            fn widget_id(&self) -> Option<WidgetId> {
                Some(self.id)
            }
        }

        let menu = Menu { id: WidgetId::new() };
        let other = Menu { id: WidgetId::default() };
        assert_eq!(menu.dom_id(), format!("menu_{}", menu.id));
        assert_eq!(menu.dom_id(), menu.dom_id());
        assert_ne!(menu.dom_id(), other.dom_id());

        let shared: Rc<dyn Widget> = Rc::new(menu);
        assert_eq!(shared.dom_id(), Rc::clone(&shared).dom_id());
    }
}
