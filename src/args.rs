//! Positional arguments for the generic element builders.
//!
//! An element takes up to two positional arguments, content and/or an
//! attribute map in either order. Tuples convert into [`Args`], so
//! `doc.div(("text", attrs! { "id" => "x" }))` and
//! `doc.div((attrs! { "id" => "x" }, "text"))` are the same call.

use serde_json::Value;
use std::fmt;

use crate::attributes::Attributes;
use crate::error::{HtmlError, HtmlResult};
use crate::escape::{RawString, Text};
use crate::widget::Widget;

/// What goes between an element's tags.
#[derive(Clone)]
pub enum Content<'c> {
    Text(Text),
    /// Rendered in place rather than stringified
    Widget(&'c dyn Widget),
}

impl fmt::Debug for Content<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Content::Widget(widget) => f
                .debug_tuple("Widget")
                .field(&widget.widget_type().name())
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Arg<'c> {
    Content(Content<'c>),
    Attributes(Attributes),
}

#[derive(Debug, Clone, Default)]
pub struct Args<'c>(Vec<Arg<'c>>);

impl<'c> Args<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, arg: impl Into<Arg<'c>>) -> Self {
        self.0.push(arg.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Separate the content from the attributes, rejecting more than two
    /// arguments or two of the same kind.
    pub(crate) fn split(self, element: &str) -> HtmlResult<(Option<Content<'c>>, Attributes)> {
        if self.0.len() > 2 {
            return Err(HtmlError::TooManyArguments {
                element: element.to_string(),
                count: self.0.len(),
            });
        }

        let mut content = None;
        let mut attributes = None;
        for arg in self.0 {
            match arg {
                Arg::Content(c) if content.is_none() => content = Some(c),
                Arg::Attributes(a) if attributes.is_none() => attributes = Some(a),
                Arg::Content(_) => {
                    return Err(HtmlError::InvalidArguments {
                        element: element.to_string(),
                        reason: "content was given twice".to_string(),
                    })
                }
                Arg::Attributes(_) => {
                    return Err(HtmlError::InvalidArguments {
                        element: element.to_string(),
                        reason: "attributes were given twice".to_string(),
                    })
                }
            }
        }
        Ok((content, attributes.unwrap_or_default()))
    }
}

impl<'c> From<Text> for Content<'c> {
    fn from(text: Text) -> Self {
        Content::Text(text)
    }
}

impl<'c, W: Widget> From<&'c W> for Content<'c> {
    fn from(widget: &'c W) -> Self {
        Content::Widget(widget)
    }
}

impl<'c> From<Content<'c>> for Arg<'c> {
    fn from(content: Content<'c>) -> Self {
        Arg::Content(content)
    }
}

impl<'c> From<Attributes> for Arg<'c> {
    fn from(attributes: Attributes) -> Self {
        Arg::Attributes(attributes)
    }
}

impl<'c, W: Widget> From<&'c W> for Arg<'c> {
    fn from(widget: &'c W) -> Self {
        Arg::Content(Content::Widget(widget))
    }
}

impl<'c> From<()> for Args<'c> {
    fn from(_: ()) -> Self {
        Args::new()
    }
}

impl<'c> From<Vec<Arg<'c>>> for Args<'c> {
    fn from(args: Vec<Arg<'c>>) -> Self {
        Args(args)
    }
}

impl<'c> From<Arg<'c>> for Args<'c> {
    fn from(arg: Arg<'c>) -> Self {
        Args(vec![arg])
    }
}

impl<'c> From<Content<'c>> for Args<'c> {
    fn from(content: Content<'c>) -> Self {
        Args(vec![Arg::Content(content)])
    }
}

impl<'c> From<Attributes> for Args<'c> {
    fn from(attributes: Attributes) -> Self {
        Args(vec![Arg::Attributes(attributes)])
    }
}

impl<'c, W: Widget> From<&'c W> for Args<'c> {
    fn from(widget: &'c W) -> Self {
        Args(vec![Arg::Content(Content::Widget(widget))])
    }
}

impl<'c, A: Into<Arg<'c>>, B: Into<Arg<'c>>> From<(A, B)> for Args<'c> {
    fn from((a, b): (A, B)) -> Self {
        Args(vec![a.into(), b.into()])
    }
}

impl<'c, A: Into<Arg<'c>>, B: Into<Arg<'c>>, C: Into<Arg<'c>>> From<(A, B, C)> for Args<'c> {
    fn from((a, b, c): (A, B, C)) -> Self {
        Args(vec![a.into(), b.into(), c.into()])
    }
}

// Everything that converts into `Text` can stand as content on its own.
macro_rules! content_from_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'c> From<$ty> for Content<'c> {
                fn from(value: $ty) -> Self {
                    Content::Text(value.into())
                }
            }

            impl<'c> From<$ty> for Arg<'c> {
                fn from(value: $ty) -> Self {
                    Arg::Content(Content::Text(value.into()))
                }
            }

            impl<'c> From<$ty> for Args<'c> {
                fn from(value: $ty) -> Self {
                    Args(vec![Arg::Content(Content::Text(value.into()))])
                }
            }
        )*
    };
}

content_from_text!(&str, String, RawString, Value, char, bool, i32, i64, u32, u64, usize, f64);

impl<'c> From<Text> for Arg<'c> {
    fn from(text: Text) -> Self {
        Arg::Content(Content::Text(text))
    }
}

impl<'c> From<Text> for Args<'c> {
    fn from(text: Text) -> Self {
        Args(vec![Arg::Content(Content::Text(text))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_split_either_order() {
        let (content, attributes) = Args::from(("text", attrs! { "id" => "a" }))
            .split("div")
            .unwrap();
        assert!(matches!(content, Some(Content::Text(Text::Plain(ref s))) if s == "text"));
        assert!(attributes.contains("id"));

        let (content, attributes) = Args::from((attrs! { "id" => "a" }, 42))
            .split("div")
            .unwrap();
        assert!(matches!(content, Some(Content::Text(Text::Plain(ref s))) if s == "42"));
        assert!(attributes.contains("id"));
    }

    #[test]
    fn test_split_empty() {
        let (content, attributes) = Args::from(()).split("div").unwrap();
        assert!(content.is_none());
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_too_many_arguments() {
        let err = Args::from(("foobar", attrs! {}, "fourth"))
            .split("div")
            .unwrap_err();
        assert_eq!(
            err,
            HtmlError::TooManyArguments {
                element: "div".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_duplicate_kinds() {
        let err = Args::from(("a", "b")).split("p").unwrap_err();
        assert!(matches!(err, HtmlError::InvalidArguments { .. }));
    }
}
