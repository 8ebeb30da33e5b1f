use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Numeric reference emitted for each space by [`nbsp`]
pub const NBSP: &str = "&#160;";

/// A string that is already valid markup and must never be escaped again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawString(String);

impl RawString {
    pub fn new(text: impl Into<String>) -> Self {
        RawString(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RawString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<RawString> for String {
    fn from(raw: RawString) -> Self {
        raw.0
    }
}

/// Text headed for the document: either plain (escaped on output) or raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Plain(String),
    Raw(RawString),
}

impl Text {
    /// The escaped form, borrowed when nothing needed escaping
    pub fn escaped(&self) -> Cow<'_, str> {
        match self {
            Text::Plain(s) => escape_str(s),
            Text::Raw(raw) => Cow::Borrowed(raw.as_str()),
        }
    }

    /// The text exactly as given, ignoring escaping
    pub fn as_str(&self) -> &str {
        match self {
            Text::Plain(s) => s,
            Text::Raw(raw) => raw.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Plain(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Plain(s)
    }
}

impl From<RawString> for Text {
    fn from(raw: RawString) -> Self {
        Text::Raw(raw)
    }
}

impl From<&RawString> for Text {
    fn from(raw: &RawString) -> Self {
        Text::Raw(raw.clone())
    }
}

impl From<Value> for Text {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Text::Plain(s),
            other => Text::Plain(other.to_string()),
        }
    }
}

macro_rules! text_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Text {
                fn from(value: $ty) -> Self {
                    Text::Plain(value.to_string())
                }
            }
        )*
    };
}

text_from_display!(char, bool, i32, i64, u8, u16, u32, u64, usize, f32, f64);

/// Escape text content. `RawString`s pass through untouched.
pub fn escape_text(value: impl Into<Text>) -> String {
    value.into().escaped().into_owned()
}

/// Escape an attribute value. `RawString`s pass through untouched.
pub fn escape_attribute(value: impl Into<Text>) -> String {
    value.into().escaped().into_owned()
}

/// Mark `text` as already-escaped markup
pub fn raw(text: impl Into<String>) -> RawString {
    RawString::new(text)
}

/// Escape `value` and mark the result raw, so later emission leaves it alone.
pub fn h(value: impl Into<Text>) -> RawString {
    RawString::new(escape_text(value))
}

/// Escape `value`, then turn every space into a non-breaking space reference.
///
/// The result is raw, so it can go into text or attribute context without
/// the references being escaped a second time.
pub fn nbsp(value: impl Into<Text>) -> RawString {
    RawString::new(escape_text(value).replace(' ', NBSP))
}

/// A single non-breaking space, the same as `nbsp(" ")`
pub fn nbsp_default() -> RawString {
    RawString::new(NBSP)
}

// `&`, `<`, `>` and `"` are replaced in both text and attribute context. The
// single quote is left alone since attributes are always double-quoted.
fn escape_str(s: &str) -> Cow<'_, str> {
    let replacement = |c: char| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        _ => None,
    };

    if !s.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match replacement(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PLAIN: &str = r#"if (x < y && x > z) alert("don't stop");"#;
    const ESCAPED: &str = "if (x &lt; y &amp;&amp; x &gt; z) alert(&quot;don't stop&quot;);";

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(PLAIN), ESCAPED);
        assert_eq!(escape_text("test &<>text"), "test &amp;&lt;&gt;text");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute("foo.cgi?a&b"), "foo.cgi?a&amp;b");
        assert_eq!(escape_attribute("alert(\"foo\")"), "alert(&quot;foo&quot;)");
    }

    #[test]
    fn test_raw_is_never_escaped() {
        assert_eq!(escape_text(raw("<b>bold</b>")), "<b>bold</b>");
        assert_eq!(escape_attribute(raw("foo?x=&nbsp;")), "foo?x=&nbsp;");
        assert_eq!(raw("&").into_string(), "&");
    }

    #[test]
    fn test_h_does_not_double_escape() {
        assert_eq!(h("&").as_str(), "&amp;");
        assert_eq!(h(raw("&")).as_str(), "&");
        assert_eq!(escape_text(h(PLAIN)), ESCAPED);
    }

    #[test]
    fn test_non_string_values_use_display() {
        assert_eq!(escape_text(42), "42");
        assert_eq!(escape_text(json!({"answer": "<42>"})), r#"{&quot;answer&quot;:&quot;&lt;42&gt;&quot;}"#);
        assert_eq!(escape_text(json!("a&b")), "a&amp;b");
    }

    #[test]
    fn test_nbsp() {
        assert_eq!(nbsp("a  b").as_str(), "a&#160;&#160;b");
        assert_eq!(nbsp("&<> foo").as_str(), "&amp;&lt;&gt;&#160;foo");
        assert_eq!(nbsp(" ").as_str(), "&#160;");
        assert_eq!(nbsp_default(), nbsp(" "));
    }

    #[test]
    fn test_escaped_borrows_clean_text() {
        let text = Text::from("nothing to see");
        assert!(matches!(text.escaped(), Cow::Borrowed(_)));
    }
}
