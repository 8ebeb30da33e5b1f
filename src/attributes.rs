use std::collections::BTreeMap;

use crate::escape::{RawString, Text};

/// The value bound to an attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(Text),
    /// Space-separated token list, e.g. CSS classes
    Tokens(Vec<Text>),
    /// Suppresses the attribute
    Absent,
}

impl AttrValue {
    /// The escaped value to write between quotes, or `None` when the
    /// attribute should be left out entirely.
    pub fn resolve(&self) -> Option<String> {
        match self {
            AttrValue::Text(text) => Some(text.escaped().into_owned()),
            AttrValue::Tokens(tokens) => {
                let tokens: Vec<_> = tokens
                    .iter()
                    .filter(|token| !token.is_empty())
                    .map(|token| token.escaped())
                    .collect();
                if tokens.is_empty() {
                    None
                } else {
                    Some(tokens.join(" "))
                }
            }
            AttrValue::Absent => None,
        }
    }
}

impl From<Text> for AttrValue {
    fn from(text: Text) -> Self {
        AttrValue::Text(text)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.into())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s.into())
    }
}

impl From<RawString> for AttrValue {
    fn from(raw: RawString) -> Self {
        AttrValue::Text(raw.into())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Absent, Into::into)
    }
}

impl<T: Into<Text>> From<Vec<T>> for AttrValue {
    fn from(tokens: Vec<T>) -> Self {
        AttrValue::Tokens(tokens.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Text>, const N: usize> From<[T; N]> for AttrValue {
    fn from(tokens: [T; N]) -> Self {
        AttrValue::Tokens(tokens.into_iter().map(Into::into).collect())
    }
}

macro_rules! attr_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Text(Text::Plain(value.to_string()))
                }
            }
        )*
    };
}

attr_from_display!(char, i32, i64, u32, u64, usize, f64);

/// Attribute map. Rendering is always in lexicographic key order, whatever
/// order the attributes were set in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Attributes::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// ` name="value"` pairs, alphabetically, suppressed values skipped
    pub fn render(&self) -> String {
        self.render_ordered(&[])
    }

    /// Like [`Attributes::render`], but the names in `leading` come first, in
    /// the order given. The XML declaration needs this.
    pub fn render_ordered(&self, leading: &[&str]) -> String {
        let mut out = String::new();
        let leading_pairs = leading
            .iter()
            .filter_map(|name| self.0.get_key_value(*name));
        let rest = self
            .0
            .iter()
            .filter(|(name, _)| !leading.contains(&name.as_str()));

        for (name, value) in leading_pairs.chain(rest) {
            if let Some(value) = value.resolve() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&value);
                out.push('"');
            }
        }
        out
    }
}

impl From<()> for Attributes {
    fn from(_: ()) -> Self {
        Attributes::new()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

impl<K: Into<String>, V: Into<AttrValue>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Build an [`Attributes`] map: `attrs! { "class" => ["a", "b"], "id" => "main" }`.
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attributes = $crate::Attributes::new();
        $( attributes.set($name, $value); )+
        attributes
    }};
}
