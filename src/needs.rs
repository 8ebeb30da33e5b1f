//! Declared widget inputs and their validation.

use log::debug;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

pub use serde_json::Value;

use crate::error::{HtmlError, HtmlResult};
use crate::widget::{Widget, WidgetType};

/// Names no widget may declare as inputs; the builder uses them itself
pub const RESERVED_INPUTS: &[&str] = &["output", "prettyprint", "block", "parent", "widgets"];

/// One declared input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Need {
    pub name: &'static str,
    /// Required inputs have no default; optional ones default to null
    pub required: bool,
}

impl Need {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// A widget constructed from named inputs.
///
/// ```ignore
/// struct Greeting { name: String }
///
/// impl Needs for Greeting {
///     const NEEDS: &'static [Need] = &[Need::required("name")];
///
///     fn from_inputs(inputs: Inputs) -> HtmlResult<Self> {
///         Ok(Greeting { name: inputs.str("name").unwrap_or_default().to_string() })
///     }
/// }
/// ```
pub trait Needs: Widget + Sized {
    /// Declared inputs. An empty list accepts no inputs at all.
    const NEEDS: &'static [Need];

    fn from_inputs(inputs: Inputs) -> HtmlResult<Self>;

    /// Bind `pairs` against [`Needs::NEEDS`] and construct the widget
    fn with_inputs<I, K, V>(pairs: I) -> HtmlResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::from_inputs(Inputs::bind::<Self, I, K, V>(pairs)?)
    }
}

/// Validated inputs for one widget construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    widget: &'static str,
    values: BTreeMap<String, Value>,
}

impl Inputs {
    /// Check `pairs` against `W`'s declared needs.
    ///
    /// A leading `@` on a name is dropped. Reserved names are always
    /// rejected, then unknown names, then missing required ones. Optional
    /// needs that were not given are bound to null.
    pub fn bind<W, I, K, V>(pairs: I) -> HtmlResult<Self>
    where
        W: Needs,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let widget = WidgetType::of::<W>().name();
        let mut values = BTreeMap::new();

        for (name, value) in pairs {
            let name: String = name.into();
            let name = match name.strip_prefix('@') {
                Some(stripped) => stripped.to_string(),
                None => name,
            };

            if RESERVED_INPUTS.contains(&name.as_str()) {
                return Err(HtmlError::ReservedInput { name });
            }
            if !W::NEEDS.iter().any(|need| need.name == name) {
                return Err(HtmlError::UnknownInput {
                    widget: widget.to_string(),
                    name,
                });
            }
            values.insert(name, value.into());
        }

        for need in W::NEEDS {
            if values.contains_key(need.name) {
                continue;
            }
            if need.required {
                return Err(HtmlError::MissingInput {
                    widget: widget.to_string(),
                    name: need.name.to_string(),
                });
            }
            values.insert(need.name.to_string(), Value::Null);
        }

        debug!("bound {} input(s) for {}", values.len(), widget);
        Ok(Self { widget, values })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The input as a string, if it is one
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Deserialize all inputs at once into a struct with matching fields
    pub fn deserialize<T: DeserializeOwned>(self) -> HtmlResult<T> {
        let widget = self.widget;
        let object = self.values.into_iter().collect();
        serde_json::from_value(Value::Object(object)).map_err(|err| HtmlError::InvalidInput {
            widget: widget.to_string(),
            reason: err.to_string(),
        })
    }
}

/// Build an input list: `inputs! { "name" => "Ada", "count" => 3 }`.
#[macro_export]
macro_rules! inputs {
    () => {
        ::std::vec::Vec::<(::std::string::String, $crate::needs::Value)>::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$( (::std::string::String::from($name), $crate::needs::Value::from($value)) ),+]
    };
}
