use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::error::{HtmlError, HtmlResult};
use crate::escape::RawString;

/// Names available in [`CharacterTable::standard`]
const STANDARD_NAMES: &[(&str, u32)] = &[
    ("no_break_space", 0xa0),
    ("cent_sign", 0xa2),
    ("pound_sign", 0xa3),
    ("yen_sign", 0xa5),
    ("section_sign", 0xa7),
    ("copyright_sign", 0xa9),
    ("registered_sign", 0xae),
    ("degree_sign", 0xb0),
    ("plus_minus_sign", 0xb1),
    ("pilcrow_sign", 0xb6),
    ("middle_dot", 0xb7),
    ("multiplication_sign", 0xd7),
    ("division_sign", 0xf7),
    ("en_dash", 0x2013),
    ("em_dash", 0x2014),
    ("left_single_quotation_mark", 0x2018),
    ("right_single_quotation_mark", 0x2019),
    ("left_double_quotation_mark", 0x201c),
    ("right_double_quotation_mark", 0x201d),
    ("bullet", 0x2022),
    ("horizontal_ellipsis", 0x2026),
    ("euro_sign", 0x20ac),
    ("trade_mark_sign", 0x2122),
    ("left_arrow", 0x2190),
    ("up_arrow", 0x2191),
    ("right_arrow", 0x2192),
    ("down_arrow", 0x2193),
    ("left_right_arrow", 0x2194),
    ("infinity", 0x221e),
    ("not_equal_to", 0x2260),
    ("less_than_or_equal_to", 0x2264),
    ("greater_than_or_equal_to", 0x2265),
    ("black_star", 0x2605),
    ("check_mark", 0x2713),
    ("old_persian_sign_ka", 0x103a3),
];

/// What [`CharacterTable::resolve`] accepts: a codepoint or a symbolic name.
/// Any other shape is kept only so it can be reported.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterRef {
    Codepoint(i64),
    Name(String),
    Unsupported(String),
}

impl From<u32> for CharacterRef {
    fn from(codepoint: u32) -> Self {
        CharacterRef::Codepoint(i64::from(codepoint))
    }
}

impl From<i32> for CharacterRef {
    fn from(codepoint: i32) -> Self {
        CharacterRef::Codepoint(i64::from(codepoint))
    }
}

impl From<i64> for CharacterRef {
    fn from(codepoint: i64) -> Self {
        CharacterRef::Codepoint(codepoint)
    }
}

impl From<char> for CharacterRef {
    fn from(c: char) -> Self {
        CharacterRef::Codepoint(i64::from(u32::from(c)))
    }
}

impl From<&str> for CharacterRef {
    fn from(name: &str) -> Self {
        CharacterRef::Name(name.to_string())
    }
}

impl From<String> for CharacterRef {
    fn from(name: String) -> Self {
        CharacterRef::Name(name)
    }
}

impl From<Value> for CharacterRef {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => CharacterRef::Name(name),
            Value::Number(n) => match n.as_i64() {
                Some(codepoint) => CharacterRef::Codepoint(codepoint),
                None => CharacterRef::Unsupported(n.to_string()),
            },
            other => CharacterRef::Unsupported(other.to_string()),
        }
    }
}

/// Lookup of symbolic character names to codepoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterTable {
    names: HashMap<String, u32>,
}

impl CharacterTable {
    /// An empty table; only codepoints resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table of common names, shared across sessions
    pub fn standard() -> Arc<CharacterTable> {
        static STANDARD: OnceLock<Arc<CharacterTable>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                Arc::new(
                    STANDARD_NAMES
                        .iter()
                        .map(|&(name, codepoint)| (name.to_string(), codepoint))
                        .collect(),
                )
            })
            .clone()
    }

    /// Parse a YAML mapping of name to codepoint, e.g. `right_arrow: 0x2192`
    pub fn from_yaml(yaml: &str) -> HtmlResult<Self> {
        let names: HashMap<String, u32> = serde_yaml::from_str(yaml)?;
        Ok(Self { names })
    }

    pub fn insert(&mut self, name: impl Into<String>, codepoint: u32) -> &mut Self {
        self.names.insert(name.into(), codepoint);
        self
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Turn a codepoint or known name into a hexadecimal character reference
    pub fn resolve(&self, reference: impl Into<CharacterRef>) -> HtmlResult<RawString> {
        match reference.into() {
            CharacterRef::Codepoint(codepoint) => match u32::try_from(codepoint) {
                Ok(codepoint) => Ok(codepoint_reference(codepoint)),
                Err(_) => Err(HtmlError::InvalidCharacterArgument {
                    argument: codepoint.to_string(),
                }),
            },
            CharacterRef::Name(name) => self
                .get(&name)
                .map(codepoint_reference)
                .ok_or(HtmlError::UnrecognizedCharacter { name }),
            CharacterRef::Unsupported(argument) => {
                Err(HtmlError::InvalidCharacterArgument { argument })
            }
        }
    }
}

impl FromIterator<(String, u32)> for CharacterTable {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// `&#x<hex>;` with lowercase digits and no leading zeros
pub fn codepoint_reference(codepoint: u32) -> RawString {
    RawString::new(format!("&#x{codepoint:x};"))
}
