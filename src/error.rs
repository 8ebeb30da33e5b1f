use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type HtmlResult<T> = Result<T, HtmlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HtmlError {
    // --- builder argument errors ---

    #[error("Too many arguments to '{element}': expected at most 2 besides the block, got {count}")]
    TooManyArguments { element: String, count: usize },

    #[error("Invalid arguments to '{element}': {reason}")]
    InvalidArguments { element: String, reason: String },

    #[error("'{element}' cannot take both content and a block. Please choose one")]
    ContentAndBlock { element: String },

    // --- widget construction errors ---

    #[error("Input '{name}' collides with a reserved widget slot")]
    ReservedInput { name: String },

    #[error("Unknown input '{name}' for widget '{widget}'")]
    UnknownInput { widget: String, name: String },

    #[error("Missing required input '{name}' for widget '{widget}'")]
    MissingInput { widget: String, name: String },

    #[error("Invalid inputs for widget '{widget}': {reason}")]
    InvalidInput { widget: String, reason: String },

    #[error("Widget '{widget}' has no content method '{method}'")]
    UnknownContentMethod { widget: String, method: String },

    // --- character references ---

    #[error("Unrecognized character {name}")]
    UnrecognizedCharacter { name: String },

    #[error("Unrecognized argument to character: {argument}")]
    InvalidCharacterArgument { argument: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_yaml::Error> for HtmlError {
    fn from(err: serde_yaml::Error) -> Self {
        HtmlError::ConfigError(err.to_string())
    }
}

/// Non-fatal problems noticed while rendering. They never abort a render;
/// they are logged and collected on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkupWarning {
    /// A comment contains `--`, which the HTML comment grammar forbids.
    AdjacentHyphens { comment: String },
}

impl fmt::Display for MarkupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupWarning::AdjacentHyphens { .. } => f.write_str(
                "Authors should avoid putting two or more adjacent hyphens inside comments.",
            ),
        }
    }
}
