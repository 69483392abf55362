use serde::Serialize;
use thiserror::Error;

use tally_templates::ParseError;

/// Render-time template-authoring errors. The first one aborts the whole
/// render; nothing partial is published.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum RenderError {
    #[error("'append' into '{name}' could not be resolved to an active 'collect' block")]
    UnresolvedTarget { name: String },

    #[error("cannot append keyed values to unkeyed collect")]
    KeyedIntoUnkeyed,

    #[error("cannot append unkeyed values to keyed collect")]
    UnkeyedIntoKeyed,

    #[error("'append' could not resolve key to a string value")]
    KeyNotString,

    #[error("unknown filter '{name}'")]
    UnknownFilter { name: String },

    #[error("filter '{name}' requires an argument")]
    MissingFilterArgument { name: String },

    #[error("'for' loop subject is not iterable: {value}")]
    NotIterable { value: String },
}

#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum TemplateError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
