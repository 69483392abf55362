use crate::error::RenderError;
use crate::value::Map;
use crate::value::Value;

/// The mutable accumulator behind one active `collect` block.
///
/// A sink is created fresh for every activation of a collect node, written
/// only by `append` directives rendering inside that block, and consumed
/// exactly once by [`Sink::finalize`] when the block closes.
#[derive(Clone, Debug, PartialEq)]
pub enum Sink {
    /// Ordered, append-only. Source order is the published order.
    Sequence(Vec<Value>),
    /// String-keyed, last write wins. Key order carries no meaning.
    Mapping(Map<String, Value>),
}

impl Sink {
    #[must_use]
    pub fn new(keyed: bool) -> Self {
        if keyed {
            Sink::Mapping(Map::new())
        } else {
            Sink::Sequence(Vec::new())
        }
    }

    pub fn append(&mut self, value: Value) -> Result<(), RenderError> {
        match self {
            Sink::Sequence(items) => {
                items.push(value);
                Ok(())
            }
            Sink::Mapping(_) => Err(RenderError::UnkeyedIntoKeyed),
        }
    }

    pub fn append_keyed(&mut self, value: Value, key: String) -> Result<(), RenderError> {
        match self {
            Sink::Mapping(entries) => {
                entries.insert(key, value);
                Ok(())
            }
            Sink::Sequence(_) => Err(RenderError::KeyedIntoUnkeyed),
        }
    }

    /// Snapshot of the in-progress contents, for reads while the owning
    /// block is still rendering.
    #[must_use]
    pub fn as_value(&self) -> Value {
        match self {
            Sink::Sequence(items) => Value::Array(items.clone()),
            Sink::Mapping(entries) => Value::Object(entries.clone()),
        }
    }

    #[must_use]
    pub fn finalize(self) -> Value {
        match self {
            Sink::Sequence(items) => Value::Array(items),
            Sink::Mapping(entries) => Value::Object(entries),
        }
    }
}
