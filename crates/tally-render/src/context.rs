use crate::sink::Sink;
use crate::value::Map;
use crate::value::Value;

/// The evaluation context: a stack of name→value scope frames plus a stack
/// of named sink frames for the `collect` blocks currently rendering.
///
/// Sinks are deliberately not stored in the variable namespace; `append`
/// addresses them through [`Context::sink_mut`] only. Variable resolution
/// still *reads* through to in-progress sinks so a block can inspect what
/// it has accumulated so far.
#[derive(Debug, Default)]
pub struct Context {
    scopes: Vec<Map<String, Value>>,
    sinks: Vec<SinkFrame>,
}

#[derive(Debug)]
struct SinkFrame {
    name: String,
    sink: Sink,
    /// Number of scope frames that existed when this sink was pushed.
    /// Shadowing between scopes and sinks is by recency, exactly as if the
    /// sink were one more frame on the scope stack.
    depth: usize,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Map::new()],
            sinks: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_object(root: Map<String, Value>) -> Self {
        Self {
            scopes: vec![root],
            sinks: Vec::new(),
        }
    }

    pub fn push_scope(&mut self, frame: Map<String, Value>) {
        self.scopes.push(frame);
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope frame.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Look up a bare name, innermost frame first. Sink frames participate
    /// in shadowing at the position they were pushed; reads of a sink see a
    /// snapshot of its in-progress contents.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut sinks = self.sinks.iter().rev().peekable();

        for (idx, scope) in self.scopes.iter().enumerate().rev() {
            while let Some(frame) = sinks.peek() {
                if frame.depth <= idx {
                    break;
                }
                if frame.name == name {
                    return Some(frame.sink.as_value());
                }
                sinks.next();
            }
            if let Some(value) = scope.get(name) {
                return Some(value.clone());
            }
        }

        for frame in sinks {
            if frame.name == name {
                return Some(frame.sink.as_value());
            }
        }

        None
    }

    /// Walk a dotted path: map keys and numeric list indices. Any miss
    /// yields `None`.
    #[must_use]
    pub fn lookup(&self, path: &[String]) -> Option<Value> {
        let (root, rest) = path.split_first()?;
        let mut value = self.get(root)?;

        for segment in rest {
            value = match value {
                Value::Object(map) => map.get(segment)?.clone(),
                Value::Array(items) => {
                    let index: usize = segment.parse().ok()?;
                    items.get(index)?.clone()
                }
                _ => return None,
            };
        }

        Some(value)
    }

    pub fn push_sink(&mut self, name: &str, keyed: bool) {
        self.sinks.push(SinkFrame {
            name: name.to_string(),
            sink: Sink::new(keyed),
            depth: self.scopes.len(),
        });
    }

    pub fn pop_sink(&mut self) -> Option<Sink> {
        self.sinks.pop().map(|frame| frame.sink)
    }

    #[must_use]
    pub fn has_sink(&self, name: &str) -> bool {
        self.sinks.iter().any(|frame| frame.name == name)
    }

    /// The innermost active sink with this name; nested `collect` blocks
    /// shadow outer ones of the same name.
    pub fn sink_mut(&mut self, name: &str) -> Option<&mut Sink> {
        self.sinks
            .iter_mut()
            .rev()
            .find(|frame| frame.name == name)
            .map(|frame| &mut frame.sink)
    }
}
