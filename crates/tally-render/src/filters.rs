use crate::error::RenderError;
use crate::value;
use crate::value::Value;

/// Apply one filter in a chain. `value` is the running result, `None`
/// meaning absent; absent values pass through untouched except for
/// `default`, which replaces them.
pub(crate) fn apply(
    name: &str,
    value: Option<Value>,
    arg: Option<Value>,
) -> Result<Option<Value>, RenderError> {
    match name {
        "default" => {
            let fallback = require_arg(name, arg)?;
            Ok(match value {
                None | Some(Value::Null) => Some(fallback),
                present => present,
            })
        }
        "join" => {
            let separator = value::display(&require_arg(name, arg)?);
            Ok(value.map(|v| match v {
                Value::Array(items) => {
                    let joined = items
                        .iter()
                        .map(value::display)
                        .collect::<Vec<_>>()
                        .join(&separator);
                    Value::String(joined)
                }
                other => other,
            }))
        }
        "upper" => Ok(value.map(|v| map_string(v, str::to_uppercase))),
        "lower" => Ok(value.map(|v| map_string(v, str::to_lowercase))),
        "length" => Ok(value.and_then(|v| match v {
            Value::String(s) => Some(Value::from(s.chars().count())),
            Value::Array(items) => Some(Value::from(items.len())),
            Value::Object(map) => Some(Value::from(map.len())),
            _ => None,
        })),
        _ => Err(RenderError::UnknownFilter {
            name: name.to_string(),
        }),
    }
}

fn require_arg(name: &str, arg: Option<Value>) -> Result<Value, RenderError> {
    arg.ok_or_else(|| RenderError::MissingFilterArgument {
        name: name.to_string(),
    })
}

fn map_string(value: Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}
