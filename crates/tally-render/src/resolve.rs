use tally_templates::expr::Expr;
use tally_templates::expr::ExprBase;
use tally_templates::expr::Literal;

use crate::context::Context;
use crate::error::RenderError;
use crate::filters;
use crate::value::Value;

/// Resolve a compiled expression against the context.
///
/// Absence is a value, not a failure: a path miss at any segment yields
/// `Ok(None)` and flows through the filter chain as such. Only genuine
/// evaluation faults (an unknown filter, a filter missing its required
/// argument) are errors.
pub(crate) fn resolve(expr: &Expr, context: &Context) -> Result<Option<Value>, RenderError> {
    let mut current = resolve_base(&expr.base, context);

    for filter in &expr.filters {
        let arg = filter.arg.as_ref().and_then(|arg| resolve_base(arg, context));
        current = filters::apply(&filter.name, current, arg)?;
    }

    Ok(current)
}

fn resolve_base(base: &ExprBase, context: &Context) -> Option<Value> {
    match base {
        ExprBase::Literal(literal) => Some(literal_value(literal)),
        ExprBase::Path(path) => context.lookup(path),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Str(s) => Value::String(s.clone()),
        Literal::Int(i) => Value::from(*i),
        Literal::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::value::Map;

    fn context() -> Context {
        let Value::Object(root) = json!({"name": "ada", "items": ["a", "b"]}) else {
            unreachable!()
        };
        Context::from_object(root)
    }

    fn parse(raw: &str) -> Expr {
        Expr::parse(raw).unwrap()
    }

    #[test]
    fn resolves_literals_without_context() {
        let context = Context::from_object(Map::new());
        assert_eq!(
            resolve(&parse("\"hi\""), &context).unwrap(),
            Some(json!("hi"))
        );
        assert_eq!(resolve(&parse("3"), &context).unwrap(), Some(json!(3)));
    }

    #[test]
    fn resolves_paths() {
        assert_eq!(
            resolve(&parse("name"), &context()).unwrap(),
            Some(json!("ada"))
        );
        assert_eq!(
            resolve(&parse("items.1"), &context()).unwrap(),
            Some(json!("b"))
        );
    }

    #[test]
    fn missing_path_is_absent_not_an_error() {
        assert_eq!(resolve(&parse("nope.nope"), &context()).unwrap(), None);
    }

    #[test]
    fn filters_chain_left_to_right() {
        assert_eq!(
            resolve(&parse("missing|default:name|upper"), &context()).unwrap(),
            Some(json!("ADA"))
        );
    }

    #[test]
    fn unknown_filter_propagates() {
        assert_eq!(
            resolve(&parse("name|sparkle"), &context()),
            Err(RenderError::UnknownFilter {
                name: "sparkle".to_string()
            })
        );
    }
}
