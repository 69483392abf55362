use tally_templates::expr::Expr;
use tally_templates::nodelist::Condition;
use tally_templates::nodelist::IfArm;
use tally_templates::nodelist::Node;
use tracing::debug;
use tracing::trace;

use crate::context::Context;
use crate::error::RenderError;
use crate::resolve::resolve;
use crate::value;
use crate::value::Map;
use crate::value::Value;

/// Render a node tree depth-first, left to right, into one output buffer.
/// The first error aborts the render; scope and sink frames pushed along
/// the way are unwound before it propagates.
pub(crate) fn render(nodes: &[Node], context: &mut Context) -> Result<String, RenderError> {
    let mut out = String::new();
    render_nodes(nodes, context, &mut out)?;
    Ok(out)
}

fn render_nodes(
    nodes: &[Node],
    context: &mut Context,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        render_node(node, context, out)?;
    }
    Ok(())
}

fn render_node(node: &Node, context: &mut Context, out: &mut String) -> Result<(), RenderError> {
    match node {
        Node::Text { content } => {
            out.push_str(content);
            Ok(())
        }
        Node::Comment { .. } => Ok(()),
        Node::Variable { expr } => {
            if let Some(resolved) = resolve(expr, context)? {
                out.push_str(&value::display(&resolved));
            }
            Ok(())
        }
        Node::If { arms, otherwise } => render_if(arms, otherwise, context, out),
        Node::For {
            binding,
            iterable,
            body,
            empty,
        } => render_for(binding, iterable, body, empty, context, out),
        Node::Collect {
            target,
            keyed,
            body,
        } => render_collect(target, *keyed, body, context),
        Node::Append { value, target, key } => {
            render_append(value, target, key.as_ref(), context)
        }
    }
}

fn render_if(
    arms: &[IfArm],
    otherwise: &[Node],
    context: &mut Context,
    out: &mut String,
) -> Result<(), RenderError> {
    for arm in arms {
        if eval_condition(&arm.condition, context)? {
            return render_nodes(&arm.body, context, out);
        }
    }
    render_nodes(otherwise, context, out)
}

fn eval_condition(condition: &Condition, context: &Context) -> Result<bool, RenderError> {
    let truthy = resolve(&condition.expr, context)?
        .as_ref()
        .is_some_and(value::is_truthy);
    Ok(truthy != condition.negated)
}

fn render_for(
    binding: &str,
    iterable: &Expr,
    body: &[Node],
    empty: &[Node],
    context: &mut Context,
    out: &mut String,
) -> Result<(), RenderError> {
    let items = match resolve(iterable, context)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(RenderError::NotIterable {
                value: value::display(&other),
            })
        }
    };

    if items.is_empty() {
        return render_nodes(empty, context, out);
    }

    let length = items.len();
    for (index, item) in items.into_iter().enumerate() {
        let mut frame = Map::new();
        frame.insert(binding.to_string(), item);
        frame.insert("forloop".to_string(), forloop_meta(index, length));

        context.push_scope(frame);
        let result = render_nodes(body, context, out);
        context.pop_scope();
        result?;
    }

    Ok(())
}

fn forloop_meta(index: usize, length: usize) -> Value {
    let mut meta = Map::new();
    meta.insert("counter".to_string(), Value::from(index + 1));
    meta.insert("counter0".to_string(), Value::from(index));
    meta.insert("first".to_string(), Value::Bool(index == 0));
    meta.insert("last".to_string(), Value::Bool(index + 1 == length));
    meta.insert("length".to_string(), Value::from(length));
    Value::Object(meta)
}

fn render_collect(
    target: &str,
    keyed: bool,
    body: &[Node],
    context: &mut Context,
) -> Result<(), RenderError> {
    trace!(name = target, keyed, "collect sink installed");
    context.push_sink(target, keyed);

    // The body runs for its side effects; whatever text it produces is
    // dropped, and the directive itself contributes nothing to the output.
    let mut discarded = String::new();
    let result = render_nodes(body, context, &mut discarded);

    // The sink frame comes off before any error propagates, so a failed
    // block can never leave a stale sink behind.
    let sink = context.pop_sink();
    result?;

    if let Some(sink) = sink {
        debug!(name = target, "collect block published");
        context.set(target, sink.finalize());
    }

    Ok(())
}

fn render_append(
    value: &Expr,
    target: &str,
    key: Option<&Expr>,
    context: &mut Context,
) -> Result<(), RenderError> {
    if !context.has_sink(target) {
        return Err(RenderError::UnresolvedTarget {
            name: target.to_string(),
        });
    }

    // An absent value is tolerated and skipped; an absent or non-string
    // key is not.
    let Some(resolved) = resolve(value, context)? else {
        trace!(name = target, "append skipped, value absent");
        return Ok(());
    };

    let key = match key {
        Some(expr) => match resolve(expr, context)? {
            Some(Value::String(s)) => Some(s),
            _ => return Err(RenderError::KeyNotString),
        },
        None => None,
    };

    let Some(sink) = context.sink_mut(target) else {
        return Err(RenderError::UnresolvedTarget {
            name: target.to_string(),
        });
    };

    match key {
        Some(key) => sink.append_keyed(resolved, key),
        None => sink.append(resolved),
    }
}
