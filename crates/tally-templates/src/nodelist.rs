use serde::Serialize;

use crate::expr::Expr;

/// One parsed template node. Block tags own their children; the tree is
/// built once at parse time and is immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Node {
    Text {
        content: String,
    },
    Comment {
        content: String,
    },
    Variable {
        expr: Expr,
    },
    If {
        arms: Vec<IfArm>,
        otherwise: Vec<Node>,
    },
    For {
        binding: String,
        iterable: Expr,
        body: Vec<Node>,
        empty: Vec<Node>,
    },
    /// `{% collect <target> [keyed] %} ... {% endcollect %}` — runs its body
    /// for side effects and publishes the accumulated collection under
    /// `target` once the block closes.
    Collect {
        target: String,
        keyed: bool,
        body: Vec<Node>,
    },
    /// `{% append <value> into <target> [keyed <key>] %}` — writes into the
    /// innermost active collect sink named `target`; renders nothing.
    Append {
        value: Expr,
        target: String,
        key: Option<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IfArm {
    pub condition: Condition,
    pub body: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Condition {
    pub negated: bool,
    pub expr: Expr,
}
