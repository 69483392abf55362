//! Template parsing for the tally engine.
//!
//! This crate turns template source into an owned node tree and knows
//! nothing about rendering:
//!
//! 1. **Lexing**: source text is tokenized into `{% %}` blocks, `{{ }}`
//!    variables, `{# #}` comments, and literal text
//! 2. **Expressions**: variable/argument syntax is compiled into [`expr::Expr`]
//!    (literal or dotted path, plus a filter chain)
//! 3. **Parsing**: tokens become a [`nodelist::Node`] tree; block tags own
//!    their children up to the matching closing tag
//!
//! The directive grammar lives in [`Parser`]: `if`/`elif`/`else`, `for` with
//! an `empty` branch, and the accumulator pair `collect`/`endcollect` and
//! `append ... into ... [keyed ...]`.
//!
//! ## Example
//!
//! ```
//! let nodes = tally_templates::parse(
//!     "{% collect c %}{% append \"a\" into c %}{% endcollect %}",
//! )
//! .unwrap();
//! assert_eq!(nodes.len(), 1);
//! ```

pub mod expr;
mod lexer;
pub mod nodelist;
mod parser;
mod quotes;
mod tokens;

pub use lexer::Lexer;
pub use parser::ParseError;
pub use parser::Parser;
pub use tokens::Token;
pub use tokens::TokenKind;

/// Lex and parse template source into a node tree.
pub fn parse(source: &str) -> Result<Vec<nodelist::Node>, ParseError> {
    let tokens = Lexer::new(source).tokenize();
    Parser::new(tokens).parse()
}
