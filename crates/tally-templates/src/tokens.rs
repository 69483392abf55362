use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TokenKind {
    /// Content between `{%` and `%}`, delimiters stripped and trimmed.
    Block(String),
    /// Content between `{#` and `#}`.
    Comment(String),
    /// An unterminated construct; holds whatever was scanned before recovery.
    Error(String),
    Eof,
    /// Literal template text, passed through untouched.
    Text(String),
    /// Content between `{{` and `}}`, delimiters stripped and trimmed.
    Variable(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Token {
    kind: TokenKind,
    start: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, start: usize) -> Self {
        Self { kind, start }
    }

    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn into_parts(self) -> (TokenKind, usize) {
        (self.kind, self.start)
    }
}
