use serde::Serialize;
use thiserror::Error;

use crate::expr::Expr;
use crate::expr::ExprError;
use crate::nodelist::Condition;
use crate::nodelist::IfArm;
use crate::nodelist::Node;
use crate::quotes::split_on_whitespace;
use crate::tokens::Token;
use crate::tokens::TokenKind;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

/// A decomposed `{% ... %}` token: tag name, whitespace-split argument
/// bits (quote-aware, so quoted arguments stay whole), and byte offset.
struct Tag {
    name: String,
    bits: Vec<String>,
    start: usize,
}

impl Tag {
    fn decompose(content: &str, start: usize) -> Result<Self, ParseError> {
        let mut pieces = split_on_whitespace(content).into_iter();
        let name = pieces.next().ok_or(ParseError::EmptyTag { position: start })?;
        Ok(Tag {
            name,
            bits: pieces.collect(),
            start,
        })
    }
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Vec<Node>, ParseError> {
        let (nodes, closer) = self.parse_until(&[])?;
        debug_assert!(closer.is_none());
        Ok(nodes)
    }

    /// Consume nodes until one of `closers` is found (returned as the second
    /// element) or the stream ends (second element `None`). Callers that
    /// opened a block treat `None` as an unclosed-tag error.
    fn parse_until(&mut self, closers: &[&str]) -> Result<(Vec<Node>, Option<Tag>), ParseError> {
        let mut nodes = Vec::new();

        loop {
            let (kind, start) = self.advance().into_parts();

            match kind {
                TokenKind::Text(content) => {
                    if !content.is_empty() {
                        nodes.push(Node::Text { content });
                    }
                }
                TokenKind::Comment(content) => nodes.push(Node::Comment { content }),
                TokenKind::Variable(content) => {
                    let expr = Expr::parse(&content)
                        .map_err(|err| ParseError::expression(start, &err))?;
                    nodes.push(Node::Variable { expr });
                }
                TokenKind::Block(content) => {
                    let tag = Tag::decompose(&content, start)?;
                    if closers.contains(&tag.name.as_str()) {
                        return Ok((nodes, Some(tag)));
                    }
                    nodes.push(self.parse_tag(tag)?);
                }
                TokenKind::Error(content) => {
                    return Err(ParseError::MalformedConstruct {
                        position: start,
                        content,
                    })
                }
                TokenKind::Eof => return Ok((nodes, None)),
            }
        }
    }

    fn parse_tag(&mut self, tag: Tag) -> Result<Node, ParseError> {
        match tag.name.as_str() {
            "if" => self.parse_if(&tag),
            "for" => self.parse_for(&tag),
            "collect" => self.parse_collect(&tag),
            "append" => Self::parse_append(&tag),
            "elif" | "else" | "endif" | "empty" | "endfor" | "endcollect" => {
                Err(ParseError::UnexpectedTag {
                    name: tag.name.clone(),
                    position: tag.start,
                })
            }
            _ => Err(ParseError::UnknownTag {
                name: tag.name.clone(),
                position: tag.start,
            }),
        }
    }

    fn parse_collect(&mut self, tag: &Tag) -> Result<Node, ParseError> {
        let (target, keyed) = match tag.bits.as_slice() {
            [target] => (target.clone(), false),
            [target, kw] if kw == "keyed" => (target.clone(), true),
            _ => {
                return Err(ParseError::CollectSyntax {
                    position: tag.start,
                })
            }
        };

        let (body, closer) = self.parse_until(&["endcollect"])?;
        if closer.is_none() {
            return Err(ParseError::UnclosedTag {
                tag: "collect".to_string(),
                expected: "endcollect".to_string(),
                position: tag.start,
            });
        }

        Ok(Node::Collect {
            target,
            keyed,
            body,
        })
    }

    fn parse_append(tag: &Tag) -> Result<Node, ParseError> {
        let (value_raw, target, key_raw) = match tag.bits.as_slice() {
            [value, into, target] if into == "into" => (value, target, None),
            [value, into, target, keyed, key] if into == "into" && keyed == "keyed" => {
                (value, target, Some(key))
            }
            _ => {
                return Err(ParseError::AppendSyntax {
                    position: tag.start,
                })
            }
        };

        let value =
            Expr::parse(value_raw).map_err(|err| ParseError::expression(tag.start, &err))?;
        let key = key_raw
            .map(|raw| Expr::parse(raw))
            .transpose()
            .map_err(|err| ParseError::expression(tag.start, &err))?;

        Ok(Node::Append {
            value,
            target: target.clone(),
            key,
        })
    }

    fn parse_if(&mut self, tag: &Tag) -> Result<Node, ParseError> {
        let mut arms = Vec::new();
        let mut condition = Self::parse_condition(tag)?;

        loop {
            let (body, closer) = self.parse_until(&["elif", "else", "endif"])?;
            let Some(closer) = closer else {
                return Err(ParseError::UnclosedTag {
                    tag: "if".to_string(),
                    expected: "endif".to_string(),
                    position: tag.start,
                });
            };

            arms.push(IfArm { condition, body });

            match closer.name.as_str() {
                "elif" => condition = Self::parse_condition(&closer)?,
                "else" => {
                    let (otherwise, end) = self.parse_until(&["endif"])?;
                    if end.is_none() {
                        return Err(ParseError::UnclosedTag {
                            tag: "if".to_string(),
                            expected: "endif".to_string(),
                            position: tag.start,
                        });
                    }
                    return Ok(Node::If { arms, otherwise });
                }
                _ => {
                    return Ok(Node::If {
                        arms,
                        otherwise: Vec::new(),
                    })
                }
            }
        }
    }

    fn parse_condition(tag: &Tag) -> Result<Condition, ParseError> {
        let (negated, raw) = match tag.bits.as_slice() {
            [expr] => (false, expr),
            [not, expr] if not == "not" => (true, expr),
            _ => {
                return Err(ParseError::MissingCondition {
                    tag: tag.name.clone(),
                    position: tag.start,
                })
            }
        };

        let expr = Expr::parse(raw).map_err(|err| ParseError::expression(tag.start, &err))?;
        Ok(Condition { negated, expr })
    }

    fn parse_for(&mut self, tag: &Tag) -> Result<Node, ParseError> {
        let (binding, iterable_raw) = match tag.bits.as_slice() {
            [binding, kw, iterable] if kw == "in" => (binding.clone(), iterable),
            _ => return Err(ParseError::ForSyntax { position: tag.start }),
        };

        let iterable =
            Expr::parse(iterable_raw).map_err(|err| ParseError::expression(tag.start, &err))?;

        let (body, closer) = self.parse_until(&["empty", "endfor"])?;
        let Some(closer) = closer else {
            return Err(ParseError::UnclosedTag {
                tag: "for".to_string(),
                expected: "endfor".to_string(),
                position: tag.start,
            });
        };

        let empty = if closer.name == "empty" {
            let (nodes, end) = self.parse_until(&["endfor"])?;
            if end.is_none() {
                return Err(ParseError::UnclosedTag {
                    tag: "for".to_string(),
                    expected: "endfor".to_string(),
                    position: tag.start,
                });
            }
            nodes
        } else {
            Vec::new()
        };

        Ok(Node::For {
            binding,
            iterable,
            body,
            empty,
        })
    }

    fn advance(&mut self) -> Token {
        let token = self
            .tokens
            .get(self.current)
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, 0));
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        token
    }
}

#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum ParseError {
    #[error("empty tag at position {position}")]
    EmptyTag { position: usize },

    #[error("unknown tag '{name}' at position {position}")]
    UnknownTag { name: String, position: usize },

    #[error("unexpected '{name}' at position {position}: no matching open block")]
    UnexpectedTag { name: String, position: usize },

    #[error("'{tag}' block at position {position} was not closed with '{expected}'")]
    UnclosedTag {
        tag: String,
        expected: String,
        position: usize,
    },

    #[error("malformed construct at position {position}: {content}")]
    MalformedConstruct { position: usize, content: String },

    #[error("'collect' tag at position {position} takes a variable name and optionally 'keyed' as arguments")]
    CollectSyntax { position: usize },

    #[error("'append' statement at position {position} should use the form 'append {{value}} into {{collection}} [keyed {{keyname}}]'")]
    AppendSyntax { position: usize },

    #[error("'{tag}' tag at position {position} expects '[not] {{expression}}' as its condition")]
    MissingCondition { tag: String, position: usize },

    #[error("'for' tag at position {position} expects 'for {{item}} in {{iterable}}'")]
    ForSyntax { position: usize },

    #[error("invalid expression at position {position}: {reason}")]
    InvalidExpression { position: usize, reason: String },
}

impl ParseError {
    fn expression(position: usize, err: &ExprError) -> Self {
        Self::InvalidExpression {
            position,
            reason: err.to_string(),
        }
    }
}
