use serde::Serialize;
use thiserror::Error;

use crate::quotes::for_each_unquoted;
use crate::quotes::split_unquoted;

/// A compiled template expression: a base value with an optional filter
/// chain, e.g. `user.name|default:"Anonymous"|upper`.
///
/// Parsing happens once at template-parse time; resolution against an
/// evaluation context is the render layer's job.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Expr {
    pub base: ExprBase,
    pub filters: Vec<FilterCall>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ExprBase {
    Literal(Literal),
    /// Dotted lookup path; segments are map keys or list indices.
    Path(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterCall {
    pub name: String,
    pub arg: Option<ExprBase>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("unterminated string literal {0}")]
    UnterminatedString(String),
    #[error("empty filter name")]
    EmptyFilter,
    #[error("empty segment in path '{0}'")]
    EmptyPathSegment(String),
}

impl Expr {
    pub fn parse(raw: &str) -> Result<Self, ExprError> {
        let mut segments = split_unquoted(raw, '|').into_iter();

        let base = ExprBase::parse(segments.next().unwrap_or_default())?;
        let filters = segments
            .map(FilterCall::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Expr { base, filters })
    }
}

impl ExprBase {
    pub fn parse(raw: &str) -> Result<Self, ExprError> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(ExprError::Empty);
        }

        if let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') {
            if raw.len() < 2 || !raw.ends_with(quote) {
                return Err(ExprError::UnterminatedString(raw.to_string()));
            }
            let inner = &raw[1..raw.len() - 1];
            return Ok(ExprBase::Literal(Literal::Str(unescape(inner))));
        }

        if let Ok(int) = raw.parse::<i64>() {
            return Ok(ExprBase::Literal(Literal::Int(int)));
        }
        if let Ok(float) = raw.parse::<f64>() {
            return Ok(ExprBase::Literal(Literal::Float(float)));
        }
        match raw {
            "true" => return Ok(ExprBase::Literal(Literal::Bool(true))),
            "false" => return Ok(ExprBase::Literal(Literal::Bool(false))),
            _ => {}
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ExprError::EmptyPathSegment(raw.to_string()));
        }
        Ok(ExprBase::Path(segments))
    }
}

impl FilterCall {
    fn parse(raw: &str) -> Result<Self, ExprError> {
        let raw = raw.trim();

        let mut colon = None;
        for_each_unquoted(
            raw,
            |ch| ch == ':',
            |idx| {
                colon = Some(idx);
                true
            },
        );

        let (name, arg) = match colon {
            Some(pos) => (raw[..pos].trim(), Some(ExprBase::parse(&raw[pos + 1..])?)),
            None => (raw, None),
        };

        if name.is_empty() {
            return Err(ExprError::EmptyFilter);
        }

        Ok(FilterCall {
            name: name.to_string(),
            arg,
        })
    }
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> ExprBase {
        ExprBase::Path(segments.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn parse_string_literal() {
        let expr = Expr::parse("\"Hello\"").unwrap();
        assert_eq!(expr.base, ExprBase::Literal(Literal::Str("Hello".to_string())));
        assert!(expr.filters.is_empty());
    }

    #[test]
    fn parse_single_quoted_literal() {
        let expr = Expr::parse("'x'").unwrap();
        assert_eq!(expr.base, ExprBase::Literal(Literal::Str("x".to_string())));
    }

    #[test]
    fn parse_escaped_quote_in_literal() {
        let expr = Expr::parse(r#""say \"hi\"""#).unwrap();
        assert_eq!(
            expr.base,
            ExprBase::Literal(Literal::Str("say \"hi\"".to_string()))
        );
    }

    #[test]
    fn parse_numeric_and_bool_literals() {
        assert_eq!(
            Expr::parse("42").unwrap().base,
            ExprBase::Literal(Literal::Int(42))
        );
        assert_eq!(
            Expr::parse("2.5").unwrap().base,
            ExprBase::Literal(Literal::Float(2.5))
        );
        assert_eq!(
            Expr::parse("true").unwrap().base,
            ExprBase::Literal(Literal::Bool(true))
        );
    }

    #[test]
    fn parse_dotted_path() {
        let expr = Expr::parse("user.groups.0.name").unwrap();
        assert_eq!(expr.base, path(&["user", "groups", "0", "name"]));
    }

    #[test]
    fn parse_filter_chain() {
        let expr = Expr::parse("v.name|default:\"Guest\"|upper").unwrap();
        assert_eq!(expr.base, path(&["v", "name"]));
        assert_eq!(expr.filters.len(), 2);
        assert_eq!(expr.filters[0].name, "default");
        assert_eq!(
            expr.filters[0].arg,
            Some(ExprBase::Literal(Literal::Str("Guest".to_string())))
        );
        assert_eq!(expr.filters[1].name, "upper");
        assert_eq!(expr.filters[1].arg, None);
    }

    #[test]
    fn parse_pipe_inside_quotes_is_not_a_filter_separator() {
        let expr = Expr::parse("x|default:\"a|b\"").unwrap();
        assert_eq!(expr.filters.len(), 1);
        assert_eq!(
            expr.filters[0].arg,
            Some(ExprBase::Literal(Literal::Str("a|b".to_string())))
        );
    }

    #[test]
    fn parse_colon_inside_quotes_stays_in_argument() {
        let expr = Expr::parse("x|join:\", \"").unwrap();
        assert_eq!(
            expr.filters[0].arg,
            Some(ExprBase::Literal(Literal::Str(", ".to_string())))
        );
    }

    #[test]
    fn parse_filter_with_path_argument() {
        let expr = Expr::parse("value|default:other.name").unwrap();
        assert_eq!(expr.filters[0].arg, Some(path(&["other", "name"])));
    }

    #[test]
    fn parse_empty_expression_fails() {
        assert_eq!(Expr::parse(""), Err(ExprError::Empty));
        assert_eq!(Expr::parse("   "), Err(ExprError::Empty));
    }

    #[test]
    fn parse_unterminated_string_fails() {
        assert_eq!(
            Expr::parse("\"oops"),
            Err(ExprError::UnterminatedString("\"oops".to_string()))
        );
    }

    #[test]
    fn parse_empty_filter_fails() {
        assert_eq!(Expr::parse("x||upper"), Err(ExprError::EmptyFilter));
    }

    #[test]
    fn parse_empty_path_segment_fails() {
        assert_eq!(
            Expr::parse("user..name"),
            Err(ExprError::EmptyPathSegment("user..name".to_string()))
        );
    }
}
