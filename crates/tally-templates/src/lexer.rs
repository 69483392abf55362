use crate::tokens::Token;
use crate::tokens::TokenKind;

const BLOCK_TAG_START: &str = "{%";
const BLOCK_TAG_END: &str = "%}";
const VARIABLE_TAG_START: &str = "{{";
const VARIABLE_TAG_END: &str = "}}";
const COMMENT_TAG_START: &str = "{#";
const COMMENT_TAG_END: &str = "#}";

pub struct Lexer {
    source: String,
    start: usize,
    current: usize,
}

impl Lexer {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Lexer {
            source: String::from(source),
            start: 0,
            current: 0,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.start = self.current;

            let token = match self.peek() {
                '{' => match self.peek_next() {
                    '%' => self.lex_construct(BLOCK_TAG_END, TokenKind::Block),
                    '{' => self.lex_construct(VARIABLE_TAG_END, TokenKind::Variable),
                    '#' => self.lex_construct(COMMENT_TAG_END, TokenKind::Comment),
                    _ => self.lex_text(),
                },
                _ => self.lex_text(),
            };

            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::Eof, self.current));

        tokens
    }

    fn lex_construct(&mut self, end: &str, kind_fn: impl FnOnce(String) -> TokenKind) -> Token {
        self.consume_n(2);

        match self.consume_until(end) {
            Ok(text) => {
                self.consume_n(2);
                Token::new(kind_fn(text), self.start)
            }
            Err(err_text) => {
                self.synchronize();
                Token::new(TokenKind::Error(err_text), self.start)
            }
        }
    }

    fn lex_text(&mut self) -> Token {
        while !self.is_at_end() {
            let rest = &self.source[self.current..];
            if rest.starts_with(BLOCK_TAG_START)
                || rest.starts_with(VARIABLE_TAG_START)
                || rest.starts_with(COMMENT_TAG_START)
            {
                break;
            }
            self.consume();
        }

        let text = self.source[self.start..self.current].to_string();
        Token::new(TokenKind::Text(text), self.start)
    }

    #[inline]
    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    #[inline]
    fn consume(&mut self) {
        if let Some(ch) = self.source[self.current..].chars().next() {
            self.current += ch.len_utf8();
        }
    }

    fn consume_n(&mut self, count: usize) {
        for _ in 0..count {
            self.consume();
        }
    }

    fn consume_until(&mut self, delimiter: &str) -> Result<String, String> {
        let offset = self.current;

        while self.current < self.source.len() {
            if self.source[self.current..].starts_with(delimiter) {
                return Ok(self.source[offset..self.current].trim().to_string());
            }
            self.consume();
        }

        Err(self.source[offset..self.current].trim().to_string())
    }

    fn synchronize(&mut self) {
        const SYNC_POINTS: &[u8] = b"{\n\r";

        while !self.is_at_end() {
            if SYNC_POINTS.contains(&self.source.as_bytes()[self.current]) {
                return;
            }
            self.consume();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer
            .tokenize()
            .into_iter()
            .map(|token| token.into_parts().0)
            .collect()
    }

    #[test]
    fn test_tokenize_text() {
        assert_eq!(
            kinds("plain text"),
            vec![TokenKind::Text("plain text".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_variable() {
        assert_eq!(
            kinds("{{ user.name|default:\"Anonymous\" }}"),
            vec![
                TokenKind::Variable("user.name|default:\"Anonymous\"".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_block() {
        assert_eq!(
            kinds("{% if ready %}go{% endif %}"),
            vec![
                TokenKind::Block("if ready".to_string()),
                TokenKind::Text("go".to_string()),
                TokenKind::Block("endif".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_comment() {
        assert_eq!(
            kinds("a{# note #}b"),
            vec![
                TokenKind::Text("a".to_string()),
                TokenKind::Comment("note".to_string()),
                TokenKind::Text("b".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_mixed_template() {
        assert_eq!(
            kinds("{% collect c %}{% append \"a\" into c %}{% endcollect %}{{ c|join:\",\" }}"),
            vec![
                TokenKind::Block("collect c".to_string()),
                TokenKind::Block("append \"a\" into c".to_string()),
                TokenKind::Block("endcollect".to_string()),
                TokenKind::Variable("c|join:\",\"".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_lone_brace_is_text() {
        assert_eq!(
            kinds("a { b"),
            vec![TokenKind::Text("a { b".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_unclosed_variable() {
        assert_eq!(
            kinds("{{ user"),
            vec![TokenKind::Error("user".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_unclosed_block_swallows_rest() {
        let tokens = kinds("{% if x d{{ ok }}");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Error("if x d{{ ok }}".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_token_offsets() {
        let mut lexer = Lexer::new("ab{{ v }}");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].start(), 0);
        assert_eq!(tokens[1].start(), 2);
    }
}
