//! Hand-rolled tokenizer for PHP-style source.
//!
//! Produces the flat token schema in [`crate::TokenKind`] — just enough
//! structure for the call-site classifier, nothing resembling a parse.
//! Three properties matter downstream:
//!
//! - whitespace runs are preserved as distinguishable tokens (the
//!   classifier's look-around skips exactly these);
//! - a string literal or comment is a single token, so call-shaped text
//!   inside either can never produce an `Identifier` followed by `(`;
//! - `function` and `new` are recognized case-insensitively, matching
//!   PHP's keyword rules.
//!
//! Any token producer honoring the same schema can feed the classifier;
//! this one exists so the pipeline runs end-to-end without a host runtime.

use crate::{Token, TokenKind};

/// Tokenize source text into an ordered stream.
///
/// Never fails: unterminated strings and comments extend to end of input,
/// and unrecognized characters become [`TokenKind::Symbol`] tokens. Garbage
/// in the source should degrade detection, not abort it.
#[must_use]
pub fn tokenize_source(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            source,
            tokens: Vec::with_capacity(source.len() / 4),
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let text: String = self.chars[start..self.pos].iter().collect();
        let index = self.tokens.len();
        self.tokens.push(Token { kind, text, index });
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek(0) {
            let start = self.pos;
            match c {
                c if c.is_whitespace() => {
                    while self.peek(0).is_some_and(char::is_whitespace) {
                        self.pos += 1;
                    }
                    self.push(TokenKind::Whitespace, start);
                }
                '/' if self.peek(1) == Some('/') => self.line_comment(start),
                '#' => self.line_comment(start),
                '/' if self.peek(1) == Some('*') => self.block_comment(start),
                '\'' | '"' => self.string_literal(start, c),
                '$' => self.variable(start),
                '-' if self.peek(1) == Some('>') => {
                    self.pos += 2;
                    self.push(TokenKind::MemberAccess, start);
                }
                ':' if self.peek(1) == Some(':') => {
                    self.pos += 2;
                    self.push(TokenKind::ScopeResolution, start);
                }
                '(' => {
                    self.pos += 1;
                    self.push(TokenKind::OpenParen, start);
                }
                ')' => {
                    self.pos += 1;
                    self.push(TokenKind::CloseParen, start);
                }
                // `<?php` / `<?=` open tags and `?>` close tag are opaque symbols;
                // without this, the tag's `php` would lex as an identifier.
                '<' if self.peek(1) == Some('?') => {
                    self.pos += 2;
                    while self.peek(0).is_some_and(|c| c.is_ascii_alphabetic() || c == '=') {
                        self.pos += 1;
                    }
                    self.push(TokenKind::Symbol, start);
                }
                '?' if self.peek(1) == Some('>') => {
                    self.pos += 2;
                    self.push(TokenKind::Symbol, start);
                }
                c if c.is_alphabetic() || c == '_' => self.identifier_or_keyword(start),
                c if c.is_ascii_digit() => self.number(start),
                _ => {
                    self.pos += 1;
                    self.push(TokenKind::Symbol, start);
                }
            }
        }
        tracing::debug!(
            tokens = self.tokens.len(),
            bytes = self.source.len(),
            "tokenized source"
        );
        self.tokens
    }

    fn line_comment(&mut self, start: usize) {
        while self.peek(0).is_some_and(|c| c != '\n') {
            self.pos += 1;
        }
        self.push(TokenKind::Comment, start);
    }

    fn block_comment(&mut self, start: usize) {
        self.pos += 2;
        while let Some(c) = self.peek(0) {
            if c == '*' && self.peek(1) == Some('/') {
                self.pos += 2;
                break;
            }
            self.pos += 1;
        }
        self.push(TokenKind::Comment, start);
    }

    fn string_literal(&mut self, start: usize, quote: char) {
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            if c == '\\' {
                // Escape consumes the next char, even a quote.
                self.pos += (2).min(self.chars.len() - self.pos);
                continue;
            }
            self.pos += 1;
            if c == quote {
                break;
            }
        }
        self.push(TokenKind::StringLiteral, start);
    }

    fn variable(&mut self, start: usize) {
        self.pos += 1;
        if self.peek(0).is_some_and(|c| c.is_alphabetic() || c == '_') {
            while self.peek(0).is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.pos += 1;
            }
            self.push(TokenKind::Variable, start);
        } else {
            // Bare `$` with no name attached.
            self.push(TokenKind::Symbol, start);
        }
    }

    fn identifier_or_keyword(&mut self, start: usize) {
        while self.peek(0).is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let kind = if text.eq_ignore_ascii_case("function") {
            TokenKind::FunctionKeyword
        } else if text.eq_ignore_ascii_case("new") {
            TokenKind::NewKeyword
        } else {
            TokenKind::Identifier
        };
        let index = self.tokens.len();
        self.tokens.push(Token { kind, text, index });
    }

    fn number(&mut self, start: usize) {
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        self.push(TokenKind::Number, start);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize_source(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_call_shape() {
        let tokens = tokenize_source("foo($x);");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[1].kind, TokenKind::OpenParen);
        assert_eq!(tokens[2].kind, TokenKind::Variable);
        assert_eq!(tokens[2].text, "$x");
        assert_eq!(tokens[3].kind, TokenKind::CloseParen);
    }

    #[test]
    fn test_whitespace_is_one_token_per_run() {
        let tokens = tokenize_source("foo  \t\n  bar");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Identifier, TokenKind::Whitespace, TokenKind::Identifier]
        );
        assert_eq!(tokens[1].text, "  \t\n  ");
    }

    #[test]
    fn test_function_keyword_case_insensitive() {
        assert_eq!(kinds("function"), vec![TokenKind::FunctionKeyword]);
        assert_eq!(kinds("FUNCTION"), vec![TokenKind::FunctionKeyword]);
        assert_eq!(kinds("Function"), vec![TokenKind::FunctionKeyword]);
        // Part of a longer identifier is not the keyword.
        assert_eq!(kinds("function_mock"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_new_keyword() {
        assert_eq!(kinds("new"), vec![TokenKind::NewKeyword]);
        assert_eq!(kinds("newest"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_member_access_and_scope_resolution() {
        let tokens = tokenize_source("$obj->foo");
        assert_eq!(tokens[1].kind, TokenKind::MemberAccess);
        let tokens = tokenize_source("Foo::bar");
        assert_eq!(tokens[1].kind, TokenKind::ScopeResolution);
    }

    #[test]
    fn test_string_literal_is_single_token() {
        let tokens = tokenize_source(r#"'call_me(1)' . "also_me(2)""#);
        let strings: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::StringLiteral)
            .collect();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0].text, "'call_me(1)'");
        assert_eq!(strings[1].text, r#""also_me(2)""#);
        // Nothing inside the quotes leaked out as an identifier.
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn test_string_escape_does_not_terminate() {
        let tokens = tokenize_source(r#"'it\'s fine'"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let tokens = tokenize_source("'oops");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "'oops");
    }

    #[test]
    fn test_line_comments() {
        assert_eq!(
            kinds("// foo()\nx"),
            vec![TokenKind::Comment, TokenKind::Whitespace, TokenKind::Identifier]
        );
        assert_eq!(
            kinds("# foo()\nx"),
            vec![TokenKind::Comment, TokenKind::Whitespace, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_block_comment_swallows_call_text() {
        let tokens = tokenize_source("/* foo() \n bar() */");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = tokenize_source("/* never closed");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
    }

    #[test]
    fn test_php_tags_are_opaque() {
        let tokens = tokenize_source("<?php foo(); ?>");
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
        assert_eq!(tokens[0].text, "<?php");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Symbol);
        assert_eq!(last.text, "?>");
        // `php` from the tag must not appear as an identifier.
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Identifier && t.text == "php"));
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize_source("42 3.25");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, "42");
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "3.25");
    }

    #[test]
    fn test_bare_dollar_is_symbol() {
        let tokens = tokenize_source("$ x");
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
        assert_eq!(tokens[0].text, "$");
    }

    #[test]
    fn test_token_indices_are_sequential() {
        let tokens = tokenize_source("function foo() { bar(); }");
        for (i, t) in tokens.iter().enumerate() {
            assert_eq!(t.index, i);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize_source("").is_empty());
    }
}
