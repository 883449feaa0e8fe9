//! Tokenizer for refjson text.
//!
//! The [`Lexer`] splits the whole input into a flat sequence of [`Token`]s
//! before any decoding starts. Each token records the byte position where it
//! begins, which decoding errors report.
//!
//! ```rust
//! use refjson::lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize(r#"{"a":$0$}"#).unwrap();
//! let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::ObjectOpen,
//!         TokenKind::String("a".to_string()),
//!         TokenKind::KeyValue,
//!         TokenKind::Reference(0),
//!         TokenKind::ObjectClose,
//!     ]
//! );
//! ```

use crate::grammar::{
    is_delimiter, ARRAY_CLOSE, ARRAY_OPEN, ESCAPE, KEY_VALUE, NULL, OBJECT_CLOSE, OBJECT_OPEN,
    QUOTE, REFERENCE, SEPARATOR,
};
use crate::model::Kind;
use crate::{Error, Result};
use std::fmt;

/// The kind of a token, with its content for strings, primitives and references.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `{`
    ObjectOpen,
    /// `}`
    ObjectClose,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// `:`
    KeyValue,
    /// `,`
    Separator,
    /// The `null` literal
    Null,
    /// A quoted string with escapes resolved
    String(String),
    /// Unquoted text, e.g. `42`, `-1.5e3`, `true`
    Primitive(String),
    /// `$<index>$`
    Reference(usize),
}

impl TokenKind {
    /// The kind of value this token starts, or `None` for punctuation that
    /// cannot begin a value.
    #[must_use]
    pub fn value_kind(&self) -> Option<Kind> {
        match self {
            TokenKind::Null => Some(Kind::Null),
            TokenKind::Primitive(_) => Some(Kind::Primitive),
            TokenKind::String(_) => Some(Kind::String),
            TokenKind::ArrayOpen => Some(Kind::Array),
            TokenKind::ObjectOpen => Some(Kind::Composite),
            TokenKind::Reference(_) => Some(Kind::Reference),
            TokenKind::ObjectClose
            | TokenKind::ArrayClose
            | TokenKind::KeyValue
            | TokenKind::Separator => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ObjectOpen => write!(f, "'{}'", OBJECT_OPEN),
            TokenKind::ObjectClose => write!(f, "'{}'", OBJECT_CLOSE),
            TokenKind::ArrayOpen => write!(f, "'{}'", ARRAY_OPEN),
            TokenKind::ArrayClose => write!(f, "'{}'", ARRAY_CLOSE),
            TokenKind::KeyValue => write!(f, "'{}'", KEY_VALUE),
            TokenKind::Separator => write!(f, "'{}'", SEPARATOR),
            TokenKind::Null => f.write_str(NULL),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Primitive(s) => write!(f, "primitive {}", s),
            TokenKind::Reference(index) => write!(f, "back-reference ${}$", index),
        }
    }
}

/// A token and the byte position where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Splits refjson text into tokens.
///
/// Iterating yields one `Result<Token>` per token; the first error ends the
/// useful output.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<TokenKind> {
        self.next_char(); // opening quote
        let mut result = String::new();

        while let Some(ch) = self.next_char() {
            match ch {
                QUOTE => return Ok(TokenKind::String(result)),
                ESCAPE => {
                    let escape_start = self.position - ESCAPE.len_utf8();
                    match self.next_char() {
                        Some(ch @ (QUOTE | ESCAPE | '/')) => result.push(ch),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('b') => result.push('\u{0008}'),
                        Some('f') => result.push('\u{000C}'),
                        Some('u') => result.push(self.lex_unicode_escape(escape_start)?),
                        Some(other) => {
                            // Unknown escape - preserve literally
                            result.push(ESCAPE);
                            result.push(other);
                        }
                        None => break,
                    }
                }
                other => result.push(other),
            }
        }

        Err(Error::syntax(start, "Unterminated string"))
    }

    fn lex_hex4(&mut self, start: usize) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .next_char()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| {
                    Error::syntax(
                        start,
                        "Invalid unicode escape sequence (expected 4 hex digits)",
                    )
                })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Decodes the digits after `\u`, joining a UTF-16 surrogate pair when the
    /// first unit is a high surrogate.
    fn lex_unicode_escape(&mut self, start: usize) -> Result<char> {
        let first = self.lex_hex4(start)?;
        let code_point = if (0xD800..0xDC00).contains(&first) {
            if !self.input[self.position..].starts_with("\\u") {
                return Err(Error::syntax(start, "Unpaired surrogate in unicode escape"));
            }
            self.position += 2;
            let second = self.lex_hex4(start)?;
            if !(0xDC00..0xE000).contains(&second) {
                return Err(Error::syntax(start, "Unpaired surrogate in unicode escape"));
            }
            0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
        } else {
            first
        };

        char::from_u32(code_point)
            .ok_or_else(|| Error::syntax(start, "Invalid unicode code point"))
    }

    fn lex_reference(&mut self, start: usize) -> Result<TokenKind> {
        self.next_char(); // opening marker
        let digits_start = self.position;

        loop {
            match self.next_char() {
                Some(REFERENCE) => break,
                Some(ch) if ch.is_ascii_digit() => {}
                Some(_) | None => {
                    return Err(Error::syntax(
                        start,
                        "Malformed back-reference (expected digits closed by '$')",
                    ))
                }
            }
        }

        let digits = &self.input[digits_start..self.position - REFERENCE.len_utf8()];
        digits
            .parse()
            .map(TokenKind::Reference)
            .map_err(|_| Error::syntax(start, "Invalid back-reference index"))
    }

    fn lex_bare(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if is_delimiter(ch) {
                break;
            }
            self.next_char();
        }

        match &self.input[start..self.position] {
            NULL => TokenKind::Null,
            text => TokenKind::Primitive(text.to_string()),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let position = self.position;
        let ch = self.peek_char()?;

        let kind = match ch {
            OBJECT_OPEN => TokenKind::ObjectOpen,
            OBJECT_CLOSE => TokenKind::ObjectClose,
            ARRAY_OPEN => TokenKind::ArrayOpen,
            ARRAY_CLOSE => TokenKind::ArrayClose,
            KEY_VALUE => TokenKind::KeyValue,
            SEPARATOR => TokenKind::Separator,
            QUOTE => {
                return Some(self.lex_string(position).map(|kind| Token { kind, position }));
            }
            REFERENCE => {
                return Some(self.lex_reference(position).map(|kind| Token { kind, position }));
            }
            _ => {
                let kind = self.lex_bare();
                return Some(Ok(Token { kind, position }));
            }
        };

        self.next_char();
        Some(Ok(Token { kind, position }))
    }
}

/// Tokenizes the whole input.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for an unterminated string or a malformed
/// back-reference.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).collect()
}
