//! Decoding.
//!
//! This module provides the [`Decoder`], a recursive-descent parser over the
//! token stream produced by the [`lexer`](crate::lexer), together with the
//! [`FromJson`] implementations for standard types.
//!
//! ## Overview
//!
//! - **Single token stream**: the input is tokenized once, up front; readers
//!   consume tokens by value and never rewind
//! - **Chronological objects**: every object is recorded when its `{` is read,
//!   before its members, so back-references resolve in the order the encoder
//!   numbered them, including references to an object from inside itself
//! - **Typed dispatch**: the declared type of each member decides how its value
//!   is read
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use refjson::{from_str, impl_object};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Data { a: i32, b: String }
//!
//! impl_object!(Data { a: i32, b: String });
//!
//! let data: Data = from_str(r#"{"a":1,"b":"x"}"#).unwrap();
//! assert_eq!(data, Data { a: 1, b: "x".to_string() });
//! ```

use crate::lexer::{tokenize, Token, TokenKind};
use crate::model::{find_member, share, FromJson, Object, Shared};
use crate::{Error, JsonOptions, Result};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::iter::Peekable;
use std::rc::Rc;
use std::str::FromStr;

/// One entry of the chronological object list.
enum Slot {
    /// A shared object; back-references to it resolve to the same allocation.
    Shared(Rc<dyn Any>),
    /// An object that cannot be referenced, kept only to hold its index.
    Owned,
}

/// The refjson decoder.
///
/// Created via [`Decoder::from_str`]. Holds the token stream and the
/// chronological list of objects created during one conversion.
pub struct Decoder {
    tokens: Peekable<std::vec::IntoIter<Token>>,
    objects: Vec<Slot>,
    depth: usize,
    max_depth: usize,
}

impl Decoder {
    /// Tokenizes `input` and prepares to decode it with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if the input cannot be tokenized.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        Self::from_str_with_options(input, &JsonOptions::default())
    }

    /// Tokenizes `input` and prepares to decode it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if the input cannot be tokenized.
    pub fn from_str_with_options(input: &str, options: &JsonOptions) -> Result<Self> {
        Ok(Decoder {
            tokens: tokenize(input)?.into_iter().peekable(),
            objects: Vec::new(),
            depth: 0,
            max_depth: options.max_depth,
        })
    }

    /// Reads one value of the declared type.
    ///
    /// # Errors
    ///
    /// Returns an error if the next tokens do not form a value of type `T`.
    pub fn decode<T: FromJson>(&mut self) -> Result<T> {
        let depth = self.depth;
        let result = T::from_json(self);
        if result.is_err() {
            self.depth = depth;
        }
        result
    }

    /// Checks that every token has been consumed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrailingTokens`] if input remains.
    pub fn end(&mut self) -> Result<()> {
        match self.tokens.peek() {
            Some(token) => Err(Error::TrailingTokens {
                position: token.position,
            }),
            None => Ok(()),
        }
    }

    /// Number of objects created so far.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Returns the kind of the next token without consuming it.
    pub fn peek_kind(&mut self) -> Option<&TokenKind> {
        self.tokens.peek().map(|token| &token.kind)
    }

    /// Consumes a `null` token if one is next.
    pub fn consume_null(&mut self) -> bool {
        self.tokens
            .next_if(|token| token.kind == TokenKind::Null)
            .is_some()
    }

    /// Reads an unquoted primitive and converts it with [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if the text does not parse as `T`, or
    /// [`Error::UnexpectedToken`] if the next token is not a primitive.
    pub fn read_primitive<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let token = self.next_token("primitive value")?;
        match token.kind {
            TokenKind::Primitive(text) => text
                .parse()
                .map_err(|e| Error::conversion(token.position, &text, type_name::<T>(), e)),
            other => Err(unexpected(token.position, "primitive value", &other)),
        }
    }

    /// Reads a quoted string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedToken`] if the next token is not a string.
    pub fn read_string(&mut self) -> Result<String> {
        let token = self.next_token("string")?;
        match token.kind {
            TokenKind::String(s) => Ok(s),
            other => Err(unexpected(token.position, "string", &other)),
        }
    }

    /// Reads a quoted string and converts it with `convert`.
    fn read_string_as<T, E, F>(&mut self, convert: F) -> Result<T>
    where
        E: fmt::Display,
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        let position = self.peek_position();
        let text = self.read_string()?;
        convert(&text).map_err(|e| Error::conversion(position, &text, type_name::<T>(), e))
    }

    /// Reads an array, decoding each element with `element`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an element, or a structure error if
    /// the array is not delimited correctly.
    pub fn read_array<T, F>(&mut self, mut element: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        self.expect(TokenKind::ArrayOpen)?;
        self.enter()?;

        let mut elements = Vec::new();
        if self.consume(TokenKind::ArrayClose) {
            self.leave();
            return Ok(elements);
        }

        loop {
            elements.push(element(self)?);

            let token = self.next_token("',' or ']'")?;
            match token.kind {
                TokenKind::Separator => continue,
                TokenKind::ArrayClose => break,
                other => return Err(unexpected(token.position, "',' or ']'", &other)),
            }
        }

        self.leave();
        Ok(elements)
    }

    /// Reads an owned object of type `T`.
    ///
    /// The object takes the next chronological index but cannot be the target
    /// of a back-reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedToken`] if the next token is not `{`,
    /// [`Error::UnknownMember`] for a member `T` does not serialize, or the
    /// first error raised by a member.
    pub fn read_object<T: Object>(&mut self) -> Result<T> {
        self.expect(TokenKind::ObjectOpen)?;
        let mut object = T::default();
        self.objects.push(Slot::Owned);
        self.read_members(&mut object)?;
        Ok(object)
    }

    /// Reads a shared object of type `T`, either in full or as a back-reference
    /// to an object created earlier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedReference`] or
    /// [`Error::ReferenceTypeMismatch`] for a bad back-reference, plus the
    /// errors of [`Decoder::read_object`].
    pub fn read_shared<T: Object>(&mut self) -> Result<Shared<T>> {
        if matches!(self.peek_kind(), Some(TokenKind::Reference(_))) {
            return self.read_reference();
        }

        self.expect(TokenKind::ObjectOpen)?;
        let shared = share(T::default());
        self.objects.push(Slot::Shared(shared.clone()));
        {
            let mut object = shared.borrow_mut();
            self.read_members(&mut *object)?;
        }
        Ok(shared)
    }

    fn read_reference<T: Object>(&mut self) -> Result<Shared<T>> {
        let (index, position) = self.read_reference_index()?;
        let mismatch = Error::ReferenceTypeMismatch {
            position,
            index,
            expected: T::TYPE_NAME,
        };

        match &self.objects[index] {
            Slot::Shared(object) => {
                tracing::trace!(index, type_name = T::TYPE_NAME, "resolved back-reference");
                object
                    .clone()
                    .downcast::<RefCell<T>>()
                    .map_err(|_| mismatch)
            }
            Slot::Owned => Err(mismatch),
        }
    }

    /// Reads `$<index>$` and checks that the index names an existing object.
    pub(crate) fn read_reference_index(&mut self) -> Result<(usize, usize)> {
        let token = self.next_token("back-reference")?;
        match token.kind {
            TokenKind::Reference(index) if index < self.objects.len() => {
                Ok((index, token.position))
            }
            TokenKind::Reference(index) => Err(Error::unresolved_reference(
                token.position,
                index,
                self.objects.len(),
            )),
            other => Err(unexpected(token.position, "back-reference", &other)),
        }
    }

    fn read_members<T: Object>(&mut self, object: &mut T) -> Result<()> {
        self.read_entries(|decoder, name, position| {
            let member = find_member::<T>(&name)
                .ok_or_else(|| Error::unknown_member(position, &name, T::TYPE_NAME))?;
            member.set(object, decoder)
        })
    }

    /// Reads an object without a declared type. The object takes the next
    /// chronological index.
    pub(crate) fn read_untyped_object<F>(&mut self, entry: F) -> Result<()>
    where
        F: FnMut(&mut Self, String, usize) -> Result<()>,
    {
        self.expect(TokenKind::ObjectOpen)?;
        self.objects.push(Slot::Owned);
        self.read_entries(entry)
    }

    /// Reads `"name":value` pairs up to and including `}`. The opening `{` has
    /// already been consumed.
    fn read_entries<F>(&mut self, mut entry: F) -> Result<()>
    where
        F: FnMut(&mut Self, String, usize) -> Result<()>,
    {
        self.enter()?;

        if self.consume(TokenKind::ObjectClose) {
            self.leave();
            return Ok(());
        }

        loop {
            let token = self.next_token("member name")?;
            let name = match token.kind {
                TokenKind::String(name) => name,
                other => return Err(unexpected(token.position, "member name", &other)),
            };
            self.expect(TokenKind::KeyValue)?;
            entry(self, name, token.position)?;

            let token = self.next_token("',' or '}'")?;
            match token.kind {
                TokenKind::Separator => continue,
                TokenKind::ObjectClose => break,
                other => return Err(unexpected(token.position, "',' or '}'", &other)),
            }
        }

        self.leave();
        Ok(())
    }

    pub(crate) fn next_token(&mut self, expected: &str) -> Result<Token> {
        self.tokens
            .next()
            .ok_or_else(|| Error::unexpected_eof(expected))
    }

    fn peek_position(&mut self) -> usize {
        self.tokens.peek().map_or(0, |token| token.position)
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        self.tokens.next_if(|token| token.kind == kind).is_some()
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        let expected = kind.to_string();
        let token = self.next_token(&expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(token.position, &expected, &token.kind))
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

pub(crate) fn unexpected(position: usize, expected: &str, found: &TokenKind) -> Error {
    Error::unexpected_token(position, expected, &found.to_string())
}

macro_rules! primitive_from_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromJson for $ty {
                fn from_json(decoder: &mut Decoder) -> Result<Self> {
                    decoder.read_primitive()
                }
            }
        )*
    };
}

primitive_from_json!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, BigInt,
);

impl FromJson for String {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_string()
    }
}

impl FromJson for char {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_string_as(|s| s.parse::<char>())
    }
}

impl FromJson for DateTime<Utc> {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_string_as(|s| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        if decoder.consume_null() {
            Ok(None)
        } else {
            T::from_json(decoder).map(Some)
        }
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_array(T::from_json)
    }
}

impl<T: FromJson, const N: usize> FromJson for [T; N] {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        let elements = decoder.read_array(T::from_json)?;
        let found = elements.len();
        elements
            .try_into()
            .map_err(|_| Error::LengthMismatch { expected: N, found })
    }
}

impl<T: FromJson> FromJson for Box<T> {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        T::from_json(decoder).map(Box::new)
    }
}

impl<T: Object> FromJson for Shared<T> {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_shared()
    }
}
