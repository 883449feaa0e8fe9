//! Encoding.
//!
//! This module provides the [`Encoder`], which walks a typed object graph
//! depth-first and appends its text form to a single output buffer, together
//! with the [`ToJson`] implementations for standard types.
//!
//! ## Overview
//!
//! - **Primitives** are written with their `Display` form
//! - **Strings** are quoted, with `"`, `\` and control characters escaped
//! - **Arrays** are written element by element with the element type
//! - **Objects** are written member by member in [`Object::members`] order
//! - **Shared objects** are written in full once; with reference tracking
//!   enabled, later occurrences become `$<index>$`
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use refjson::to_string;
//!
//! let jagged = vec![vec![1, 2, 3], vec![4, 5], vec![]];
//! assert_eq!(to_string(&jagged).unwrap(), "[[1,2,3],[4,5],[]]");
//! ```
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use refjson::{Encoder, JsonOptions};
//!
//! let mut encoder = Encoder::new(&JsonOptions::new());
//! encoder.encode(&vec!["a", "b"]).unwrap();
//! encoder.encode(&Some(5)).unwrap();
//! assert_eq!(encoder.into_inner(), r#"["a","b"]5"#);
//! ```

use crate::grammar::{
    ARRAY_CLOSE, ARRAY_OPEN, ESCAPE, KEY_VALUE, NULL, OBJECT_CLOSE, OBJECT_OPEN, QUOTE,
    REFERENCE, SEPARATOR,
};
use crate::model::{describe, Kind, Object, Shared, ToJson};
use crate::{Error, JsonOptions, Result};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Encode-side identity table.
///
/// Hands out one index per object written in full, in the order the objects
/// are opened. Shared objects are also remembered by allocation address so a
/// second occurrence can be written as a back-reference.
#[derive(Debug, Default)]
struct ReferenceTable {
    indices: HashMap<usize, usize>,
    next: usize,
}

impl ReferenceTable {
    fn lookup(&self, identity: usize) -> Option<usize> {
        self.indices.get(&identity).copied()
    }

    fn record(&mut self, identity: Option<usize>) -> usize {
        let index = self.next;
        self.next += 1;
        if let Some(identity) = identity {
            self.indices.insert(identity, index);
        }
        index
    }
}

/// The refjson encoder.
///
/// Created via [`Encoder::new`]; one encoder holds the output buffer and, when
/// reference tracking is enabled, the identity table for one conversion.
pub struct Encoder {
    output: String,
    references: Option<ReferenceTable>,
    depth: usize,
    max_depth: usize,
}

impl Encoder {
    pub fn new(options: &JsonOptions) -> Self {
        Encoder {
            output: String::with_capacity(256),
            references: options.track_references.then(ReferenceTable::default),
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Returns `true` if this encoder emits back-references.
    #[must_use]
    pub fn tracks_references(&self) -> bool {
        self.references.is_some()
    }

    /// Number of objects written in full so far, when tracking references.
    #[must_use]
    pub fn object_count(&self) -> Option<usize> {
        self.references.as_ref().map(|table| table.next)
    }

    /// Writes any encodable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value nests deeper than the configured limit or
    /// a shared object is mutably borrowed. Text written before the failure
    /// stays in the buffer; the nesting depth is reset so the encoder can be
    /// used again.
    pub fn encode<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + ToJson,
    {
        let depth = self.depth;
        let result = value.to_json(self);
        if result.is_err() {
            self.depth = depth;
        }
        result
    }

    pub fn write_null(&mut self) {
        self.output.push_str(NULL);
    }

    /// Writes the `Display` form of a value, unquoted.
    pub fn write_primitive<T>(&mut self, value: &T)
    where
        T: ?Sized + fmt::Display,
    {
        self.output.push_str(&value.to_string());
    }

    /// Writes a quoted string.
    pub fn write_str(&mut self, s: &str) {
        self.output.reserve(s.len() + 2);
        self.output.push(QUOTE);
        for ch in s.chars() {
            match ch {
                QUOTE | ESCAPE => {
                    self.output.push(ESCAPE);
                    self.output.push(ch);
                }
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000C}' => self.output.push_str("\\f"),
                ch if u32::from(ch) < 0x20 => {
                    self.output.push_str(&format!("\\u{:04x}", u32::from(ch)));
                }
                _ => self.output.push(ch),
            }
        }
        self.output.push(QUOTE);
    }

    /// Writes `$<index>$`.
    pub fn write_reference(&mut self, index: usize) {
        self.output.push(REFERENCE);
        self.output.push_str(&index.to_string());
        self.output.push(REFERENCE);
    }

    /// Writes an array, encoding each element with its own type.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an element.
    pub fn write_array<'a, T, I>(&mut self, elements: I) -> Result<()>
    where
        T: 'a + ?Sized + ToJson,
        I: IntoIterator<Item = &'a T>,
    {
        self.enter()?;
        self.output.push(ARRAY_OPEN);
        for (i, element) in elements.into_iter().enumerate() {
            if i > 0 {
                self.output.push(SEPARATOR);
            }
            element.to_json(self)?;
        }
        self.output.push(ARRAY_CLOSE);
        self.leave();
        Ok(())
    }

    /// Writes an owned composite in full.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a member.
    pub fn write_object<T: Object>(&mut self, object: &T) -> Result<()> {
        self.write_members(object, None)
    }

    /// Writes a shared composite, or a back-reference to it if it was already
    /// written and reference tracking is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Borrowed`] if the object is mutably borrowed, or the
    /// first error raised by a member.
    pub fn write_shared<T: Object>(&mut self, shared: &Shared<T>) -> Result<()> {
        let identity = Rc::as_ptr(shared) as *const () as usize;

        if let Some(index) = self
            .references
            .as_ref()
            .and_then(|table| table.lookup(identity))
        {
            tracing::trace!(index, type_name = T::TYPE_NAME, "writing back-reference");
            self.write_reference(index);
            return Ok(());
        }

        let object = shared.try_borrow().map_err(|_| Error::Borrowed {
            type_name: T::TYPE_NAME,
        })?;
        self.write_members(&*object, Some(identity))
    }

    fn write_members<T: Object>(&mut self, object: &T, identity: Option<usize>) -> Result<()> {
        self.open_object(identity)?;
        for (i, member) in describe::<T>().enumerate() {
            self.write_member_name(i, member.name());
            member.get(object, self)?;
        }
        self.close_object();
        Ok(())
    }

    /// Takes the next object index and writes `{`.
    ///
    /// The index is taken before any member is written, so members that point
    /// back to this object resolve to it.
    pub(crate) fn open_object(&mut self, identity: Option<usize>) -> Result<()> {
        self.enter()?;
        if let Some(table) = self.references.as_mut() {
            table.record(identity);
        }
        self.output.push(OBJECT_OPEN);
        Ok(())
    }

    pub(crate) fn write_member_name(&mut self, position: usize, name: &str) {
        if position > 0 {
            self.output.push(SEPARATOR);
        }
        self.write_str(name);
        self.output.push(KEY_VALUE);
    }

    pub(crate) fn close_object(&mut self) {
        self.output.push(OBJECT_CLOSE);
        self.leave();
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

macro_rules! primitive_to_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToJson for $ty {
                const KIND: Kind = Kind::Primitive;

                fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
                    encoder.write_primitive(self);
                    Ok(())
                }
            }
        )*
    };
}

primitive_to_json!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, BigInt,
);

impl ToJson for str {
    const KIND: Kind = Kind::String;

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_str(self);
        Ok(())
    }
}

impl ToJson for String {
    const KIND: Kind = Kind::String;

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_str(self);
        Ok(())
    }
}

impl ToJson for char {
    const KIND: Kind = Kind::String;

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_str(self.encode_utf8(&mut [0; 4]));
        Ok(())
    }
}

impl ToJson for DateTime<Utc> {
    const KIND: Kind = Kind::String;

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_str(&self.to_rfc3339());
        Ok(())
    }
}

impl<T: ToJson> ToJson for Option<T> {
    const KIND: Kind = T::KIND;
    const ELEMENT_KIND: Option<Kind> = T::ELEMENT_KIND;

    fn classify(&self) -> Kind {
        match self {
            Some(value) => value.classify(),
            None => Kind::Null,
        }
    }

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Some(value) => value.to_json(encoder),
            None => {
                encoder.write_null();
                Ok(())
            }
        }
    }
}

impl<T: ToJson> ToJson for [T] {
    const KIND: Kind = Kind::Array;
    const ELEMENT_KIND: Option<Kind> = Some(T::KIND);

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_array(self)
    }
}

impl<T: ToJson, const N: usize> ToJson for [T; N] {
    const KIND: Kind = Kind::Array;
    const ELEMENT_KIND: Option<Kind> = Some(T::KIND);

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_array(self)
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    const KIND: Kind = Kind::Array;
    const ELEMENT_KIND: Option<Kind> = Some(T::KIND);

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_array(self)
    }
}

impl<T: ?Sized + ToJson> ToJson for Box<T> {
    const KIND: Kind = T::KIND;
    const ELEMENT_KIND: Option<Kind> = T::ELEMENT_KIND;

    fn classify(&self) -> Kind {
        (**self).classify()
    }

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).to_json(encoder)
    }
}

impl<T: ?Sized + ToJson> ToJson for &T {
    const KIND: Kind = T::KIND;
    const ELEMENT_KIND: Option<Kind> = T::ELEMENT_KIND;

    fn classify(&self) -> Kind {
        (**self).classify()
    }

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).to_json(encoder)
    }
}

impl<T: Object> ToJson for Shared<T> {
    const KIND: Kind = Kind::Composite;

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_shared(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{impl_object, share};

    #[derive(Default)]
    struct Pair {
        a: i32,
        b: String,
    }

    impl_object!(Pair { a: i32, b: String });

    #[derive(Default)]
    struct Holder {
        left: Option<Shared<Pair>>,
        right: Option<Shared<Pair>>,
    }

    impl_object!(Holder {
        left: Option<Shared<Pair>>,
        right: Option<Shared<Pair>>,
    });

    fn encode<T: ?Sized + ToJson>(value: &T, options: &JsonOptions) -> String {
        let mut encoder = Encoder::new(options);
        encoder.encode(value).unwrap();
        encoder.into_inner()
    }

    #[test]
    fn test_primitives_use_display() {
        let options = JsonOptions::default();
        assert_eq!(encode(&42i32, &options), "42");
        assert_eq!(encode(&-7i64, &options), "-7");
        assert_eq!(encode(&2.5f64, &options), "2.5");
        assert_eq!(encode(&1e-7f64, &options), "0.0000001");
        assert_eq!(encode(&true, &options), "true");
        let big: BigInt = "1000000000000000000000000000000".parse().unwrap();
        assert_eq!(encode(&big, &options), "1000000000000000000000000000000");
    }

    #[test]
    fn test_strings_are_quoted_and_escaped() {
        let options = JsonOptions::default();
        assert_eq!(encode("x", &options), r#""x""#);
        assert_eq!(encode(&'q', &options), r#""q""#);
        assert_eq!(encode(r#"say "hi" \o/"#, &options), r#""say \"hi\" \\o/""#);
        assert_eq!(encode("", &options), r#""""#);
        assert_eq!(encode("a\nb\tc", &options), r#""a\nb\tc""#);
        assert_eq!(encode("\u{1}é", &options), r#""\u0001é""#);
    }

    #[test]
    fn test_object_members_in_order() {
        let pair = Pair {
            a: 1,
            b: "x".to_string(),
        };
        assert_eq!(encode(&pair, &JsonOptions::default()), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_null_and_empty_containers() {
        let options = JsonOptions::default();
        assert_eq!(encode(&None::<i32>, &options), "null");
        assert_eq!(encode(&Vec::<i32>::new(), &options), "[]");
        assert_eq!(encode(&Holder::default(), &options), r#"{"left":null,"right":null}"#);
    }

    #[test]
    fn test_repeated_shared_object_without_tracking() {
        let pair = share(Pair::default());
        let holder = Holder {
            left: Some(pair.clone()),
            right: Some(pair),
        };
        assert_eq!(
            encode(&holder, &JsonOptions::default()),
            r#"{"left":{"a":0,"b":""},"right":{"a":0,"b":""}}"#
        );
    }

    #[test]
    fn test_repeated_shared_object_with_tracking() {
        let pair = share(Pair::default());
        let holder = Holder {
            left: Some(pair.clone()),
            right: Some(pair),
        };
        let mut encoder = Encoder::new(&JsonOptions::tracked());
        encoder.encode(&holder).unwrap();
        assert_eq!(encoder.object_count(), Some(2));
        assert_eq!(
            encoder.into_inner(),
            r#"{"left":{"a":0,"b":""},"right":$1$}"#
        );
    }

    #[test]
    fn test_equal_but_distinct_objects_are_not_collapsed() {
        let holder = Holder {
            left: Some(share(Pair::default())),
            right: Some(share(Pair::default())),
        };
        assert_eq!(
            encode(&holder, &JsonOptions::tracked()),
            r#"{"left":{"a":0,"b":""},"right":{"a":0,"b":""}}"#
        );
    }

    #[test]
    fn test_mutably_borrowed_object_fails() {
        let pair = share(Pair::default());
        let _guard = pair.borrow_mut();
        let mut encoder = Encoder::new(&JsonOptions::default());
        let err = encoder.encode(&pair).unwrap_err();
        assert_eq!(err, Error::Borrowed { type_name: "Pair" });
    }

    #[test]
    fn test_depth_limit() {
        let nested = vec![vec![vec![1]]];
        let options = JsonOptions::new().with_max_depth(2);
        let mut encoder = Encoder::new(&options);
        assert_eq!(
            encoder.encode(&nested).unwrap_err(),
            Error::DepthLimitExceeded { limit: 2 }
        );

        encoder.encode(&vec![vec![2]]).unwrap();
        assert!(encoder.into_inner().ends_with("[[2]]"));
    }

    #[test]
    fn test_encoder_reusable_after_borrow_failure() {
        let pair = share(Pair::default());
        let mut encoder = Encoder::new(&JsonOptions::new().with_max_depth(1));
        {
            let _guard = pair.borrow_mut();
            assert!(encoder.encode(&vec![pair.clone()]).is_err());
        }
        assert_eq!(encoder.depth, 0);
        encoder.encode(&pair).unwrap();
        assert_eq!(encoder.into_inner(), r#"[{"a":0,"b":""}"#);
    }
}
