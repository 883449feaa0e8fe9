//! Dynamic value representation for refjson documents.
//!
//! This module provides the [`Value`] enum, which can hold any well-formed
//! refjson document. It's useful when the structure isn't known at compile
//! time, or for inspecting what an encoder produced.
//!
//! ## Core Types
//!
//! - [`Value`]: null, primitive text, string, array, object or back-reference
//! - [`ObjectMap`]: the insertion-ordered member map of an object
//!
//! Primitives keep their original text. Back-references stay unresolved as
//! [`Value::Reference`], so decoding a document into a `Value` and encoding it
//! again reproduces the document.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use refjson::{value, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let object = value!({
//!     "name": "Alice",
//!     "tags": ["a", "b"]
//! });
//! assert_eq!(object.to_string(), r#"{"name":"Alice","tags":["a","b"]}"#);
//! ```
//!
//! ### Decoding Unknown Documents
//!
//! ```rust
//! use refjson::{from_str, Value};
//!
//! let value: Value = from_str(r#"{"name":"loop","next":$0$}"#).unwrap();
//! let object = value.as_object().unwrap();
//! assert_eq!(object.get("next"), Some(&Value::Reference(0)));
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use refjson::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! assert_eq!(value.as_i64(), Some(42));
//! assert_eq!(i64::try_from(value).unwrap(), 42);
//! ```

use crate::de::unexpected;
use crate::grammar::is_bare_primitive;
use crate::model::{FromJson, Kind, ToJson};
use crate::{Decoder, Encoder, Error, JsonOptions, ObjectMap, Result};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Member name used for back-references when a [`Value`] goes through serde.
pub const REFERENCE_KEY: &str = "$ref";

/// A dynamically-typed refjson document.
///
/// # Examples
///
/// ```rust
/// use refjson::Value;
///
/// let null = Value::Null;
/// let num = Value::Primitive("42".to_string());
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_primitive());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    /// Unquoted text such as `42`, `-1.5` or `true`.
    ///
    /// Encoding fails with [`Error::InvalidPrimitive`] if the text is empty,
    /// is `null`, or contains a delimiter or whitespace.
    Primitive(String),
    String(String),
    Array(Vec<Value>),
    Object(ObjectMap),
    /// A back-reference to the object with this chronological index.
    Reference(usize),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Value::Primitive(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    /// Returns how this value is written.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::{Kind, Value};
    ///
    /// assert_eq!(Value::Null.kind(), Kind::Null);
    /// assert_eq!(Value::from(1.5).kind(), Kind::Primitive);
    /// assert_eq!(Value::Reference(3).kind(), Kind::Reference);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Primitive(_) => Kind::Primitive,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Composite,
            Value::Reference(_) => Kind::Reference,
        }
    }

    /// If the value is a string, returns it. Otherwise returns `None`.
    ///
    /// Primitive text is not returned; see [`Value::as_primitive`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a primitive, returns its text. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_primitive(&self) -> Option<&str> {
        match self {
            Value::Primitive(text) => Some(text),
            _ => None,
        }
    }

    /// If the value is the primitive `true` or `false`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::Value;
    ///
    /// assert_eq!(Value::from(true).as_bool(), Some(true));
    /// assert_eq!(Value::from("true").as_bool(), None);
    /// ```
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_primitive()?.parse().ok()
    }

    /// If the value is a primitive that parses as an `i64`, returns it.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_primitive()?.parse().ok()
    }

    /// If the value is a primitive that parses as an `f64`, returns it.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_primitive()?.parse().ok()
    }

    /// If the value is a primitive that parses as a [`BigInt`], returns it.
    #[must_use]
    pub fn as_bigint(&self) -> Option<BigInt> {
        self.as_primitive()?.parse().ok()
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the value is a back-reference, returns its target index.
    #[inline]
    #[must_use]
    pub const fn as_reference(&self) -> Option<usize> {
        match self {
            Value::Reference(index) => Some(*index),
            _ => None,
        }
    }

    /// Looks up a member of an object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }
}

/// Formats the value as refjson text with the default options.
///
/// A value that cannot be encoded, such as one nested deeper than
/// [`DEFAULT_MAX_DEPTH`](crate::options::DEFAULT_MAX_DEPTH), reports
/// [`fmt::Error`]; use [`to_string`](crate::to_string) to get the cause.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut encoder = Encoder::new(&JsonOptions::new());
        self.to_json(&mut encoder).map_err(|_| fmt::Error)?;
        f.write_str(&encoder.into_inner())
    }
}

impl ToJson for Value {
    const KIND: Kind = Kind::Any;

    fn classify(&self) -> Kind {
        self.kind()
    }

    fn to_json(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Value::Null => encoder.write_null(),
            Value::Primitive(text) if is_bare_primitive(text) => {
                encoder.write_primitive(text.as_str());
            }
            Value::Primitive(text) => {
                return Err(Error::InvalidPrimitive { text: text.clone() });
            }
            Value::String(s) => encoder.write_str(s),
            Value::Array(items) => return encoder.write_array(items),
            Value::Object(map) => {
                encoder.open_object(None)?;
                for (i, (name, value)) in map.iter().enumerate() {
                    encoder.write_member_name(i, name);
                    value.to_json(encoder)?;
                }
                encoder.close_object();
            }
            Value::Reference(index) => encoder.write_reference(*index),
        }
        Ok(())
    }
}

impl FromJson for Value {
    fn from_json(decoder: &mut Decoder) -> Result<Self> {
        let next = decoder.peek_kind().and_then(|token| token.value_kind());

        match next {
            Some(Kind::Null) => {
                decoder.consume_null();
                Ok(Value::Null)
            }
            Some(Kind::Primitive) => decoder.read_primitive().map(Value::Primitive),
            Some(Kind::String) => decoder.read_string().map(Value::String),
            Some(Kind::Array) => decoder.read_array(Value::from_json).map(Value::Array),
            Some(Kind::Composite) => {
                let mut map = ObjectMap::new();
                decoder.read_untyped_object(|decoder, name, _| {
                    let value = Value::from_json(decoder)?;
                    map.insert(name, value);
                    Ok(())
                })?;
                Ok(Value::Object(map))
            }
            Some(Kind::Reference) => decoder
                .read_reference_index()
                .map(|(index, _)| Value::Reference(index)),
            _ => {
                let token = decoder.next_token("value")?;
                Err(unexpected(token.position, "value", &token.kind))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Primitive(text) => {
                if let Ok(b) = text.parse::<bool>() {
                    serializer.serialize_bool(b)
                } else if let Ok(i) = text.parse::<i64>() {
                    serializer.serialize_i64(i)
                } else if let Ok(u) = text.parse::<u64>() {
                    serializer.serialize_u64(u)
                } else if let Some(f) = text.parse::<f64>().ok().filter(|f| f.is_finite()) {
                    serializer.serialize_f64(f)
                } else {
                    serializer.serialize_str(text)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Reference(index) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(REFERENCE_KEY, index)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any refjson value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ObjectMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }

                if values.len() == 1 {
                    if let Some(index) = values.get(REFERENCE_KEY).and_then(Value::as_primitive) {
                        if let Ok(index) = index.parse() {
                            return Ok(Value::Reference(index));
                        }
                    }
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::custom(format!("expected integer, found {:?}", value)))
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::custom(format!("expected number, found {:?}", value)))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| Error::custom(format!("expected bool, found {:?}", value)))
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(Error::custom(format!("expected string, found {:?}", value))),
        }
    }
}

macro_rules! value_from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Primitive(value.to_string())
                }
            }
        )*
    };
}

value_from_primitive!(bool, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64, BigInt);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectMap> for Value {
    fn from(value: ObjectMap) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_MAX_DEPTH;
    use crate::{from_str, to_string};

    #[test]
    fn test_decode_keeps_structure() {
        let value: Value = from_str(r#"{"a":[1,"x",null],"b":{"c":$1$}}"#).unwrap();
        assert_eq!(
            value.get("a"),
            Some(&Value::Array(vec![
                Value::from(1),
                Value::from("x"),
                Value::Null
            ]))
        );
        assert_eq!(
            value.get("b").and_then(|b| b.get("c")),
            Some(&Value::Reference(1))
        );
    }

    #[test]
    fn test_reencode_reproduces_input() {
        let input = r#"{"name":"a","items":[{"id":1,"back":$0$},$1$],"none":null}"#;
        let value: Value = from_str(input).unwrap();
        assert_eq!(to_string(&value).unwrap(), input);
        assert_eq!(value.to_string(), input);
    }

    #[test]
    fn test_display_stops_at_depth_limit() {
        use std::fmt::Write;

        let mut deep = Value::Null;
        for _ in 0..=DEFAULT_MAX_DEPTH {
            deep = Value::Array(vec![deep]);
        }
        assert_eq!(
            to_string(&deep).unwrap_err(),
            Error::DepthLimitExceeded {
                limit: DEFAULT_MAX_DEPTH
            }
        );
        let mut out = String::new();
        assert!(write!(out, "{deep}").is_err());

        let Value::Array(mut items) = deep else {
            unreachable!()
        };
        let shallower = items.remove(0);
        assert!(shallower.to_string().starts_with("[[["));
    }

    #[test]
    fn test_unwritable_primitives_are_rejected() {
        for text in ["", "null", "1,2", "a b", "x}"] {
            let value = Value::Array(vec![Value::Primitive(text.to_string())]);
            assert_eq!(
                to_string(&value).unwrap_err(),
                Error::InvalidPrimitive {
                    text: text.to_string()
                }
            );
        }
        let value = Value::Array(vec![Value::Primitive("-2.5e3".to_string())]);
        assert_eq!(to_string(&value).unwrap(), "[-2.5e3]");
    }

    #[test]
    fn test_references_are_validated() {
        assert!(matches!(
            from_str::<Value>("[$0$]"),
            Err(Error::UnresolvedReference {
                index: 0,
                available: 0,
                ..
            })
        ));
        assert!(matches!(
            from_str::<Value>("{}"),
            Ok(Value::Object(map)) if map.is_empty()
        ));
    }

    #[test]
    fn test_stray_punctuation() {
        assert_eq!(
            from_str::<Value>("]").unwrap_err(),
            Error::unexpected_token(0, "value", "']'")
        );
        assert_eq!(
            from_str::<Value>("").unwrap_err(),
            Error::unexpected_eof("value")
        );
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::from(42)).unwrap(), 42);
        assert!(i64::try_from(Value::from("42")).is_err());
        assert_eq!(f64::try_from(Value::from(3.5)).unwrap(), 3.5);
        assert!(bool::try_from(Value::from(true)).unwrap());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert!(String::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Primitive("true".to_string()));
        assert_eq!(Value::from(-7i64), Value::Primitive("-7".to_string()));
        assert_eq!(Value::from('c'), Value::String("c".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(2u8)), Value::Primitive("2".to_string()));
    }

    #[test]
    fn test_serde_interop() {
        let value: Value = from_str(r#"{"n":1.5,"ok":true,"s":"t","r":[$0$]}"#).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"n":1.5,"ok":true,"s":"t","r":[{"$ref":0}]}"#);

        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_const_is_methods() {
        const fn check_null(v: &Value) -> bool {
            v.is_null()
        }

        assert!(check_null(&Value::Null));
        assert!(!Value::Reference(0).is_object());
        assert_eq!(Value::Reference(4).as_reference(), Some(4));
    }
}
