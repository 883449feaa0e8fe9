//! # refjson
//!
//! A JSON-like text codec for object graphs with shared references and cycles.
//!
//! ## What is refjson?
//!
//! refjson writes typed object graphs as compact JSON-like text. With reference
//! tracking enabled, an object reachable from several places is written in full
//! once and as a back-reference `$<index>$` everywhere else, where the index
//! counts objects in the order they were opened. Decoding rebuilds the graph
//! with the same sharing, cycles included.
//!
//! ## Key Features
//!
//! - **Cycle Safe**: self-references and cycles through [`Shared`] objects
//!   encode to finite text and decode back to the same shape
//! - **Typed Decoding**: every member is read with its declared type
//! - **Explicit Member Lists**: [`impl_object!`] registers which members are
//!   serialized, under which names
//! - **Dynamic Values**: [`Value`] reads and writes any document without a
//!   target type
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use refjson::{from_str, impl_object, to_string};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! impl_object!(User { id: u32, name: String, tags: Vec<String> });
//!
//! let user = User { id: 123, name: "Alice".to_string(), tags: vec!["admin".to_string()] };
//!
//! let json = to_string(&user).unwrap();
//! assert_eq!(json, r#"{"id":123,"name":"Alice","tags":["admin"]}"#);
//!
//! let user_back: User = from_str(&json).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Shared Objects and Cycles
//!
//! ```rust
//! use refjson::{from_str, impl_object, share, to_string_with_options, JsonOptions, Shared};
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Employee {
//!     name: String,
//!     manager: Option<Shared<Employee>>,
//! }
//!
//! impl_object!(Employee {
//!     name: String,
//!     manager: Option<Shared<Employee>>,
//! });
//!
//! let boss = share(Employee { name: "Grace".to_string(), manager: None });
//! boss.borrow_mut().manager = Some(boss.clone());
//!
//! let json = to_string_with_options(&boss, &JsonOptions::tracked()).unwrap();
//! assert_eq!(json, r#"{"name":"Grace","manager":$0$}"#);
//!
//! let back: Shared<Employee> = from_str(&json).unwrap();
//! let manager = back.borrow().manager.clone().unwrap();
//! assert!(Rc::ptr_eq(&back, &manager));
//! # boss.borrow_mut().manager = None;
//! # back.borrow_mut().manager = None;
//! ```
//!
//! ### Dynamic Values with the value! Macro
//!
//! ```rust
//! use refjson::{value, Value};
//!
//! let data = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "graphs"]
//! });
//!
//! assert_eq!(data.get("name").and_then(Value::as_str), Some("Alice"));
//! assert_eq!(data.to_string(), r#"{"name":"Alice","age":30,"tags":["rust","graphs"]}"#);
//! ```
//!
//! ## Logging
//!
//! The codec emits [`tracing`] events: `debug` for each top-level conversion
//! and `trace` for every back-reference written or resolved. Install any
//! subscriber to see them.
//!
//! ## Format
//!
//! See the [`grammar`] module for the complete token set.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - encoding and decoding a plain struct
//! - **`shared_references.rs`** - shared objects, cycles and tracing output
//! - **`dynamic_values.rs`** - working with `Value`
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod model;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Decoder;
pub use error::{Error, Result};
pub use map::ObjectMap;
pub use model::{describe, find_member, share, FromJson, Kind, Member, Object, Shared, ToJson};
pub use options::JsonOptions;
pub use ser::Encoder;
pub use value::Value;

use std::io;

/// Encodes a value without reference tracking.
///
/// Shared objects are written in full at every occurrence; a cyclic graph
/// fails with [`Error::DepthLimitExceeded`].
///
/// # Examples
///
/// ```rust
/// use refjson::to_string;
///
/// assert_eq!(to_string(&vec![Some(1), None]).unwrap(), "[1,null]");
/// ```
///
/// # Errors
///
/// Returns an error if the value nests too deeply or a shared object is
/// mutably borrowed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + ToJson,
{
    to_string_with_options(value, &JsonOptions::default())
}

/// Encodes a value with custom options.
///
/// # Examples
///
/// ```rust
/// use refjson::{impl_object, share, to_string_with_options, JsonOptions, Shared};
///
/// #[derive(Default)]
/// struct Tag { label: String }
///
/// impl_object!(Tag { label: String });
///
/// let tag = share(Tag { label: "x".to_string() });
/// let tags: Vec<Shared<Tag>> = vec![tag.clone(), tag];
///
/// let json = to_string_with_options(&tags, &JsonOptions::tracked()).unwrap();
/// assert_eq!(json, r#"[{"label":"x"},$0$]"#);
/// ```
///
/// # Errors
///
/// Returns an error if the value nests too deeply or a shared object is
/// mutably borrowed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &JsonOptions) -> Result<String>
where
    T: ?Sized + ToJson,
{
    let mut encoder = Encoder::new(options);
    encoder.encode(value)?;
    let objects = encoder.object_count();
    let output = encoder.into_inner();
    tracing::debug!(
        kind = %value.classify(),
        track_references = options.track_references,
        objects = ?objects,
        length = output.len(),
        "encoded"
    );
    Ok(output)
}

/// Encodes a value to a writer without reference tracking.
///
/// # Examples
///
/// ```rust
/// use refjson::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[1, 2]).unwrap();
/// assert_eq!(buffer, b"[1,2]");
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + ToJson,
{
    to_writer_with_options(writer, value, &JsonOptions::default())
}

/// Encodes a value to a writer with custom options.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &JsonOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + ToJson,
{
    let json = to_string_with_options(value, options)?;
    writer
        .write_all(json.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decodes a value of type `T` from refjson text.
///
/// Back-references are always resolved, whatever options the text was
/// encoded with.
///
/// # Examples
///
/// ```rust
/// use refjson::{from_str, impl_object};
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// impl_object!(Point { x: i32, y: i32 });
///
/// let point: Point = from_str(r#"{"x":1,"y":2}"#).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is malformed or does not match `T`. Error
/// messages include the byte position of the offending token.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: FromJson,
{
    from_str_with_options(s, &JsonOptions::default())
}

/// Decodes a value of type `T` with custom options.
///
/// Only `max_depth` applies when decoding.
///
/// # Errors
///
/// Returns an error if the text is malformed, does not match `T`, or nests
/// deeper than `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &JsonOptions) -> Result<T>
where
    T: FromJson,
{
    let mut decoder = Decoder::from_str_with_options(s, options)?;
    let value = decoder.decode()?;
    decoder.end()?;
    tracing::debug!(
        target_type = std::any::type_name::<T>(),
        objects = decoder.object_count(),
        length = s.len(),
        "decoded"
    );
    Ok(value)
}

/// Decodes a value of type `T` from an I/O stream of refjson text.
///
/// # Examples
///
/// ```rust
/// use refjson::from_reader;
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(b"[[1],[2,3]]");
/// let jagged: Vec<Vec<u8>> = from_reader(cursor).unwrap();
/// assert_eq!(jagged, vec![vec![1], vec![2, 3]]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the text cannot be decoded as `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: FromJson,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Decodes a value of type `T` from bytes of refjson text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or cannot be decoded as `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: FromJson,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_object;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl_object!(Point { x: i32, y: i32 });

    #[derive(Debug, Default, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        home: Option<Point>,
    }

    impl_object!(User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        home: Option<Point>,
    });

    #[test]
    fn test_encode_decode_point() {
        let point = Point { x: 1, y: 2 };
        let json = to_string(&point).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2}"#);
        let point_back: Point = from_str(&json).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_encode_decode_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
            home: Some(Point { x: -4, y: 0 }),
        };

        let json = to_string(&user).unwrap();
        let user_back: User = from_str(&json).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_tracking_does_not_change_tree_output() {
        let user = User::default();
        assert_eq!(
            to_string(&user).unwrap(),
            to_string_with_options(&user, &JsonOptions::tracked()).unwrap()
        );
    }

    #[test]
    fn test_writer_and_reader() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 3, y: 4 }).unwrap();
        let point: Point = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
        let point: Point = from_slice(&buffer).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            from_slice::<Point>(&[0xff, 0xfe]),
            Err(Error::Custom(_))
        ));
    }

    #[test]
    fn test_decode_depth_option() {
        let options = JsonOptions::new().with_max_depth(1);
        assert!(from_str_with_options::<Vec<i32>>("[1]", &options).is_ok());
        assert_eq!(
            from_str_with_options::<Vec<Vec<i32>>>("[[1]]", &options).unwrap_err(),
            Error::DepthLimitExceeded { limit: 1 }
        );
    }
}
