//! The member model: how the codec sees a type.
//!
//! The encoder and decoder never inspect a type directly. Everything they need
//! comes through the traits in this module:
//!
//! - [`ToJson`] and [`FromJson`] write and read one value, and classify its
//!   type as a [`Kind`].
//! - [`Object`] lists a composite type's members as [`Member`] descriptors:
//!   name, declared kind, a getter that encodes the member and a setter that
//!   decodes into it.
//!
//! User types register their members with [`impl_object!`](crate::impl_object),
//! which implements all three traits.
//!
//! ## Shared Objects
//!
//! Plain struct members own their value and are always written out in full.
//! To share an object between several owners, or to build a cycle, wrap it in
//! [`Shared`]. With reference tracking enabled, the second and later
//! occurrences of the same `Shared` allocation are written as back-references.
//!
//! ```rust
//! use refjson::{impl_object, share, to_string_with_options, JsonOptions, Shared};
//!
//! #[derive(Default)]
//! struct Node {
//!     name: String,
//!     next: Option<Shared<Node>>,
//! }
//!
//! impl_object!(Node {
//!     name: String,
//!     next: Option<Shared<Node>>,
//! });
//!
//! let node = share(Node { name: "loop".to_string(), next: None });
//! node.borrow_mut().next = Some(node.clone());
//!
//! let json = to_string_with_options(&node, &JsonOptions::tracked()).unwrap();
//! assert_eq!(json, r#"{"name":"loop","next":$0$}"#);
//! # node.borrow_mut().next = None;
//! ```

use crate::{Decoder, Encoder, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An object that can be reached from several places in a graph.
///
/// The allocation address is the object's identity while encoding.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value in a new [`Shared`] allocation.
#[must_use]
pub fn share<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Classification of a type, or of a single value, as the codec sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// An absent value. Only produced by [`ToJson::classify`].
    Null,
    /// Written with its text form, unquoted.
    Primitive,
    /// Written quoted.
    String,
    /// An ordered sequence of elements of one declared type.
    Array,
    /// An object with named members.
    Composite,
    /// A back-reference. Only produced by [`ToJson::classify`] on dynamic values.
    Reference,
    /// Any of the above, decided per value.
    Any,
}

impl Kind {
    /// Returns `true` for kinds read and written as a single token.
    #[inline]
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Kind::Primitive | Kind::String)
    }

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Primitive => "primitive",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Composite => "composite",
            Kind::Reference => "reference",
            Kind::Any => "any",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type that can be written by the [`Encoder`].
pub trait ToJson {
    /// The declared kind of this type.
    const KIND: Kind;

    /// For array types, the declared kind of the elements.
    const ELEMENT_KIND: Option<Kind> = None;

    /// Classifies this particular value. Differs from [`ToJson::KIND`] for
    /// absent optional values and for dynamic values.
    fn classify(&self) -> Kind {
        Self::KIND
    }

    /// Writes this value to the encoder.
    ///
    /// # Errors
    ///
    /// Returns an error if a nested value cannot be written.
    fn to_json(&self, encoder: &mut Encoder) -> Result<()>;
}

/// A type that can be read by the [`Decoder`].
pub trait FromJson: Sized {
    /// Reads one value of this type from the decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the next tokens do not form a value of this type.
    fn from_json(decoder: &mut Decoder) -> Result<Self>;
}

/// A composite type with named members.
///
/// New instances are created with [`Default`] and then filled in member by
/// member, so a member missing from the input keeps its default value.
pub trait Object: Default + 'static {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// All members in serialization order, including ignored ones.
    fn members() -> &'static [Member<Self>];
}

/// Encodes one member of `T`.
pub type Getter<T> = fn(&T, &mut Encoder) -> Result<()>;

/// Decodes one member of `T` in place.
pub type Setter<T> = fn(&mut T, &mut Decoder) -> Result<()>;

/// Descriptor of one member of a composite type.
pub struct Member<T> {
    name: &'static str,
    kind: Kind,
    element_kind: Option<Kind>,
    get: Getter<T>,
    set: Setter<T>,
    ignored: bool,
}

impl<T> Member<T> {
    #[must_use]
    pub const fn new(
        name: &'static str,
        kind: Kind,
        element_kind: Option<Kind>,
        get: Getter<T>,
        set: Setter<T>,
    ) -> Self {
        Member {
            name,
            kind,
            element_kind,
            get,
            set,
            ignored: false,
        }
    }

    /// Marks this member as excluded from both encoding and decoding.
    #[must_use]
    pub const fn ignore(self) -> Self {
        Member {
            ignored: true,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn element_kind(&self) -> Option<Kind> {
        self.element_kind
    }

    #[inline]
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Encodes this member of `object`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing the member's value.
    pub fn get(&self, object: &T, encoder: &mut Encoder) -> Result<()> {
        (self.get)(object, encoder)
    }

    /// Decodes the next value into this member of `object`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading the member's value.
    pub fn set(&self, object: &mut T, decoder: &mut Decoder) -> Result<()> {
        (self.set)(object, decoder)
    }
}

impl<T> Clone for Member<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Member<T> {}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("element_kind", &self.element_kind)
            .field("ignored", &self.ignored)
            .finish()
    }
}

/// Returns the serializable members of `T` in order, skipping ignored ones.
///
/// # Examples
///
/// ```rust
/// use refjson::{describe, impl_object, Kind};
///
/// #[derive(Default)]
/// struct Point { x: i32, y: i32, cached: f64 }
///
/// impl_object!(Point { x: i32, y: i32, #[ignore] cached: f64 });
///
/// let names: Vec<_> = describe::<Point>().map(|m| m.name()).collect();
/// assert_eq!(names, ["x", "y"]);
/// assert!(describe::<Point>().all(|m| m.kind() == Kind::Primitive));
/// ```
pub fn describe<T: Object>() -> impl Iterator<Item = &'static Member<T>> {
    T::members().iter().filter(|member| !member.is_ignored())
}

/// Looks up a serializable member of `T` by name.
#[must_use]
pub fn find_member<T: Object>(name: &str) -> Option<&'static Member<T>> {
    describe::<T>().find(|member| member.name() == name)
}
