//! The refjson wire format.
//!
//! This module holds the fixed token set shared by the encoder and the lexer,
//! and documents the format as implemented by this library.
//!
//! # Overview
//!
//! refjson is a compact subset of JSON with one addition: back-references. A
//! shared object is written out in full the first time it is reached and as
//! `$<index>$` every time after that, where `index` counts objects in the order
//! they were opened.
//!
//! # Core Syntax
//!
//! | Construct | Syntax | Example |
//! |-----------|--------|---------|
//! | Object | `{` members separated by `,` `}` | `{"a":1,"b":"x"}` |
//! | Member | quoted name `:` value | `"count":3` |
//! | Array | `[` values separated by `,` `]` | `[[1,2],[]]` |
//! | String | `"` text `"` | `"hello"` |
//! | Primitive | default text form of the value | `42`, `-1.5`, `true`, `1e-7` |
//! | Null | `null` | `"next":null` |
//! | Back-reference | `$` index `$` | `"parent":$0$` |
//!
//! The encoder never emits whitespace. The lexer skips ASCII whitespace between
//! tokens, so hand-formatted documents are accepted.
//!
//! ## Strings
//!
//! Strings are always quoted and use the JSON escape set. The quote (`\"`),
//! the backslash (`\\`) and control characters below U+0020 are escaped on
//! output, the common ones by name (`\n`, `\t`) and the rest as `\u00XX`.
//! Reading also accepts `\/` and any `\uXXXX`, including surrogate pairs. An
//! unknown escape sequence is kept literally.
//!
//! ## Primitives
//!
//! Numbers and booleans are written with their `Display` form and read back
//! with `FromStr` for the declared type. Exponents and special float values
//! (`inf`, `NaN`) pass through as raw text.
//!
//! # Reference Numbering
//!
//! Indices are assigned in depth-first, pre-order position: an object takes
//! its index when its `{` is written, before any of its members. The root
//! object of a document is therefore `$0$`:
//!
//! ```text
//! {"name":"root","self":$0$,"child":{"name":"leaf","parent":$0$,"self":$1$}}
//! ```
//!
//! Every object written in full takes an index, including objects that can
//! never be referenced, so reader and writer count identically.
//!
//! # Example
//!
//! ```rust
//! use refjson::grammar;
//!
//! assert_eq!(grammar::OBJECT_OPEN, '{');
//! assert_eq!(grammar::REFERENCE, '$');
//! assert_eq!(grammar::NULL, "null");
//! ```

/// Opens an object.
pub const OBJECT_OPEN: char = '{';

/// Closes an object.
pub const OBJECT_CLOSE: char = '}';

/// Opens an array.
pub const ARRAY_OPEN: char = '[';

/// Closes an array.
pub const ARRAY_CLOSE: char = ']';

/// Separates a member name from its value.
pub const KEY_VALUE: char = ':';

/// Separates sibling members and array elements.
pub const SEPARATOR: char = ',';

/// Delimits strings and member names.
pub const QUOTE: char = '"';

/// Delimits a back-reference index on both sides.
pub const REFERENCE: char = '$';

/// Starts an escape sequence inside a string.
pub const ESCAPE: char = '\\';

/// The null literal.
pub const NULL: &str = "null";

/// Returns `true` for characters that end a bare primitive.
#[inline]
pub(crate) fn is_delimiter(ch: char) -> bool {
    matches!(
        ch,
        OBJECT_OPEN
            | OBJECT_CLOSE
            | ARRAY_OPEN
            | ARRAY_CLOSE
            | KEY_VALUE
            | SEPARATOR
            | QUOTE
            | REFERENCE
    ) || ch.is_ascii_whitespace()
}

/// Returns `true` if `text` reads back as the same primitive when written
/// unquoted: non-empty, not the null literal, and free of delimiters.
#[inline]
pub(crate) fn is_bare_primitive(text: &str) -> bool {
    !text.is_empty() && text != NULL && !text.chars().any(is_delimiter)
}
