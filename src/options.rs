//! Configuration options for encoding and decoding.
//!
//! ## Examples
//!
//! ```rust
//! use refjson::{to_string_with_options, JsonOptions};
//!
//! let numbers = vec![1, 2, 3];
//!
//! // Track shared objects and emit back-references
//! let options = JsonOptions::tracked();
//! let json = to_string_with_options(&numbers, &options).unwrap();
//! assert_eq!(json, "[1,2,3]");
//!
//! // Tighten the nesting limit
//! let options = JsonOptions::new().with_max_depth(16);
//! assert_eq!(options.max_depth, 16);
//! ```

/// Default nesting limit for objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for refjson.
///
/// - `track_references`: when `true`, the encoder remembers every shared object
///   it writes and emits `$<index>$` when it reaches one again. Without it, a
///   shared object is written out in full at every occurrence and a cycle
///   runs into `max_depth`.
/// - `max_depth`: the deepest nesting of objects and arrays accepted by both
///   the encoder and the decoder.
///
/// # Examples
///
/// ```rust
/// use refjson::JsonOptions;
///
/// let options = JsonOptions::new();
/// assert!(!options.track_references);
///
/// let options = JsonOptions::new().with_reference_tracking(true);
/// assert!(options.track_references);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct JsonOptions {
    pub track_references: bool,
    pub max_depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            track_references: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl JsonOptions {
    /// Creates default options (no reference tracking, depth limit of 128).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with reference tracking enabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::JsonOptions;
    ///
    /// assert!(JsonOptions::tracked().track_references);
    /// ```
    #[must_use]
    pub fn tracked() -> Self {
        JsonOptions {
            track_references: true,
            ..Default::default()
        }
    }

    /// Enables or disables reference tracking.
    #[must_use]
    pub fn with_reference_tracking(mut self, enabled: bool) -> Self {
        self.track_references = enabled;
        self
    }

    /// Sets the maximum nesting depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::JsonOptions;
    ///
    /// let options = JsonOptions::new().with_max_depth(8);
    /// assert_eq!(options.max_depth, 8);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
