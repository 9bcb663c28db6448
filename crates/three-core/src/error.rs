//! Error types for buffer and geometry operations.
//!
//! Per-element accessors index like slices and panic when out of bounds.
//! Everything that writes more than one element, or that takes an array or
//! a name from the caller, is checked up front and reports one of these
//! variants without touching the receiver.
//!
//! # Usage
//!
//! ```rust
//! use three_core::{BufferAttribute, BufferGeometry, Error};
//!
//! let mut geometry = BufferGeometry::new();
//! let attr = BufferAttribute::new(vec![0u16, 1, 2], 1, false).unwrap();
//! assert!(matches!(
//!     geometry.add_attribute("index", attr),
//!     Err(Error::ReservedAttributeName(_))
//! ));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by attribute and geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Element type name is not one of the nine typed array kinds.
    #[error("unsupported array type: {0}")]
    UnsupportedArrayType(String),

    /// Item size is zero or does not divide the array length.
    #[error("invalid item size {item_size} for array of length {len}")]
    InvalidItemSize {
        /// Components per element
        item_size: usize,
        /// Length of the backing array
        len: usize,
    },

    /// `"index"` passed to the generic attribute map.
    #[error("attribute name is reserved: {0} (use set_index)")]
    ReservedAttributeName(String),

    /// A write or lookup would run past the end of the backing storage.
    #[error("out of range: {len} values at offset {offset} exceed capacity {capacity}")]
    OutOfRange {
        /// First value written or read
        offset: usize,
        /// Number of values involved
        len: usize,
        /// Available values
        capacity: usize,
    },

    /// Operation needs a different number of components per element.
    #[error("item size mismatch: expected {expected}, got {actual}")]
    ItemSizeMismatch {
        /// Required item size (or minimum item size)
        expected: usize,
        /// Item size of the attribute
        actual: usize,
    },
}
