//! Error types for three-math operations.
//!
//! Most math operations are infallible and follow IEEE-754 semantics
//! (propagating `Inf`/`NaN`). The variants here cover the few places where
//! a caller asked for a checked result.
//!
//! # Usage
//!
//! ```rust
//! use three_math::{Error, Matrix4};
//!
//! let singular = Matrix4::ZERO;
//! let mut inv = Matrix4::IDENTITY;
//! assert!(matches!(inv.try_get_inverse(&singular), Err(Error::SingularMatrix)));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::Vector2`], [`crate::Vector3`] - Component access
//! - [`crate::Matrix3`], [`crate::Matrix4`] - Strict inversion
//! - [`crate::RotationOrder`] - Parsing order names
//! - [`crate::Color`] - Strict style parsing
//! - `three-scene` - Wrapped into the scene error type

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by checked math operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Component index outside `[0, len)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use three_math::{Error, Vector3};
    ///
    /// let v = Vector3::ZERO;
    /// assert_eq!(v.get_component(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    #[error("index is out of range: {index} (len {len})")]
    IndexOutOfRange {
        /// Requested component index
        index: usize,
        /// Number of components of the value
        len: usize,
    },

    /// Matrix determinant is exactly zero.
    #[error("can't invert matrix, determinant is 0")]
    SingularMatrix,

    /// Name does not match any rotation order.
    #[error("unknown rotation order: {0}")]
    UnknownRotationOrder(String),

    /// Color string is not a recognized CSS-style color.
    #[error("invalid color style: {0}")]
    InvalidColorStyle(String),
}
