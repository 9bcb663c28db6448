//! # three-core
//!
//! GPU-facing mesh data for three-rs.
//!
//! This crate sits between the math types and a renderer:
//!
//! - [`TypedArray`] - Numeric storage in one of nine element kinds
//! - [`BufferAttribute`] - A typed array read as fixed-size items, with a
//!   version counter for selective re-upload
//! - [`BufferGeometry`] - Named attributes, an index, material groups and
//!   cached bounding volumes
//!
//! ## Design
//!
//! Every container owns its data outright. There are no shared scratch
//! values; temporaries live on the stack of the call that needs them.
//! Derived data (bounds, normals) is computed on request and never
//! invalidated behind the caller's back.
//!
//! ## Usage
//!
//! ```rust
//! use three_core::prelude::*;
//!
//! let mut geometry = BufferGeometry::new();
//! let positions = BufferAttribute::new(
//!     vec![0.0f32, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0],
//!     3,
//!     false,
//! )?;
//! geometry.add_attribute("position", positions)?;
//! geometry.compute_bounding_box();
//!
//! let bounds = geometry.bounding_box().unwrap();
//! assert_eq!(bounds.size(), Vector3::new(2.0, 2.0, 0.0));
//! # Ok::<(), three_core::Error>(())
//! ```
//!
//! ## Dependencies
//!
//! - `three-math` - Vectors, matrices and bounding volumes
//! - [`thiserror`] - Error derive
//! - [`tracing`] - Data-quality warnings
//! - `rayon` - Parallel bounding-sphere scan (optional, default on)
//!
//! ## Feature Flags
//!
//! - `rayon` - Parallel read-only scans (enabled by default)
//! - `serde` - Serialization for attributes and geometry
//!
//! ## Used By
//!
//! - `three-scene` - Meshes reference geometry
//! - `three-geometries` - Primitive builders
//! - `three-cli` - Inspection commands

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod buffer_attribute;
mod buffer_geometry;
mod error;
mod typed_array;

pub use buffer_attribute::*;
pub use buffer_geometry::*;
pub use error::*;
pub use typed_array::*;

/// Prelude with the geometry types and the math types they use.
///
/// # Usage
///
/// ```
/// use three_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ArrayKind, Box3Ext, BufferAttribute, BufferGeometry, DrawRange, Error, Group, Result,
        TypedArray,
    };
    pub use three_math::prelude::*;
}
