//! # three-geometries
//!
//! Parametric primitives that produce ready-to-draw
//! [`BufferGeometry`](three_core::BufferGeometry).
//!
//! - [`BoxGeometry`] - Six subdivided faces with one material group each
//! - [`PlaneGeometry`] - A single subdivided face facing +z
//!
//! ## Usage
//!
//! ```rust
//! use three_geometries::PlaneGeometry;
//!
//! let mut plane = PlaneGeometry::new(10.0, 10.0, 4, 4).build()?;
//! plane.rotate_x(-std::f64::consts::FRAC_PI_2)?;
//! assert_eq!(plane.attribute("position").unwrap().count(), 25);
//! # Ok::<(), three_core::Error>(())
//! ```
//!
//! ## Dependencies
//!
//! - `three-core` - Output geometry
//! - [`tracing`] - Build diagnostics
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization of the parameter structs
//!
//! ## Used By
//!
//! - `three-cli` - `box` and `render` commands

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod box_geometry;
mod grid;
mod plane_geometry;

pub use box_geometry::*;
pub use plane_geometry::*;
