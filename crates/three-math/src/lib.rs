//! # three-math
//!
//! Double-precision 3D math for the three-rs scene graph.
//!
//! - [`Vector2`], [`Vector3`], [`Vector4`] - points, directions, scale
//! - [`Matrix3`], [`Matrix4`] - normal matrices, affine transforms, projections
//! - [`Quaternion`], [`Euler`] - rotations, with [`RotationOrder`]
//! - [`Box3`], [`Sphere`] - bounding volumes
//! - [`Color`] - RGB with HSL and CSS-style parsing
//!
//! # Design
//!
//! Every type is a small `Copy` value. Mutators take `&mut self` and
//! return `&mut Self` so calls chain, and the `*_vectors` / `*_matrices`
//! forms write a result computed from their arguments into the receiver.
//! Matrices are stored **column-major**; `set` takes **row-major**
//! arguments.
//!
//! Numerical edge cases follow IEEE-754: dividing by a zero extent yields
//! `inf`/`NaN` rather than an error. Normalizing a zero vector or
//! quaternion is the exception and yields zero or identity respectively.
//!
//! # Usage
//!
//! ```rust
//! use three_math::prelude::*;
//!
//! let mut q = Quaternion::IDENTITY;
//! q.set_from_axis_angle(Vector3::Y, std::f64::consts::FRAC_PI_2);
//!
//! let mut v = Vector3::X;
//! v.apply_quaternion(q);
//! assert!((v.z + 1.0).abs() < 1e-12);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - `From` conversions to its double-precision types
//! - [`thiserror`] - error derive
//! - [`tracing`] - warnings from lenient parsers
//! - [`regex`] - CSS color parsing
//! - [`rand`] - UUID generation
//!
//! # Used By
//!
//! - `three-core` - buffer attributes and geometry
//! - `three-scene` - object transforms and cameras

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod math;
mod vector2;
mod vector3;
mod vector4;
mod quaternion;
mod euler;
mod matrix3;
mod matrix4;
mod box3;
mod sphere;
mod color;
mod color_keywords;
mod projector;

pub use error::*;
pub use math::*;
pub use vector2::*;
pub use vector3::*;
pub use vector4::*;
pub use quaternion::*;
pub use euler::*;
pub use matrix3::*;
pub use matrix4::*;
pub use box3::*;
pub use sphere::*;
pub use color::*;
pub use projector::*;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Box3, Color, Euler, Matrix3, Matrix4, Projector, Quaternion, RotationOrder, Sphere,
        Vector2, Vector3, Vector4,
    };
}

/// Re-export of the `glam` types this crate converts to and from.
pub mod glam {
    pub use ::glam::{DMat3, DMat4, DQuat, DVec2, DVec3, DVec4};
}
