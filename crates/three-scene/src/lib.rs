//! # three-scene
//!
//! Object hierarchy, cameras and the renderer interface for three-rs.
//!
//! - [`Object3D`] - Local transform with cached local and world matrices
//! - [`SceneGraph`] - Arena of objects linked by [`NodeId`]
//! - [`Scene`] - Graph root plus background color
//! - [`PerspectiveCamera`], [`OrthographicCamera`] - Projections usable
//!   with [`Vector3::project`](three_math::Vector3::project)
//! - [`Renderer`] - Frame drawing interface, with the headless
//!   [`DryRunRenderer`]
//!
//! ## Design
//!
//! Parent and child links live in the arena, not in the objects, so the
//! hierarchy needs no reference counting and cannot leak through cycles.
//! Geometry is shared between meshes through `Arc`.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use three_core::BufferGeometry;
//! use three_scene::prelude::*;
//!
//! let mut scene = Scene::new();
//! let pivot = scene.add(Object3D::named("pivot"));
//! let mesh = Mesh::new(Arc::new(BufferGeometry::new()));
//! let child = scene.add_child(pivot, Object3D::with_mesh("child", mesh))?;
//!
//! scene.object_mut(pivot).unwrap().set_position(Vector3::new(0.0, 1.0, 0.0));
//! scene.update_matrix_world()?;
//! assert_eq!(scene.object(child).unwrap().world_position().y, 1.0);
//! # Ok::<(), three_scene::Error>(())
//! ```
//!
//! ## Dependencies
//!
//! - `three-math` - Transforms and projection
//! - `three-core` - Mesh geometry
//! - [`thiserror`] - Error derive
//! - [`tracing`] - Hierarchy warnings and per-draw diagnostics
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for [`NodeId`] and the math/geometry types
//!
//! ## Used By
//!
//! - `three-cli` - The `render` command

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod camera;
mod error;
mod graph;
mod object3d;
mod renderer;
mod scene;

pub use camera::*;
pub use error::*;
pub use graph::*;
pub use object3d::*;
pub use renderer::*;
pub use scene::*;

/// Prelude with the scene types and the math types they use.
pub mod prelude {
    pub use crate::{
        Camera, DrawCall, DryRunRenderer, Error, Mesh, NodeId, Object3D, OrthographicCamera,
        PerspectiveCamera, Renderer, Result, Scene, SceneGraph,
    };
    pub use three_math::prelude::*;
}
