//! Perspective and orthographic cameras.
//!
//! A camera is an [`Object3D`] plus a projection. It looks down its local
//! -Z axis. Change any projection parameter, then call
//! `update_projection_matrix` before projecting with it.

use three_math::{DEG2RAD, Matrix4, Projector, RAD2DEG, Vector3};

use crate::Object3D;

/// Camera with a transform and a projection matrix.
pub trait Camera: Projector {
    /// The camera's transform node.
    fn object(&self) -> &Object3D;

    /// Mutable transform node.
    fn object_mut(&mut self) -> &mut Object3D;

    /// Recomputes the projection from the camera parameters.
    fn update_projection_matrix(&mut self);

    /// Points the camera's -Z axis at `target` and refreshes its world
    /// matrix.
    fn look_at(&mut self, target: Vector3) {
        let object = self.object_mut();
        object.look_at_from_eye(target);
        object.update_matrix_world(None, false);
    }
}

/// Pinhole camera with a vertical field of view in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Transform node
    pub object: Object3D,
    /// Vertical field of view, degrees
    pub fov: f64,
    /// Width over height
    pub aspect: f64,
    /// Near plane distance
    pub near: f64,
    /// Far plane distance
    pub far: f64,
    /// Magnification; 2.0 halves the visible extent
    pub zoom: f64,
    projection_matrix: Matrix4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    /// Camera at the origin with its projection already computed.
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            object: Object3D::named("PerspectiveCamera"),
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
            projection_matrix: Matrix4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Sets the field of view that makes a frame of `frame_height` fill the
    /// view for a lens of `focal_length` (same units).
    pub fn set_lens(&mut self, focal_length: f64, frame_height: f64) -> &mut Self {
        self.fov = 2.0 * RAD2DEG * (frame_height / (focal_length * 2.0)).atan();
        self.update_projection_matrix();
        self
    }

    /// Projection from the last [`Camera::update_projection_matrix`].
    pub fn projection(&self) -> &Matrix4 {
        &self.projection_matrix
    }
}

impl Camera for PerspectiveCamera {
    fn object(&self) -> &Object3D {
        &self.object
    }

    fn object_mut(&mut self) -> &mut Object3D {
        &mut self.object
    }

    fn update_projection_matrix(&mut self) {
        let top = self.near * (DEG2RAD * 0.5 * self.fov).tan() / self.zoom;
        let height = 2.0 * top;
        let width = self.aspect * height;
        let left = -0.5 * width;
        self.projection_matrix
            .make_frustum(left, left + width, top - height, top, self.near, self.far);
    }
}

impl Projector for PerspectiveCamera {
    fn projection_matrix(&self) -> Matrix4 {
        self.projection_matrix
    }

    fn matrix_world(&self) -> Matrix4 {
        *self.object.matrix_world()
    }
}

/// Parallel projection of an axis-aligned view box.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    /// Transform node
    pub object: Object3D,
    /// Left plane
    pub left: f64,
    /// Right plane
    pub right: f64,
    /// Top plane
    pub top: f64,
    /// Bottom plane
    pub bottom: f64,
    /// Near plane distance
    pub near: f64,
    /// Far plane distance
    pub far: f64,
    /// Magnification about the view box center
    pub zoom: f64,
    projection_matrix: Matrix4,
}

impl OrthographicCamera {
    /// Camera at the origin with its projection already computed.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            object: Object3D::named("OrthographicCamera"),
            left,
            right,
            top,
            bottom,
            near,
            far,
            zoom: 1.0,
            projection_matrix: Matrix4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Projection from the last [`Camera::update_projection_matrix`].
    pub fn projection(&self) -> &Matrix4 {
        &self.projection_matrix
    }
}

impl Camera for OrthographicCamera {
    fn object(&self) -> &Object3D {
        &self.object
    }

    fn object_mut(&mut self) -> &mut Object3D {
        &mut self.object
    }

    fn update_projection_matrix(&mut self) {
        let dx = (self.right - self.left) / (2.0 * self.zoom);
        let dy = (self.top - self.bottom) / (2.0 * self.zoom);
        let cx = (self.right + self.left) / 2.0;
        let cy = (self.top + self.bottom) / 2.0;
        self.projection_matrix
            .make_orthographic(cx - dx, cx + dx, cy + dy, cy - dy, self.near, self.far);
    }
}

impl Projector for OrthographicCamera {
    fn projection_matrix(&self) -> Matrix4 {
        self.projection_matrix
    }

    fn matrix_world(&self) -> Matrix4 {
        *self.object.matrix_world()
    }
}
