//! Transform node: position, rotation and scale plus cached matrices.
//!
//! Rotation is stored twice, as an [`Euler`] and as a [`Quaternion`]. The
//! setters here write both and raise the dirty flag, so the two never drift
//! apart and the next [`Object3D::update_matrix`] picks the change up.

use std::sync::Arc;

use three_core::BufferGeometry;
use three_math::{Euler, Matrix4, Quaternion, Vector3, generate_uuid};

use crate::Result;

/// Renderable payload of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data, shareable between meshes
    pub geometry: Arc<BufferGeometry>,
    /// Material slot used for groupless geometry
    pub material_index: usize,
}

impl Mesh {
    /// Mesh drawing `geometry` with material 0.
    pub fn new(geometry: Arc<BufferGeometry>) -> Self {
        Self { geometry, material_index: 0 }
    }
}

/// A node's local transform and the matrices derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Object3D {
    /// Free-form label
    pub name: String,
    uuid: String,
    position: Vector3,
    rotation: Euler,
    quaternion: Quaternion,
    scale: Vector3,
    /// Up direction used by [`Object3D::look_at`]
    pub up: Vector3,
    matrix: Matrix4,
    matrix_world: Matrix4,
    /// Recompose [`Object3D::matrix`] on every world update
    pub matrix_auto_update: bool,
    matrix_world_needs_update: bool,
    /// Hidden objects and their children are skipped by renderers
    pub visible: bool,
    /// Geometry to draw, if any
    pub mesh: Option<Mesh>,
}

impl Default for Object3D {
    fn default() -> Self {
        Self::new()
    }
}

impl Object3D {
    /// Identity transform, visible, no mesh.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            uuid: generate_uuid(),
            position: Vector3::ZERO,
            rotation: Euler::default(),
            quaternion: Quaternion::IDENTITY,
            scale: Vector3::ONE,
            up: Vector3::Y,
            matrix: Matrix4::IDENTITY,
            matrix_world: Matrix4::IDENTITY,
            matrix_auto_update: true,
            matrix_world_needs_update: false,
            visible: true,
            mesh: None,
        }
    }

    /// Named empty object.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::new() }
    }

    /// Object drawing `mesh`.
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self { mesh: Some(mesh), ..Self::named(name) }
    }

    /// Unique identifier.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Local position.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Local rotation as Euler angles.
    pub fn rotation(&self) -> Euler {
        self.rotation
    }

    /// Local rotation as a quaternion.
    pub fn quaternion(&self) -> Quaternion {
        self.quaternion
    }

    /// Local scale.
    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    /// Local transform from the last [`Self::update_matrix`].
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// World transform from the last world update.
    pub fn matrix_world(&self) -> &Matrix4 {
        &self.matrix_world
    }

    /// Whether the world matrix is stale.
    pub fn matrix_world_needs_update(&self) -> bool {
        self.matrix_world_needs_update
    }

    fn mark_dirty(&mut self) {
        self.matrix_world_needs_update = true;
    }

    /// Sets the local position.
    pub fn set_position(&mut self, position: Vector3) -> &mut Self {
        self.position = position;
        self.mark_dirty();
        self
    }

    /// Sets the local scale.
    pub fn set_scale(&mut self, scale: Vector3) -> &mut Self {
        self.scale = scale;
        self.mark_dirty();
        self
    }

    /// Sets the rotation from Euler angles.
    pub fn set_rotation_from_euler(&mut self, euler: &Euler) -> &mut Self {
        self.rotation = *euler;
        self.quaternion.set_from_euler(euler);
        self.mark_dirty();
        self
    }

    /// Sets the rotation from a quaternion, keeping the Euler order.
    pub fn set_rotation_from_quaternion(&mut self, q: Quaternion) -> &mut Self {
        self.quaternion = q;
        self.rotation.set_from_quaternion(q, None);
        self.mark_dirty();
        self
    }

    /// Sets the rotation to `angle` radians about the normalized `axis`.
    pub fn set_rotation_from_axis_angle(&mut self, axis: Vector3, angle: f64) -> &mut Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_axis_angle(axis, angle);
        self.set_rotation_from_quaternion(q)
    }

    /// Sets the rotation from the upper 3x3 of `m`, which must be a pure
    /// (unscaled) rotation.
    pub fn set_rotation_from_matrix(&mut self, m: &Matrix4) -> &mut Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_rotation_matrix(m);
        self.set_rotation_from_quaternion(q)
    }

    /// Rotates about a local `axis` (normalized).
    pub fn rotate_on_axis(&mut self, axis: Vector3, angle: f64) -> &mut Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_axis_angle(axis, angle);
        let mut rotated = self.quaternion;
        rotated.multiply(q);
        self.set_rotation_from_quaternion(rotated)
    }

    /// Rotates about the local X axis.
    pub fn rotate_x(&mut self, angle: f64) -> &mut Self {
        self.rotate_on_axis(Vector3::X, angle)
    }

    /// Rotates about the local Y axis.
    pub fn rotate_y(&mut self, angle: f64) -> &mut Self {
        self.rotate_on_axis(Vector3::Y, angle)
    }

    /// Rotates about the local Z axis.
    pub fn rotate_z(&mut self, angle: f64) -> &mut Self {
        self.rotate_on_axis(Vector3::Z, angle)
    }

    /// Moves `distance` along a local `axis` (normalized).
    pub fn translate_on_axis(&mut self, axis: Vector3, distance: f64) -> &mut Self {
        let mut v = axis;
        v.apply_quaternion(self.quaternion);
        let mut position = self.position;
        position.add_scaled_vector(v, distance);
        self.set_position(position)
    }

    /// Turns the object so its local +Z axis faces `target`.
    ///
    /// `target` is in the parent's space. Cameras face the other way and
    /// use their own `look_at`.
    pub fn look_at(&mut self, target: Vector3) -> &mut Self {
        let mut m = Matrix4::IDENTITY;
        m.look_at(target, self.position, self.up);
        self.set_rotation_from_matrix(&m)
    }

    /// Turns the object so its local -Z axis faces `target`.
    pub(crate) fn look_at_from_eye(&mut self, target: Vector3) -> &mut Self {
        let mut m = Matrix4::IDENTITY;
        m.look_at(self.position, target, self.up);
        self.set_rotation_from_matrix(&m)
    }

    /// Composes [`Self::matrix`] from position, quaternion and scale.
    pub fn update_matrix(&mut self) -> &mut Self {
        self.matrix.compose(self.position, self.quaternion, self.scale);
        self.matrix_world_needs_update = true;
        self
    }

    /// Replaces the local matrix and decomposes it into position, rotation
    /// and scale.
    pub fn apply_matrix(&mut self, m: &Matrix4) -> &mut Self {
        let mut combined = Matrix4::IDENTITY;
        combined.multiply_matrices(m, &self.matrix);
        let (position, quaternion, scale) = combined.decompose();
        self.matrix = combined;
        self.position = position;
        self.scale = scale;
        self.set_rotation_from_quaternion(quaternion)
    }

    /// Refreshes the world matrix from `parent_world`.
    ///
    /// Returns `true` if the world matrix was rewritten; children must then
    /// be refreshed as well.
    pub fn update_matrix_world(&mut self, parent_world: Option<&Matrix4>, force: bool) -> bool {
        if self.matrix_auto_update {
            self.update_matrix();
        }
        if !(self.matrix_world_needs_update || force) {
            return false;
        }
        match parent_world {
            Some(parent) => {
                self.matrix_world.multiply_matrices(parent, &self.matrix);
            }
            None => self.matrix_world = self.matrix,
        }
        self.matrix_world_needs_update = false;
        true
    }

    /// World position from the last world update.
    pub fn world_position(&self) -> Vector3 {
        let mut p = Vector3::ZERO;
        p.set_from_matrix_position(&self.matrix_world);
        p
    }

    /// Maps a local point to world space.
    pub fn local_to_world(&self, point: Vector3) -> Vector3 {
        let mut p = point;
        p.apply_matrix4(&self.matrix_world);
        p
    }

    /// Maps a world point to local space.
    ///
    /// # Errors
    ///
    /// [`three_math::Error::SingularMatrix`] if the world matrix has a zero
    /// scale.
    pub fn world_to_local(&self, point: Vector3) -> Result<Vector3> {
        let mut inverse = Matrix4::IDENTITY;
        inverse.try_get_inverse(&self.matrix_world)?;
        let mut p = point;
        p.apply_matrix4(&inverse);
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;
    use three_math::RotationOrder;

    #[test]
    fn test_defaults() {
        let o = Object3D::named("root");
        assert_eq!(o.name, "root");
        assert_eq!(o.scale(), Vector3::ONE);
        assert_eq!(o.quaternion(), Quaternion::IDENTITY);
        assert!(o.visible && o.matrix_auto_update);
        assert!(!o.matrix_world_needs_update());
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut o = Object3D::new();
        o.set_position(Vector3::new(1.0, 2.0, 3.0));
        assert!(o.matrix_world_needs_update());

        o.update_matrix_world(None, false);
        assert!(!o.matrix_world_needs_update());
        assert_eq!(o.world_position(), Vector3::new(1.0, 2.0, 3.0));

        o.set_rotation_from_euler(&Euler::new(0.0, FRAC_PI_2, 0.0, RotationOrder::XYZ));
        assert!(o.matrix_world_needs_update());
    }

    #[test]
    fn test_rotation_representations_stay_in_sync() {
        let mut o = Object3D::new();
        o.set_rotation_from_axis_angle(Vector3::Z, FRAC_PI_2);
        assert_abs_diff_eq!(o.rotation().z, FRAC_PI_2, epsilon = 1e-12);

        let euler = Euler::new(0.3, -0.2, 0.1, RotationOrder::YXZ);
        o.set_rotation_from_euler(&euler);
        let mut expected = Quaternion::IDENTITY;
        expected.set_from_euler(&euler);
        assert_eq!(o.quaternion(), expected);
        assert_eq!(o.rotation().order, RotationOrder::YXZ);
    }

    #[test]
    fn test_update_matrix_composes() {
        let mut o = Object3D::new();
        o.set_position(Vector3::new(5.0, 0.0, 0.0))
            .set_scale(Vector3::splat(2.0))
            .rotate_z(FRAC_PI_2);
        o.update_matrix();

        let mut p = Vector3::X;
        p.apply_matrix4(o.matrix());
        assert_abs_diff_eq!(p.to_array()[..], [5.0, 2.0, 0.0][..], epsilon = 1e-12);
    }

    #[test]
    fn test_translate_on_axis_uses_rotation() {
        let mut o = Object3D::new();
        o.rotate_y(FRAC_PI_2);
        o.translate_on_axis(Vector3::Z, 2.0);
        assert_abs_diff_eq!(o.position().to_array()[..], [2.0, 0.0, 0.0][..], epsilon = 1e-12);
    }

    #[test]
    fn test_look_at() {
        let mut o = Object3D::new();
        o.look_at(Vector3::new(0.0, 0.0, -4.0));
        o.update_matrix();

        let mut forward = Vector3::Z;
        forward.transform_direction(o.matrix());
        assert_abs_diff_eq!(forward.to_array()[..], [0.0, 0.0, -1.0][..], epsilon = 1e-12);
    }

    #[test]
    fn test_world_local_round_trip() {
        let mut o = Object3D::new();
        o.set_position(Vector3::new(1.0, -1.0, 2.0)).set_scale(Vector3::new(2.0, 1.0, 0.5));
        o.update_matrix_world(None, false);

        let p = Vector3::new(0.5, 0.5, 0.5);
        let world = o.local_to_world(p);
        let back = o.world_to_local(world).unwrap();
        assert_abs_diff_eq!(back.to_array()[..], p.to_array()[..], epsilon = 1e-12);

        o.set_scale(Vector3::new(1.0, 0.0, 1.0)).update_matrix_world(None, false);
        assert_eq!(
            o.world_to_local(world),
            Err(crate::Error::Math(three_math::Error::SingularMatrix))
        );
    }

    #[test]
    fn test_apply_matrix_decomposes() {
        let mut o = Object3D::new();
        let mut m = Matrix4::IDENTITY;
        m.make_translation(0.0, 3.0, 0.0);
        o.apply_matrix(&m);
        assert_eq!(o.position(), Vector3::new(0.0, 3.0, 0.0));
        assert!(o.matrix_world_needs_update());
    }
}
