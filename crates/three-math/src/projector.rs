//! Camera capability used by [`Vector3::project`](crate::Vector3::project).

use crate::Matrix4;

/// Something that maps world space to clip space.
///
/// Cameras in `three-scene` implement this. The view matrix is the inverse
/// of [`Projector::matrix_world`].
pub trait Projector {
    /// View to clip space transform.
    fn projection_matrix(&self) -> Matrix4;

    /// Camera to world space transform.
    fn matrix_world(&self) -> Matrix4;
}
