//! Unit quaternions for rotations.
//!
//! A [`Quaternion`] is a plain value with no change hooks. Objects that
//! cache a matrix derived from a quaternion (see `three-scene`'s `Object3D`)
//! raise their own dirty flag after calling a setter here.
//!
//! # Slerp
//!
//! Two entry points share the same arithmetic:
//!
//! - [`Quaternion::slerp`] mutates a quaternion in place.
//! - [`Quaternion::slerp_flat`] works on raw `[x, y, z, w]` runs inside flat
//!   `f64` buffers (animation tracks, skinning palettes) without building
//!   quaternion values.
//!
//! Both produce bit-identical results for the same inputs.

use std::fmt;

use crate::{Euler, Matrix4, RotationOrder, Vector3, EPSILON};

/// A quaternion `x*i + y*j + z*k + w`.
///
/// Unit length is expected for rotations but never enforced; call
/// [`normalize`](Self::normalize) where it matters.
///
/// # Example
///
/// ```rust
/// use three_math::{Quaternion, Vector3};
///
/// let mut q = Quaternion::IDENTITY;
/// q.set_from_axis_angle(Vector3::Y, std::f64::consts::PI);
///
/// let mut v = Vector3::X;
/// v.apply_quaternion(q);
/// assert!((v.x + 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quaternion {
    /// Vector part, i
    pub x: f64,
    /// Vector part, j
    pub y: f64,
    /// Vector part, k
    pub z: f64,
    /// Scalar part
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The identity rotation `(0, 0, 0, 1)`.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Creates from `[x, y, z, w]`.
    #[inline]
    pub const fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Converts to `[x, y, z, w]`.
    #[inline]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Reads `[x, y, z, w]` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `array` holds fewer than `offset + 4` values.
    pub fn from_slice(&mut self, array: &[f64], offset: usize) -> &mut Self {
        self.set(array[offset], array[offset + 1], array[offset + 2], array[offset + 3])
    }

    /// Writes `[x, y, z, w]` into `target` starting at `offset`.
    pub fn write_to_slice(self, target: &mut [f64], offset: usize) {
        target[offset..offset + 4].copy_from_slice(&self.to_array());
    }

    /// Sets all components.
    #[inline]
    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        *self = Self::new(x, y, z, w);
        self
    }

    /// Sets from Euler angles, honoring the Euler rotation order.
    pub fn set_from_euler(&mut self, euler: &Euler) -> &mut Self {
        let (c1, s1) = ((euler.x / 2.0).cos(), (euler.x / 2.0).sin());
        let (c2, s2) = ((euler.y / 2.0).cos(), (euler.y / 2.0).sin());
        let (c3, s3) = ((euler.z / 2.0).cos(), (euler.z / 2.0).sin());

        let (x, y, z, w) = match euler.order {
            RotationOrder::XYZ => (
                s1 * c2 * c3 + c1 * s2 * s3,
                c1 * s2 * c3 - s1 * c2 * s3,
                c1 * c2 * s3 + s1 * s2 * c3,
                c1 * c2 * c3 - s1 * s2 * s3,
            ),
            RotationOrder::YXZ => (
                s1 * c2 * c3 + c1 * s2 * s3,
                c1 * s2 * c3 - s1 * c2 * s3,
                c1 * c2 * s3 - s1 * s2 * c3,
                c1 * c2 * c3 + s1 * s2 * s3,
            ),
            RotationOrder::ZXY => (
                s1 * c2 * c3 - c1 * s2 * s3,
                c1 * s2 * c3 + s1 * c2 * s3,
                c1 * c2 * s3 + s1 * s2 * c3,
                c1 * c2 * c3 - s1 * s2 * s3,
            ),
            RotationOrder::ZYX => (
                s1 * c2 * c3 - c1 * s2 * s3,
                c1 * s2 * c3 + s1 * c2 * s3,
                c1 * c2 * s3 - s1 * s2 * c3,
                c1 * c2 * c3 + s1 * s2 * s3,
            ),
            RotationOrder::YZX => (
                s1 * c2 * c3 + c1 * s2 * s3,
                c1 * s2 * c3 + s1 * c2 * s3,
                c1 * c2 * s3 - s1 * s2 * c3,
                c1 * c2 * c3 - s1 * s2 * s3,
            ),
            RotationOrder::XZY => (
                s1 * c2 * c3 - c1 * s2 * s3,
                c1 * s2 * c3 - s1 * c2 * s3,
                c1 * c2 * s3 + s1 * s2 * c3,
                c1 * c2 * c3 + s1 * s2 * s3,
            ),
        };

        self.set(x, y, z, w)
    }

    /// Sets from a normalized `axis` and an `angle` in radians.
    pub fn set_from_axis_angle(&mut self, axis: Vector3, angle: f64) -> &mut Self {
        let half = angle / 2.0;
        let s = half.sin();
        self.set(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Extracts the rotation from the upper 3x3 of `m`, which must be
    /// unscaled.
    ///
    /// Picks the branch with the largest diagonal term so the divisor never
    /// approaches zero.
    pub fn set_from_rotation_matrix(&mut self, m: &Matrix4) -> &mut Self {
        let te = &m.elements;

        let (m11, m12, m13) = (te[0], te[4], te[8]);
        let (m21, m22, m23) = (te[1], te[5], te[9]);
        let (m31, m32, m33) = (te[2], te[6], te[10]);

        let trace = m11 + m22 + m33;

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            self.set((m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s)
        } else if m11 > m22 && m11 > m33 {
            let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
            self.set(0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s)
        } else if m22 > m33 {
            let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
            self.set((m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s)
        } else {
            let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
            self.set((m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s)
        }
    }

    /// Shortest rotation taking unit vector `from` onto unit vector `to`.
    pub fn set_from_unit_vectors(&mut self, from: Vector3, to: Vector3) -> &mut Self {
        const EPS: f64 = 0.000001;

        let mut axis = Vector3::ZERO;
        let mut r = from.dot(to) + 1.0;

        if r < EPS {
            // opposite vectors: any axis orthogonal to `from` works
            r = 0.0;
            if from.x.abs() > from.z.abs() {
                axis.set(-from.y, from.x, 0.0);
            } else {
                axis.set(0.0, -from.z, from.y);
            }
        } else {
            axis.cross_vectors(from, to);
        }

        self.set(axis.x, axis.y, axis.z, r).normalize()
    }

    /// Inverts the rotation (conjugate, then normalize).
    pub fn inverse(&mut self) -> &mut Self {
        self.conjugate().normalize()
    }

    /// Negates the vector part.
    pub fn conjugate(&mut self) -> &mut Self {
        self.x *= -1.0;
        self.y *= -1.0;
        self.z *= -1.0;
        self
    }

    /// Four-component dot product.
    #[inline]
    pub fn dot(&self, q: Quaternion) -> f64 {
        self.x * q.x + self.y * q.y + self.z * q.z + self.w * q.w
    }

    /// Squared length.
    #[inline]
    pub fn length_sq(&self) -> f64 {
        self.dot(*self)
    }

    /// Length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_sq().sqrt()
    }

    /// Scales to unit length. A zero quaternion becomes the identity.
    pub fn normalize(&mut self) -> &mut Self {
        let l = self.length();

        if l == 0.0 {
            *self = Self::IDENTITY;
            self
        } else {
            let l = 1.0 / l;
            self.set(self.x * l, self.y * l, self.z * l, self.w * l)
        }
    }

    /// `self = self * q`.
    pub fn multiply(&mut self, q: Quaternion) -> &mut Self {
        let a = *self;
        self.multiply_quaternions(a, q)
    }

    /// `self = q * self`.
    pub fn premultiply(&mut self, q: Quaternion) -> &mut Self {
        let b = *self;
        self.multiply_quaternions(q, b)
    }

    /// `self = a * b`.
    pub fn multiply_quaternions(&mut self, a: Quaternion, b: Quaternion) -> &mut Self {
        let (qax, qay, qaz, qaw) = (a.x, a.y, a.z, a.w);
        let (qbx, qby, qbz, qbw) = (b.x, b.y, b.z, b.w);

        self.set(
            qax * qbw + qaw * qbx + qay * qbz - qaz * qby,
            qay * qbw + qaw * qby + qaz * qbx - qax * qbz,
            qaz * qbw + qaw * qbz + qax * qby - qay * qbx,
            qaw * qbw - qax * qbx - qay * qby - qaz * qbz,
        )
    }

    /// Spherical interpolation from `self` toward `qb`.
    ///
    /// `t == 0` leaves `self` untouched and `t == 1` copies `qb` exactly.
    /// The shorter arc is taken. Nearly parallel inputs fall back to a
    /// normalized lerp.
    pub fn slerp(&mut self, qb: Quaternion, t: f64) -> &mut Self {
        let [x, y, z, w] = slerp_components(self.to_array(), qb.to_array(), t);
        self.set(x, y, z, w)
    }

    /// Returns the interpolation between `qa` and `qb`, leaving both alone.
    pub fn slerp_quaternions(qa: Quaternion, qb: Quaternion, t: f64) -> Quaternion {
        let mut qm = qa;
        qm.slerp(qb, t);
        qm
    }

    /// Slerp over flat buffers.
    ///
    /// Reads `[x, y, z, w]` runs from `src0[src_offset0..]` and
    /// `src1[src_offset1..]` and writes the result to `dst[dst_offset..]`.
    ///
    /// # Panics
    ///
    /// Panics if any slice holds fewer than `offset + 4` values.
    pub fn slerp_flat(
        dst: &mut [f64],
        dst_offset: usize,
        src0: &[f64],
        src_offset0: usize,
        src1: &[f64],
        src_offset1: usize,
        t: f64,
    ) {
        let a = read4(src0, src_offset0);
        let b = read4(src1, src_offset1);
        dst[dst_offset..dst_offset + 4].copy_from_slice(&slerp_components(a, b, t));
    }
}

#[inline]
fn read4(src: &[f64], offset: usize) -> [f64; 4] {
    [src[offset], src[offset + 1], src[offset + 2], src[offset + 3]]
}

fn slerp_components(a: [f64; 4], b: [f64; 4], t: f64) -> [f64; 4] {
    if t == 0.0 || a == b {
        return a;
    }
    if t == 1.0 {
        return b;
    }

    let cos = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];
    let dir = if cos < 0.0 { -1.0 } else { 1.0 };

    if cos * dir >= 1.0 {
        return a;
    }

    let sqr_sin = 1.0 - cos * cos;

    let (s, t, lerped) = if sqr_sin > EPSILON {
        let sin = sqr_sin.sqrt();
        let len = sin.atan2(cos * dir);
        (((1.0 - t) * len).sin() / sin, (t * len).sin() / sin, false)
    } else {
        // tiny step: plain lerp, renormalized below
        (1.0 - t, t, true)
    };

    let t_dir = t * dir;
    let mut out = [
        a[0] * s + b[0] * t_dir,
        a[1] * s + b[1] * t_dir,
        a[2] * s + b[2] * t_dir,
        a[3] * s + b[3] * t_dir,
    ];

    if lerped {
        let f = 1.0 / out.iter().map(|c| c * c).sum::<f64>().sqrt();
        out.iter_mut().for_each(|c| *c *= f);
    }

    out
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl From<glam::DQuat> for Quaternion {
    fn from(q: glam::DQuat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

impl From<Quaternion> for glam::DQuat {
    fn from(q: Quaternion) -> Self {
        glam::DQuat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}
