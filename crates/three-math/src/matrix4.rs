//! 4x4 matrices for affine transforms and projections.
//!
//! # Storage
//!
//! `elements` is **column-major**: element `(row, col)` lives at
//! `elements[col * 4 + row]`. This is the layout graphics APIs expect for
//! uniform upload, see [`Matrix4::to_array32`].
//!
//! [`Matrix4::set`] takes its sixteen arguments in **row-major** reading
//! order so literal matrices read naturally in source:
//!
//! ```rust
//! use three_math::Matrix4;
//!
//! let mut m = Matrix4::IDENTITY;
//! m.set(
//!     1.0, 0.0, 0.0, 5.0,
//!     0.0, 1.0, 0.0, 6.0,
//!     0.0, 0.0, 1.0, 7.0,
//!     0.0, 0.0, 0.0, 1.0,
//! );
//! assert_eq!(m.elements[12], 5.0);
//! ```
//!
//! # Inversion
//!
//! Both inverse variants use the closed-form cofactor expansion:
//!
//! - [`Matrix4::try_get_inverse`] returns [`Error::SingularMatrix`] when the
//!   determinant is exactly zero.
//! - [`Matrix4::get_inverse`] resets the receiver to identity instead.

use std::fmt;

use crate::{max_of, Error, Euler, Quaternion, Result, RotationOrder, Vector3, DEG2RAD};

/// A 4x4 `f64` matrix in column-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Matrix4 {
    /// Column-major elements.
    pub elements: [f64; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self::from_array([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// All zeros.
    pub const ZERO: Self = Self::from_array([0.0; 16]);

    /// Creates from column-major elements.
    #[inline]
    pub const fn from_array(elements: [f64; 16]) -> Self {
        Self { elements }
    }

    /// Column-major elements.
    #[inline]
    pub const fn to_array(&self) -> [f64; 16] {
        self.elements
    }

    /// Column-major elements narrowed to `f32`, ready for uniform upload.
    pub fn to_array32(&self) -> [f32; 16] {
        self.elements.map(|e| e as f32)
    }

    /// Reads sixteen column-major values starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `array` holds fewer than `offset + 16` values.
    pub fn from_slice(&mut self, array: &[f64], offset: usize) -> &mut Self {
        self.elements.copy_from_slice(&array[offset..offset + 16]);
        self
    }

    /// Writes the column-major elements into `target` at `offset`.
    pub fn write_to_slice(&self, target: &mut [f64], offset: usize) {
        target[offset..offset + 16].copy_from_slice(&self.elements);
    }

    /// Sets all elements from row-major arguments.
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub fn set(
        &mut self,
        n11: f64, n12: f64, n13: f64, n14: f64,
        n21: f64, n22: f64, n23: f64, n24: f64,
        n31: f64, n32: f64, n33: f64, n34: f64,
        n41: f64, n42: f64, n43: f64, n44: f64,
    ) -> &mut Self {
        self.elements = [
            n11, n21, n31, n41,
            n12, n22, n32, n42,
            n13, n23, n33, n43,
            n14, n24, n34, n44,
        ];
        self
    }

    /// Resets to identity.
    pub fn identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Copies only the translation column of `m`.
    pub fn copy_position(&mut self, m: &Matrix4) -> &mut Self {
        self.elements[12..15].copy_from_slice(&m.elements[12..15]);
        self
    }

    /// Returns the three basis columns.
    pub fn extract_basis(&self) -> (Vector3, Vector3, Vector3) {
        let mut x = Vector3::ZERO;
        let mut y = Vector3::ZERO;
        let mut z = Vector3::ZERO;
        x.set_from_matrix_column(self, 0);
        y.set_from_matrix_column(self, 1);
        z.set_from_matrix_column(self, 2);
        (x, y, z)
    }

    /// Builds a rotation/scale matrix whose columns are the given axes.
    #[rustfmt::skip]
    pub fn make_basis(&mut self, x_axis: Vector3, y_axis: Vector3, z_axis: Vector3) -> &mut Self {
        self.set(
            x_axis.x, y_axis.x, z_axis.x, 0.0,
            x_axis.y, y_axis.y, z_axis.y, 0.0,
            x_axis.z, y_axis.z, z_axis.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Sets the upper 3x3 to the rotation part of `m` (columns rescaled to
    /// unit length). Translation and the bottom row are left untouched.
    pub fn extract_rotation(&mut self, m: &Matrix4) -> &mut Self {
        let mut v = Vector3::ZERO;
        let me = m.elements;

        let scale_x = 1.0 / v.set_from_matrix_column(m, 0).length();
        let scale_y = 1.0 / v.set_from_matrix_column(m, 1).length();
        let scale_z = 1.0 / v.set_from_matrix_column(m, 2).length();

        let te = &mut self.elements;
        for (col, scale) in [(0, scale_x), (1, scale_y), (2, scale_z)] {
            for row in 0..3 {
                te[col * 4 + row] = me[col * 4 + row] * scale;
            }
        }
        self
    }

    /// Rotation matrix equivalent to applying the three elementary rotations
    /// in the Euler's order. Translation is cleared.
    pub fn make_rotation_from_euler(&mut self, euler: &Euler) -> &mut Self {
        let (a, b) = (euler.x.cos(), euler.x.sin());
        let (c, d) = (euler.y.cos(), euler.y.sin());
        let (e, f) = (euler.z.cos(), euler.z.sin());

        let te = &mut self.elements;

        match euler.order {
            RotationOrder::XYZ => {
                let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);

                te[0] = c * e;
                te[4] = -c * f;
                te[8] = d;

                te[1] = af + be * d;
                te[5] = ae - bf * d;
                te[9] = -b * c;

                te[2] = bf - ae * d;
                te[6] = be + af * d;
                te[10] = a * c;
            }
            RotationOrder::YXZ => {
                let (ce, cf, de, df) = (c * e, c * f, d * e, d * f);

                te[0] = ce + df * b;
                te[4] = de * b - cf;
                te[8] = a * d;

                te[1] = a * f;
                te[5] = a * e;
                te[9] = -b;

                te[2] = cf * b - de;
                te[6] = df + ce * b;
                te[10] = a * c;
            }
            RotationOrder::ZXY => {
                let (ce, cf, de, df) = (c * e, c * f, d * e, d * f);

                te[0] = ce - df * b;
                te[4] = -a * f;
                te[8] = de + cf * b;

                te[1] = cf + de * b;
                te[5] = a * e;
                te[9] = df - ce * b;

                te[2] = -a * d;
                te[6] = b;
                te[10] = a * c;
            }
            RotationOrder::ZYX => {
                let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);

                te[0] = c * e;
                te[4] = be * d - af;
                te[8] = ae * d + bf;

                te[1] = c * f;
                te[5] = bf * d + ae;
                te[9] = af * d - be;

                te[2] = -d;
                te[6] = b * c;
                te[10] = a * c;
            }
            RotationOrder::YZX => {
                let (ac, ad, bc, bd) = (a * c, a * d, b * c, b * d);

                te[0] = c * e;
                te[4] = bd - ac * f;
                te[8] = bc * f + ad;

                te[1] = f;
                te[5] = a * e;
                te[9] = -b * e;

                te[2] = -d * e;
                te[6] = ad * f + bc;
                te[10] = ac - bd * f;
            }
            RotationOrder::XZY => {
                let (ac, ad, bc, bd) = (a * c, a * d, b * c, b * d);

                te[0] = c * e;
                te[4] = -f;
                te[8] = d * e;

                te[1] = ac * f + bd;
                te[5] = a * e;
                te[9] = ad * f - bc;

                te[2] = bc * f - ad;
                te[6] = b * e;
                te[10] = bd * f + ac;
            }
        }

        self.clear_affine_border();
        self
    }

    /// Rotation matrix from a unit quaternion. Translation is cleared.
    pub fn make_rotation_from_quaternion(&mut self, q: Quaternion) -> &mut Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        let te = &mut self.elements;

        te[0] = 1.0 - (yy + zz);
        te[4] = xy - wz;
        te[8] = xz + wy;

        te[1] = xy + wz;
        te[5] = 1.0 - (xx + zz);
        te[9] = yz - wx;

        te[2] = xz - wy;
        te[6] = yz + wx;
        te[10] = 1.0 - (xx + yy);

        self.clear_affine_border();
        self
    }

    /// Zeroes the last row's xyz and the translation, sets `[15] = 1`.
    fn clear_affine_border(&mut self) {
        let te = &mut self.elements;
        te[3] = 0.0;
        te[7] = 0.0;
        te[11] = 0.0;
        te[12] = 0.0;
        te[13] = 0.0;
        te[14] = 0.0;
        te[15] = 1.0;
    }

    /// Sets the rotation part so that -Z points from `eye` toward `target`.
    ///
    /// Translation is left untouched. Degenerate inputs are nudged rather
    /// than producing `NaN`: a zero view direction becomes +Z and an `up`
    /// parallel to the view direction gets a tiny z offset.
    pub fn look_at(&mut self, eye: Vector3, target: Vector3, up: Vector3) -> &mut Self {
        let mut x = Vector3::ZERO;
        let mut y = Vector3::ZERO;
        let mut z = Vector3::ZERO;

        z.sub_vectors(eye, target).normalize();
        if z.length_sq() == 0.0 {
            z.z = 1.0;
        }

        x.cross_vectors(up, z).normalize();
        if x.length_sq() == 0.0 {
            z.z += 0.0001;
            x.cross_vectors(up, z).normalize();
        }

        y.cross_vectors(z, x);

        let te = &mut self.elements;
        te[0] = x.x;
        te[4] = y.x;
        te[8] = z.x;
        te[1] = x.y;
        te[5] = y.y;
        te[9] = z.y;
        te[2] = x.z;
        te[6] = y.z;
        te[10] = z.z;
        self
    }

    /// `self = self * m`.
    pub fn multiply(&mut self, m: &Matrix4) -> &mut Self {
        let a = *self;
        self.multiply_matrices(&a, m)
    }

    /// `self = m * self`.
    pub fn premultiply(&mut self, m: &Matrix4) -> &mut Self {
        let b = *self;
        self.multiply_matrices(m, &b)
    }

    /// `self = a * b`.
    ///
    /// Operands are copied into locals before any write, so passing copies
    /// of the receiver (`let a = m; m.multiply_matrices(&a, &a)`) is safe.
    pub fn multiply_matrices(&mut self, a: &Matrix4, b: &Matrix4) -> &mut Self {
        let ae = a.elements;
        let be = b.elements;
        let mut out = [0.0; 16];

        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = ae[row] * be[col * 4]
                    + ae[4 + row] * be[col * 4 + 1]
                    + ae[8 + row] * be[col * 4 + 2]
                    + ae[12 + row] * be[col * 4 + 3];
            }
        }

        self.elements = out;
        self
    }

    /// Multiplies every element by `s`.
    pub fn multiply_scalar(&mut self, s: f64) -> &mut Self {
        self.elements.iter_mut().for_each(|e| *e *= s);
        self
    }

    /// Determinant by cofactor expansion along the bottom row.
    pub fn determinant(&self) -> f64 {
        let te = &self.elements;

        let (n11, n12, n13, n14) = (te[0], te[4], te[8], te[12]);
        let (n21, n22, n23, n24) = (te[1], te[5], te[9], te[13]);
        let (n31, n32, n33, n34) = (te[2], te[6], te[10], te[14]);
        let (n41, n42, n43, n44) = (te[3], te[7], te[11], te[15]);

        n41 * (n14 * n23 * n32 - n13 * n24 * n32 - n14 * n22 * n33
            + n12 * n24 * n33
            + n13 * n22 * n34
            - n12 * n23 * n34)
            + n42
                * (n11 * n23 * n34 - n11 * n24 * n33 + n14 * n21 * n33 - n13 * n21 * n34
                    + n13 * n24 * n31
                    - n14 * n23 * n31)
            + n43
                * (n11 * n24 * n32 - n11 * n22 * n34 - n14 * n21 * n32
                    + n12 * n21 * n34
                    + n14 * n22 * n31
                    - n12 * n24 * n31)
            + n44
                * (-n13 * n22 * n31 - n11 * n23 * n32 + n11 * n22 * n33 + n13 * n21 * n32
                    - n12 * n21 * n33
                    + n12 * n23 * n31)
    }

    /// Transposes in place.
    pub fn transpose(&mut self) -> &mut Self {
        let te = &mut self.elements;
        te.swap(1, 4);
        te.swap(2, 8);
        te.swap(6, 9);
        te.swap(3, 12);
        te.swap(7, 13);
        te.swap(11, 14);
        self
    }

    /// Overwrites the translation column.
    pub fn set_position(&mut self, v: Vector3) -> &mut Self {
        self.elements[12] = v.x;
        self.elements[13] = v.y;
        self.elements[14] = v.z;
        self
    }

    /// Sets `self` to the inverse of `m`, or to identity if `m` is singular.
    pub fn get_inverse(&mut self, m: &Matrix4) -> &mut Self {
        if self.try_get_inverse(m).is_err() {
            self.identity();
        }
        self
    }

    /// Sets `self` to the inverse of `m`.
    ///
    /// # Errors
    ///
    /// [`Error::SingularMatrix`] if the determinant of `m` is exactly zero.
    /// `self` is left unchanged in that case.
    pub fn try_get_inverse(&mut self, m: &Matrix4) -> Result<&mut Self> {
        let me = &m.elements;

        let (n11, n21, n31, n41) = (me[0], me[1], me[2], me[3]);
        let (n12, n22, n32, n42) = (me[4], me[5], me[6], me[7]);
        let (n13, n23, n33, n43) = (me[8], me[9], me[10], me[11]);
        let (n14, n24, n34, n44) = (me[12], me[13], me[14], me[15]);

        let t11 = n23 * n34 * n42 - n24 * n33 * n42 + n24 * n32 * n43 - n22 * n34 * n43
            - n23 * n32 * n44
            + n22 * n33 * n44;
        let t12 = n14 * n33 * n42 - n13 * n34 * n42 - n14 * n32 * n43 + n12 * n34 * n43
            + n13 * n32 * n44
            - n12 * n33 * n44;
        let t13 = n13 * n24 * n42 - n14 * n23 * n42 + n14 * n22 * n43 - n12 * n24 * n43
            - n13 * n22 * n44
            + n12 * n23 * n44;
        let t14 = n14 * n23 * n32 - n13 * n24 * n32 - n14 * n22 * n33 + n12 * n24 * n33
            + n13 * n22 * n34
            - n12 * n23 * n34;

        let det = n11 * t11 + n21 * t12 + n31 * t13 + n41 * t14;

        if det == 0.0 {
            return Err(Error::SingularMatrix);
        }

        let det_inv = 1.0 / det;
        let te = &mut self.elements;

        te[0] = t11 * det_inv;
        te[1] = (n24 * n33 * n41 - n23 * n34 * n41 - n24 * n31 * n43 + n21 * n34 * n43
            + n23 * n31 * n44
            - n21 * n33 * n44)
            * det_inv;
        te[2] = (n22 * n34 * n41 - n24 * n32 * n41 + n24 * n31 * n42 - n21 * n34 * n42
            - n22 * n31 * n44
            + n21 * n32 * n44)
            * det_inv;
        te[3] = (n23 * n32 * n41 - n22 * n33 * n41 - n23 * n31 * n42 + n21 * n33 * n42
            + n22 * n31 * n43
            - n21 * n32 * n43)
            * det_inv;

        te[4] = t12 * det_inv;
        te[5] = (n13 * n34 * n41 - n14 * n33 * n41 + n14 * n31 * n43 - n11 * n34 * n43
            - n13 * n31 * n44
            + n11 * n33 * n44)
            * det_inv;
        te[6] = (n14 * n32 * n41 - n12 * n34 * n41 - n14 * n31 * n42 + n11 * n34 * n42
            + n12 * n31 * n44
            - n11 * n32 * n44)
            * det_inv;
        te[7] = (n12 * n33 * n41 - n13 * n32 * n41 + n13 * n31 * n42 - n11 * n33 * n42
            - n12 * n31 * n43
            + n11 * n32 * n43)
            * det_inv;

        te[8] = t13 * det_inv;
        te[9] = (n14 * n23 * n41 - n13 * n24 * n41 - n14 * n21 * n43 + n11 * n24 * n43
            + n13 * n21 * n44
            - n11 * n23 * n44)
            * det_inv;
        te[10] = (n12 * n24 * n41 - n14 * n22 * n41 + n14 * n21 * n42 - n11 * n24 * n42
            - n12 * n21 * n44
            + n11 * n22 * n44)
            * det_inv;
        te[11] = (n13 * n22 * n41 - n12 * n23 * n41 - n13 * n21 * n42 + n11 * n23 * n42
            + n12 * n21 * n43
            - n11 * n22 * n43)
            * det_inv;

        te[12] = t14 * det_inv;
        te[13] = (n13 * n24 * n31 - n14 * n23 * n31 + n14 * n21 * n33 - n11 * n24 * n33
            - n13 * n21 * n34
            + n11 * n23 * n34)
            * det_inv;
        te[14] = (n14 * n22 * n31 - n12 * n24 * n31 - n14 * n21 * n32 + n11 * n24 * n32
            + n12 * n21 * n34
            - n11 * n22 * n34)
            * det_inv;
        te[15] = (n12 * n23 * n31 - n13 * n22 * n31 + n13 * n21 * n32 - n11 * n23 * n32
            - n12 * n21 * n33
            + n11 * n22 * n33)
            * det_inv;

        Ok(self)
    }

    /// Scales the first three columns by `v`.
    pub fn scale(&mut self, v: Vector3) -> &mut Self {
        for (col, s) in [(0, v.x), (1, v.y), (2, v.z)] {
            for row in 0..4 {
                self.elements[col * 4 + row] *= s;
            }
        }
        self
    }

    /// Largest basis-column length.
    pub fn get_max_scale_on_axis(&self) -> f64 {
        let te = &self.elements;

        let sx = te[0] * te[0] + te[1] * te[1] + te[2] * te[2];
        let sy = te[4] * te[4] + te[5] * te[5] + te[6] * te[6];
        let sz = te[8] * te[8] + te[9] * te[9] + te[10] * te[10];

        max_of(sx, sy, &[sz]).sqrt()
    }

    /// Pure translation.
    #[rustfmt::skip]
    pub fn make_translation(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set(
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `theta` radians about X.
    #[rustfmt::skip]
    pub fn make_rotation_x(&mut self, theta: f64) -> &mut Self {
        let (c, s) = (theta.cos(), theta.sin());
        self.set(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `theta` radians about Y.
    #[rustfmt::skip]
    pub fn make_rotation_y(&mut self, theta: f64) -> &mut Self {
        let (c, s) = (theta.cos(), theta.sin());
        self.set(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `theta` radians about Z.
    #[rustfmt::skip]
    pub fn make_rotation_z(&mut self, theta: f64) -> &mut Self {
        let (c, s) = (theta.cos(), theta.sin());
        self.set(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `angle` radians about a normalized `axis`.
    #[rustfmt::skip]
    pub fn make_rotation_axis(&mut self, axis: Vector3, angle: f64) -> &mut Self {
        let (c, s) = (angle.cos(), angle.sin());
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let (tx, ty) = (t * x, t * y);

        self.set(
            tx * x + c, tx * y - s * z, tx * z + s * y, 0.0,
            tx * y + s * z, ty * y + c, ty * z - s * x, 0.0,
            tx * z - s * y, ty * z + s * x, t * z * z + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Non-uniform scale.
    #[rustfmt::skip]
    pub fn make_scale(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set(
            x, 0.0, 0.0, 0.0,
            0.0, y, 0.0, 0.0,
            0.0, 0.0, z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Translation * rotation * scale.
    pub fn compose(&mut self, position: Vector3, quaternion: Quaternion, scale: Vector3) -> &mut Self {
        self.make_rotation_from_quaternion(quaternion)
            .scale(scale)
            .set_position(position)
    }

    /// Splits an affine matrix into `(position, quaternion, scale)`.
    ///
    /// A negative determinant is attributed to the x scale.
    pub fn decompose(&self) -> (Vector3, Quaternion, Vector3) {
        let mut v = Vector3::ZERO;
        let mut sx = v.set_from_matrix_column(self, 0).length();
        let sy = v.set_from_matrix_column(self, 1).length();
        let sz = v.set_from_matrix_column(self, 2).length();

        if self.determinant() < 0.0 {
            sx = -sx;
        }

        let position = Vector3::new(self.elements[12], self.elements[13], self.elements[14]);

        let mut rotation = *self;
        let (inv_x, inv_y, inv_z) = (1.0 / sx, 1.0 / sy, 1.0 / sz);
        for (col, inv) in [(0, inv_x), (1, inv_y), (2, inv_z)] {
            for row in 0..3 {
                rotation.elements[col * 4 + row] *= inv;
            }
        }

        let mut quaternion = Quaternion::IDENTITY;
        quaternion.set_from_rotation_matrix(&rotation);

        (position, quaternion, Vector3::new(sx, sy, sz))
    }

    /// Perspective projection from explicit frustum planes.
    pub fn make_frustum(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> &mut Self {
        let x = 2.0 * near / (right - left);
        let y = 2.0 * near / (top - bottom);

        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);

        self.elements = [
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            a, b, c, -1.0, //
            0.0, 0.0, d, 0.0,
        ];
        self
    }

    /// Symmetric perspective projection; `fov` is the vertical field of
    /// view in **degrees**.
    pub fn make_perspective(&mut self, fov: f64, aspect: f64, near: f64, far: f64) -> &mut Self {
        let ymax = near * (DEG2RAD * fov * 0.5).tan();
        let ymin = -ymax;
        let xmin = ymin * aspect;
        let xmax = ymax * aspect;

        self.make_frustum(xmin, xmax, ymin, ymax, near, far)
    }

    /// Orthographic projection. Note the `top` before `bottom` argument order.
    pub fn make_orthographic(
        &mut self,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
        near: f64,
        far: f64,
    ) -> &mut Self {
        let w = 1.0 / (right - left);
        let h = 1.0 / (top - bottom);
        let p = 1.0 / (far - near);

        let x = (right + left) * w;
        let y = (top + bottom) * h;
        let z = (far + near) * p;

        self.elements = [
            2.0 * w, 0.0, 0.0, 0.0, //
            0.0, 2.0 * h, 0.0, 0.0, //
            0.0, 0.0, -2.0 * p, 0.0, //
            -x, -y, -z, 1.0,
        ];
        self
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.elements;
        for row in 0..4 {
            writeln!(
                f,
                "[{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
                e[row],
                e[4 + row],
                e[8 + row],
                e[12 + row]
            )?;
        }
        Ok(())
    }
}

impl From<glam::DMat4> for Matrix4 {
    fn from(m: glam::DMat4) -> Self {
        Self::from_array(m.to_cols_array())
    }
}

impl From<Matrix4> for glam::DMat4 {
    fn from(m: Matrix4) -> Self {
        glam::DMat4::from_cols_array(&m.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_matrix_eq(a: &Matrix4, b: &Matrix4, eps: f64) {
        assert_abs_diff_eq!(a.elements[..], b.elements[..], epsilon = eps);
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Matrix4::default(), Matrix4::IDENTITY);
    }

    #[test]
    fn test_set_is_row_major_storage_column_major() {
        let mut m = Matrix4::IDENTITY;
        m.set(
            0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0,
        );
        assert_eq!(
            m.elements,
            [0.0, 4.0, 8.0, 12.0, 1.0, 5.0, 9.0, 13.0, 2.0, 6.0, 10.0, 14.0, 3.0, 7.0, 11.0, 15.0]
        );
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Matrix4::IDENTITY.determinant(), 1.0);
        assert_eq!(Matrix4::ZERO.determinant(), 0.0);

        let mut m = Matrix4::IDENTITY;
        m.set(
            2.0, 3.0, 4.0, 5.0, -1.0, -21.0, -3.0, -4.0, 6.0, 7.0, 8.0, 10.0, -8.0, -9.0, -10.0,
            -12.0,
        );
        assert_eq!(m.determinant(), 76.0);
    }

    #[test]
    fn test_singular_inverse() {
        let mut inv = Matrix4::IDENTITY;
        inv.make_scale(3.0, 3.0, 3.0);
        let before = inv;

        assert_eq!(inv.try_get_inverse(&Matrix4::ZERO).err(), Some(Error::SingularMatrix));
        assert_eq!(inv, before);

        inv.get_inverse(&Matrix4::ZERO);
        assert_eq!(inv, Matrix4::IDENTITY);
    }

    #[test]
    fn test_inverse_identity_property() {
        let mut sources = Vec::new();

        let mut m = Matrix4::IDENTITY;
        sources.push(*m.make_rotation_x(0.3));
        sources.push(*m.make_rotation_y(-0.3));
        sources.push(*m.make_rotation_z(0.5));
        sources.push(*m.make_scale(1.0, 2.0, 3.0));
        sources.push(*m.make_translation(1.0, 2.0, 3.0));
        sources.push(*m.make_rotation_axis(Vector3::new(0.0, 0.6, 0.8), 1.2));
        sources.push(*m.make_perspective(75.0, 1.5, 0.1, 100.0));
        sources.push(*m.make_orthographic(-1.0, 1.0, 1.0, -1.0, 1.0, 100.0));

        for source in sources {
            let mut inv = Matrix4::IDENTITY;
            inv.try_get_inverse(&source).unwrap();

            let mut product = Matrix4::IDENTITY;
            product.multiply_matrices(&source, &inv);
            assert_matrix_eq(&product, &Matrix4::IDENTITY, 1e-4);

            let det_product = source.determinant() * inv.determinant();
            assert!((det_product - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rotation_x_pi_twice_is_identity() {
        let mut a = Matrix4::IDENTITY;
        a.make_rotation_x(PI);
        assert!((a.determinant() - 1.0).abs() < 1e-12);

        let copy = a;
        a.multiply(&copy);
        assert_matrix_eq(&a, &Matrix4::IDENTITY, 1e-12);
    }

    #[test]
    fn test_rotation_determinant_is_one() {
        for order in RotationOrder::ALL {
            let mut m = Matrix4::IDENTITY;
            m.make_rotation_from_euler(&Euler::new(0.4, -1.1, 2.3, order));
            assert!((m.determinant() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_multiply_matrices_order() {
        let mut t = Matrix4::IDENTITY;
        t.make_translation(1.0, 0.0, 0.0);
        let mut r = Matrix4::IDENTITY;
        r.make_rotation_z(FRAC_PI_2);

        // translate after rotating
        let mut tr = Matrix4::IDENTITY;
        tr.multiply_matrices(&t, &r);

        let mut p = Vector3::X;
        p.apply_matrix4(&tr);
        assert_abs_diff_eq!(p.to_array()[..], [1.0, 1.0, 0.0][..], epsilon = 1e-12);

        let mut rt = r;
        rt.premultiply(&t);
        assert_eq!(rt, tr);
    }

    #[test]
    fn test_multiply_with_self_copy() {
        let mut m = Matrix4::IDENTITY;
        m.make_scale(2.0, 3.0, 4.0);
        let a = m;
        m.multiply_matrices(&a, &a);

        let mut expected = Matrix4::IDENTITY;
        expected.make_scale(4.0, 9.0, 16.0);
        assert_eq!(m, expected);
    }

    #[test]
    fn test_transpose() {
        let mut m = Matrix4::IDENTITY;
        m.set(
            0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0,
        );
        let mut t = m;
        t.transpose();
        assert_eq!(
            t.elements,
            [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0]
        );
        t.transpose();
        assert_eq!(t, m);
    }

    #[test]
    fn test_compose_decompose() {
        let position = Vector3::new(1.0, -2.0, 3.0);
        let mut quaternion = Quaternion::IDENTITY;
        quaternion.set_from_euler(&Euler::new(0.2, 0.4, -0.6, RotationOrder::XYZ));
        let scale = Vector3::new(2.0, 0.5, 3.0);

        let mut m = Matrix4::IDENTITY;
        m.compose(position, quaternion, scale);

        let (p, q, s) = m.decompose();
        assert_abs_diff_eq!(p.to_array()[..], position.to_array()[..], epsilon = 1e-12);
        assert_abs_diff_eq!(s.to_array()[..], scale.to_array()[..], epsilon = 1e-12);
        assert!((q.dot(quaternion).abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decompose_negative_scale() {
        let mut m = Matrix4::IDENTITY;
        m.make_scale(-2.0, 1.0, 1.0);

        let (_, q, s) = m.decompose();
        assert_eq!(s, Vector3::new(-2.0, 1.0, 1.0));
        assert_abs_diff_eq!(q.to_array()[..], [0.0, 0.0, 0.0, 1.0][..], epsilon = 1e-12);
    }

    #[test]
    fn test_basis() {
        let mut m = Matrix4::IDENTITY;
        m.make_basis(Vector3::Y, Vector3::Z, Vector3::X);

        let (x, y, z) = m.extract_basis();
        assert_eq!((x, y, z), (Vector3::Y, Vector3::Z, Vector3::X));

        let mut v = Vector3::X;
        v.apply_matrix4(&m);
        assert_eq!(v, Vector3::Y);
    }

    #[test]
    fn test_extract_rotation_removes_scale() {
        let mut rs = Matrix4::IDENTITY;
        rs.make_rotation_y(0.7).scale(Vector3::new(2.0, 3.0, 4.0));

        let mut r = Matrix4::IDENTITY;
        r.extract_rotation(&rs);

        let mut expected = Matrix4::IDENTITY;
        expected.make_rotation_y(0.7);
        assert_matrix_eq(&r, &expected, 1e-12);
    }

    #[test]
    fn test_max_scale_and_position() {
        let mut m = Matrix4::IDENTITY;
        m.make_scale(2.0, -5.0, 3.0).set_position(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.get_max_scale_on_axis(), 5.0);

        let mut other = Matrix4::IDENTITY;
        other.copy_position(&m);
        assert_eq!(&other.elements[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(other.elements[0], 1.0);
    }

    #[test]
    fn test_look_at() {
        let mut m = Matrix4::IDENTITY;
        m.look_at(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), Vector3::Y);
        assert_matrix_eq(&m, &Matrix4::IDENTITY, 1e-12);

        // up parallel to view direction still yields an orthonormal basis
        m.look_at(Vector3::ZERO, Vector3::new(0.0, -1.0, 0.0), Vector3::Y);
        assert!(m.elements.iter().all(|e| !e.is_nan()));
        assert!((m.determinant() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_perspective_projects_near_and_far() {
        let mut m = Matrix4::IDENTITY;
        m.make_perspective(90.0, 1.0, 1.0, 10.0);

        let mut near = Vector3::new(0.0, 0.0, -1.0);
        near.apply_projection(&m);
        assert!((near.z + 1.0).abs() < 1e-12);

        let mut far = Vector3::new(0.0, 0.0, -10.0);
        far.apply_projection(&m);
        assert!((far.z - 1.0).abs() < 1e-12);

        let mut edge = Vector3::new(1.0, 1.0, -1.0);
        edge.apply_projection(&m);
        assert!((edge.x - 1.0).abs() < 1e-12 && (edge.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthographic() {
        let mut m = Matrix4::IDENTITY;
        m.make_orthographic(-2.0, 2.0, 1.0, -1.0, 1.0, 3.0);

        let mut p = Vector3::new(2.0, 1.0, -3.0);
        p.apply_projection(&m);
        assert_abs_diff_eq!(p.to_array()[..], [1.0, 1.0, 1.0][..], epsilon = 1e-12);
    }

    #[test]
    fn test_to_array32() {
        let mut m = Matrix4::IDENTITY;
        m.make_translation(1.5, 2.5, 3.5);
        let a = m.to_array32();
        assert_eq!(a[12..15], [1.5f32, 2.5, 3.5]);
        assert_eq!(a[15], 1.0f32);
    }

    #[test]
    fn test_glam_roundtrip() {
        let mut m = Matrix4::IDENTITY;
        m.make_rotation_axis(Vector3::new(0.0, 0.6, 0.8), 0.9).set_position(Vector3::ONE);

        let g: glam::DMat4 = m.into();
        assert_eq!(g.col(3).x, 1.0);
        assert_eq!(Matrix4::from(g), m);
    }
}
