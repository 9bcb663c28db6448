//! 3x3 matrices, mainly normal matrices and 2D homogeneous transforms.
//!
//! Storage is column-major like [`Matrix4`]; [`Matrix3::set`] takes
//! row-major arguments.

use std::fmt;

use crate::{Error, Matrix4, Result, Vector3};

/// A 3x3 `f64` matrix in column-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Matrix3 {
    /// Column-major elements.
    pub elements: [f64; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self::from_array([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// All zeros.
    pub const ZERO: Self = Self::from_array([0.0; 9]);

    /// Creates from column-major elements.
    #[inline]
    pub const fn from_array(elements: [f64; 9]) -> Self {
        Self { elements }
    }

    /// Column-major elements.
    #[inline]
    pub const fn to_array(&self) -> [f64; 9] {
        self.elements
    }

    /// Reads nine column-major values starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `array` holds fewer than `offset + 9` values.
    pub fn from_slice(&mut self, array: &[f64], offset: usize) -> &mut Self {
        self.elements.copy_from_slice(&array[offset..offset + 9]);
        self
    }

    /// Writes the column-major elements into `target` at `offset`.
    pub fn write_to_slice(&self, target: &mut [f64], offset: usize) {
        target[offset..offset + 9].copy_from_slice(&self.elements);
    }

    /// Sets all elements from row-major arguments.
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub fn set(
        &mut self,
        n11: f64, n12: f64, n13: f64,
        n21: f64, n22: f64, n23: f64,
        n31: f64, n32: f64, n33: f64,
    ) -> &mut Self {
        self.elements = [
            n11, n21, n31,
            n12, n22, n32,
            n13, n23, n33,
        ];
        self
    }

    /// Resets to identity.
    pub fn identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Takes the upper-left 3x3 of `m`.
    #[rustfmt::skip]
    pub fn set_from_matrix4(&mut self, m: &Matrix4) -> &mut Self {
        let me = &m.elements;
        self.set(
            me[0], me[4], me[8],
            me[1], me[5], me[9],
            me[2], me[6], me[10],
        )
    }

    /// Multiplies packed `xyz` triples in place.
    ///
    /// Starts at `offset` and covers `length` values (`None` means to the
    /// end). A trailing partial triple is left untouched.
    pub fn apply_to_vector3_array<'a>(
        &self,
        array: &'a mut [f64],
        offset: usize,
        length: Option<usize>,
    ) -> &'a mut [f64] {
        let available = array.len().saturating_sub(offset);
        let length = length.map_or(available, |l| l.min(available));

        if let Some(region) = array.get_mut(offset..offset + length) {
            let mut v = Vector3::ZERO;
            for chunk in region.chunks_exact_mut(3) {
                v.from_slice(chunk, 0).apply_matrix3(self).write_to_slice(chunk, 0);
            }
        }
        array
    }

    /// Multiplies every element by `s`.
    pub fn multiply_scalar(&mut self, s: f64) -> &mut Self {
        self.elements.iter_mut().for_each(|e| *e *= s);
        self
    }

    /// Determinant.
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, e, f, g, h, i] = self.elements;
        a * e * i - a * f * h - b * d * i + b * f * g + c * d * h - c * e * g
    }

    /// Sets `self` to the inverse of `m`, or to identity if `m` is singular.
    pub fn get_inverse(&mut self, m: &Matrix3) -> &mut Self {
        if self.try_get_inverse(m).is_err() {
            self.identity();
        }
        self
    }

    /// Sets `self` to the inverse of `m`.
    ///
    /// # Errors
    ///
    /// [`Error::SingularMatrix`] if the determinant is exactly zero; `self`
    /// is unchanged.
    pub fn try_get_inverse(&mut self, m: &Matrix3) -> Result<&mut Self> {
        let [n11, n21, n31, n12, n22, n32, n13, n23, n33] = m.elements;

        let t11 = n33 * n22 - n32 * n23;
        let t12 = n32 * n13 - n33 * n12;
        let t13 = n23 * n12 - n22 * n13;

        let det = n11 * t11 + n21 * t12 + n31 * t13;
        if det == 0.0 {
            return Err(Error::SingularMatrix);
        }

        let det_inv = 1.0 / det;
        self.elements = [
            t11 * det_inv,
            (n31 * n23 - n33 * n21) * det_inv,
            (n32 * n21 - n31 * n22) * det_inv,
            t12 * det_inv,
            (n33 * n11 - n31 * n13) * det_inv,
            (n31 * n12 - n32 * n11) * det_inv,
            t13 * det_inv,
            (n21 * n13 - n23 * n11) * det_inv,
            (n22 * n11 - n21 * n12) * det_inv,
        ];
        Ok(self)
    }

    /// Transposes in place.
    pub fn transpose(&mut self) -> &mut Self {
        self.elements.swap(1, 3);
        self.elements.swap(2, 6);
        self.elements.swap(5, 7);
        self
    }

    /// Inverse-transpose of the upper 3x3 of `m`, for transforming normals.
    ///
    /// A singular `m` yields identity.
    pub fn get_normal_matrix(&mut self, m: &Matrix4) -> &mut Self {
        let mut upper = Matrix3::IDENTITY;
        upper.set_from_matrix4(m);
        self.get_inverse(&upper).transpose()
    }

    /// Returns the transposed elements without modifying `self`.
    pub fn transpose_into_array(&self) -> [f64; 9] {
        let mut t = *self;
        t.transpose();
        t.elements
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.elements;
        for row in 0..3 {
            writeln!(f, "[{:>10.4} {:>10.4} {:>10.4}]", e[row], e[3 + row], e[6 + row])?;
        }
        Ok(())
    }
}

impl From<glam::DMat3> for Matrix3 {
    fn from(m: glam::DMat3) -> Self {
        Self::from_array(m.to_cols_array())
    }
}

impl From<Matrix3> for glam::DMat3 {
    fn from(m: Matrix3) -> Self {
        glam::DMat3::from_cols_array(&m.elements)
    }
}
