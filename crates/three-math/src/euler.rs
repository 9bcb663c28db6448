//! Euler angles with an explicit rotation order.
//!
//! The order names the axes in the sequence the elementary rotations are
//! multiplied: `XYZ` builds `Rx * Ry * Rz`. Changing [`Euler::order`]
//! directly only relabels the angles; use [`Euler::reorder`] to keep the
//! same orientation under a different order.
//!
//! # Usage
//!
//! ```rust
//! use three_math::{Euler, Matrix4, RotationOrder};
//!
//! let e = Euler::new(0.1, 0.2, 0.3, RotationOrder::ZYX);
//!
//! let mut m = Matrix4::IDENTITY;
//! m.make_rotation_from_euler(&e);
//!
//! let mut back = Euler::default();
//! back.set_from_rotation_matrix(&m, Some(RotationOrder::ZYX));
//! assert!((back.y - 0.2).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{clamp, Error, Matrix4, Quaternion, Vector3};

/// Above this `|m_ij|` the middle angle is treated as gimbal-locked.
const GIMBAL_THRESHOLD: f64 = 0.99999;

/// Axis order for composing three elementary rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum RotationOrder {
    /// X, then Y, then Z
    #[default]
    XYZ,
    /// Y, then Z, then X
    YZX,
    /// Z, then X, then Y
    ZXY,
    /// X, then Z, then Y
    XZY,
    /// Y, then X, then Z
    YXZ,
    /// Z, then Y, then X
    ZYX,
}

impl RotationOrder {
    /// Every order, in declaration order.
    pub const ALL: [RotationOrder; 6] = [
        RotationOrder::XYZ,
        RotationOrder::YZX,
        RotationOrder::ZXY,
        RotationOrder::XZY,
        RotationOrder::YXZ,
        RotationOrder::ZYX,
    ];

    /// Upper-case name, e.g. `"XYZ"`.
    pub const fn name(&self) -> &'static str {
        match self {
            RotationOrder::XYZ => "XYZ",
            RotationOrder::YZX => "YZX",
            RotationOrder::ZXY => "ZXY",
            RotationOrder::XZY => "XZY",
            RotationOrder::YXZ => "YXZ",
            RotationOrder::ZYX => "ZYX",
        }
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RotationOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RotationOrder::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownRotationOrder(s.to_string()))
    }
}

/// Rotation as three angles (radians) plus an order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Euler {
    /// Rotation about X, radians
    pub x: f64,
    /// Rotation about Y, radians
    pub y: f64,
    /// Rotation about Z, radians
    pub z: f64,
    /// Composition order
    pub order: RotationOrder,
}

impl Euler {
    /// Creates Euler angles.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, order: RotationOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Sets the angles; `None` keeps the current order.
    pub fn set(&mut self, x: f64, y: f64, z: f64, order: Option<RotationOrder>) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        if let Some(order) = order {
            self.order = order;
        }
        self
    }

    /// Extracts angles from the upper 3x3 of an unscaled rotation matrix.
    ///
    /// Near gimbal lock (`|m_ij| >= 0.99999` for the middle axis) one of the
    /// outer angles is pinned to zero and the other absorbs the rotation, so
    /// the result never contains `NaN`.
    pub fn set_from_rotation_matrix(
        &mut self,
        m: &Matrix4,
        order: Option<RotationOrder>,
    ) -> &mut Self {
        let te = &m.elements;

        let (m11, m12, m13) = (te[0], te[4], te[8]);
        let (m21, m22, m23) = (te[1], te[5], te[9]);
        let (m31, m32, m33) = (te[2], te[6], te[10]);

        let order = order.unwrap_or(self.order);

        match order {
            RotationOrder::XYZ => {
                self.y = clamp(m13, -1.0, 1.0).asin();
                if m13.abs() < GIMBAL_THRESHOLD {
                    self.x = (-m23).atan2(m33);
                    self.z = (-m12).atan2(m11);
                } else {
                    self.x = m32.atan2(m22);
                    self.z = 0.0;
                }
            }
            RotationOrder::YXZ => {
                self.x = (-clamp(m23, -1.0, 1.0)).asin();
                if m23.abs() < GIMBAL_THRESHOLD {
                    self.y = m13.atan2(m33);
                    self.z = m21.atan2(m22);
                } else {
                    self.y = (-m31).atan2(m11);
                    self.z = 0.0;
                }
            }
            RotationOrder::ZXY => {
                self.x = clamp(m32, -1.0, 1.0).asin();
                if m32.abs() < GIMBAL_THRESHOLD {
                    self.y = (-m31).atan2(m33);
                    self.z = (-m12).atan2(m22);
                } else {
                    self.y = 0.0;
                    self.z = m21.atan2(m11);
                }
            }
            RotationOrder::ZYX => {
                self.y = (-clamp(m31, -1.0, 1.0)).asin();
                if m31.abs() < GIMBAL_THRESHOLD {
                    self.x = m32.atan2(m33);
                    self.z = m21.atan2(m11);
                } else {
                    self.x = 0.0;
                    self.z = (-m12).atan2(m22);
                }
            }
            RotationOrder::YZX => {
                self.z = clamp(m21, -1.0, 1.0).asin();
                if m21.abs() < GIMBAL_THRESHOLD {
                    self.x = (-m23).atan2(m22);
                    self.y = (-m31).atan2(m11);
                } else {
                    self.x = 0.0;
                    self.y = m13.atan2(m33);
                }
            }
            RotationOrder::XZY => {
                self.z = (-clamp(m12, -1.0, 1.0)).asin();
                if m12.abs() < GIMBAL_THRESHOLD {
                    self.x = m32.atan2(m22);
                    self.y = m13.atan2(m11);
                } else {
                    self.x = (-m23).atan2(m33);
                    self.y = 0.0;
                }
            }
        }

        self.order = order;
        self
    }

    /// Sets from a unit quaternion via its rotation matrix.
    pub fn set_from_quaternion(&mut self, q: Quaternion, order: Option<RotationOrder>) -> &mut Self {
        let mut m = Matrix4::IDENTITY;
        m.make_rotation_from_quaternion(q);
        self.set_from_rotation_matrix(&m, order)
    }

    /// Copies angles from a vector's components.
    pub fn set_from_vector3(&mut self, v: Vector3, order: Option<RotationOrder>) -> &mut Self {
        self.set(v.x, v.y, v.z, order)
    }

    /// Re-expresses the same orientation under `new_order`.
    ///
    /// Goes through a quaternion, so any extra full revolutions in the
    /// current angles are lost: `x = 2pi + 0.1` comes back as `0.1`.
    pub fn reorder(&mut self, new_order: RotationOrder) -> &mut Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_euler(self);
        self.set_from_quaternion(q, Some(new_order))
    }

    /// Sets angles from `[x, y, z]`; `None` keeps the current order.
    pub fn from_array(&mut self, array: [f64; 3], order: Option<RotationOrder>) -> &mut Self {
        self.set(array[0], array[1], array[2], order)
    }

    /// Returns `([x, y, z], order)`.
    pub const fn to_array(&self) -> ([f64; 3], RotationOrder) {
        ([self.x, self.y, self.z], self.order)
    }

    /// Angles as a vector.
    pub const fn to_vector3(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for Euler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.order)
    }
}
