//! Typed numeric storage behind every [`crate::BufferAttribute`].
//!
//! GPU vertex data comes in nine element types, the same set a browser
//! exposes as typed arrays. [`TypedArray`] is a closed enum over them so an
//! attribute can hold any kind while offering one `f64` view for reads and
//! writes.
//!
//! # Types
//!
//! - [`ArrayKind`] - Element type tag (`Float32`, `Uint16`, ...)
//! - [`ArrayElement`] - Trait tying a Rust scalar to its kind
//! - [`TypedArray`] - Owned storage of one kind
//!
//! # Conversion
//!
//! Values go through `f64`. Writing to an integer kind truncates toward
//! zero and saturates at the type bounds (`NaN` becomes 0). `Uint8Clamped`
//! clamps to `[0, 255]` and rounds half to even instead of truncating.
//!
//! # Usage
//!
//! ```rust
//! use three_core::{ArrayKind, TypedArray};
//!
//! let mut a = TypedArray::from_name("Uint8ClampedArray", 2).unwrap();
//! a.set(0, 300.0);
//! a.set(1, 2.5);
//! assert_eq!(a.kind(), ArrayKind::Uint8Clamped);
//! assert_eq!(a.to_f64_vec(), vec![255.0, 2.0]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Element type of a [`TypedArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrayKind {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer, saturating on conversion like the other integers.
    Uint8,
    /// Unsigned 8-bit integer, clamped and rounded on conversion.
    Uint8Clamped,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer (small index buffers).
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer (large index buffers).
    Uint32,
    /// 32-bit float (vertex data).
    #[default]
    Float32,
    /// 64-bit float.
    Float64,
}

impl ArrayKind {
    /// Every kind, in declaration order.
    pub const ALL: [ArrayKind; 9] = [
        Self::Int8,
        Self::Uint8,
        Self::Uint8Clamped,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::Float32,
        Self::Float64,
    ];

    /// Typed array name, e.g. `"Float32Array"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "Int8Array",
            Self::Uint8 => "Uint8Array",
            Self::Uint8Clamped => "Uint8ClampedArray",
            Self::Int16 => "Int16Array",
            Self::Uint16 => "Uint16Array",
            Self::Int32 => "Int32Array",
            Self::Uint32 => "Uint32Array",
            Self::Float32 => "Float32Array",
            Self::Float64 => "Float64Array",
        }
    }

    /// Looks a kind up by its typed array name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Size of one element in bytes.
    #[inline]
    pub const fn bytes_per_element(&self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Uint8Clamped => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Whether elements are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether elements are integers.
    #[inline]
    pub const fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Whether elements can be negative.
    #[inline]
    pub const fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Float32 | Self::Float64
        )
    }
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArrayKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| Error::UnsupportedArrayType(s.to_string()))
    }
}

/// A Rust scalar that can back a [`TypedArray`].
///
/// `u8` maps to [`ArrayKind::Uint8`]; build clamped storage with
/// [`TypedArray::Uint8Clamped`] directly.
pub trait ArrayElement: Copy + Default + Send + Sync + 'static {
    /// Kind produced by [`ArrayElement::into_array`].
    const KIND: ArrayKind;

    /// Widens to `f64` (exact for every kind).
    fn to_f64(self) -> f64;

    /// Narrows from `f64`, truncating and saturating for integers.
    fn from_f64(v: f64) -> Self;

    /// Wraps a vector into the matching variant.
    fn into_array(values: Vec<Self>) -> TypedArray;

    /// Borrows the storage if `array` holds this element type.
    fn slice_of(array: &TypedArray) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($t:ty, $kind:ident) => {
        impl ArrayElement for $t {
            const KIND: ArrayKind = ArrayKind::$kind;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            fn into_array(values: Vec<Self>) -> TypedArray {
                TypedArray::$kind(values)
            }

            fn slice_of(array: &TypedArray) -> Option<&[Self]> {
                match array {
                    TypedArray::$kind(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i8, Int8);
impl_element!(i16, Int16);
impl_element!(u16, Uint16);
impl_element!(i32, Int32);
impl_element!(u32, Uint32);
impl_element!(f32, Float32);
impl_element!(f64, Float64);

impl ArrayElement for u8 {
    const KIND: ArrayKind = ArrayKind::Uint8;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as u8
    }

    fn into_array(values: Vec<Self>) -> TypedArray {
        TypedArray::Uint8(values)
    }

    fn slice_of(array: &TypedArray) -> Option<&[Self]> {
        match array {
            TypedArray::Uint8(v) | TypedArray::Uint8Clamped(v) => Some(v),
            _ => None,
        }
    }
}

/// `Uint8Clamped` conversion: clamp, then round half to even.
#[inline]
fn clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.clamp(0.0, 255.0).round_ties_even() as u8
    }
}

/// Owned numeric storage of one [`ArrayKind`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypedArray {
    /// `Int8Array`
    Int8(Vec<i8>),
    /// `Uint8Array`
    Uint8(Vec<u8>),
    /// `Uint8ClampedArray`
    Uint8Clamped(Vec<u8>),
    /// `Int16Array`
    Int16(Vec<i16>),
    /// `Uint16Array`
    Uint16(Vec<u16>),
    /// `Int32Array`
    Int32(Vec<i32>),
    /// `Uint32Array`
    Uint32(Vec<u32>),
    /// `Float32Array`
    Float32(Vec<f32>),
    /// `Float64Array`
    Float64(Vec<f64>),
}

/// Runs `$body` with `$v` bound to the inner vector of any variant.
macro_rules! each_variant {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            TypedArray::Int8($v) => $body,
            TypedArray::Uint8($v) => $body,
            TypedArray::Uint8Clamped($v) => $body,
            TypedArray::Int16($v) => $body,
            TypedArray::Uint16($v) => $body,
            TypedArray::Int32($v) => $body,
            TypedArray::Uint32($v) => $body,
            TypedArray::Float32($v) => $body,
            TypedArray::Float64($v) => $body,
        }
    };
}

impl Default for TypedArray {
    fn default() -> Self {
        Self::Float32(Vec::new())
    }
}

impl<T: ArrayElement> From<Vec<T>> for TypedArray {
    fn from(values: Vec<T>) -> Self {
        T::into_array(values)
    }
}

impl TypedArray {
    /// `len` zeros of `kind`.
    pub fn zeroed(kind: ArrayKind, len: usize) -> Self {
        match kind {
            ArrayKind::Int8 => Self::Int8(vec![0; len]),
            ArrayKind::Uint8 => Self::Uint8(vec![0; len]),
            ArrayKind::Uint8Clamped => Self::Uint8Clamped(vec![0; len]),
            ArrayKind::Int16 => Self::Int16(vec![0; len]),
            ArrayKind::Uint16 => Self::Uint16(vec![0; len]),
            ArrayKind::Int32 => Self::Int32(vec![0; len]),
            ArrayKind::Uint32 => Self::Uint32(vec![0; len]),
            ArrayKind::Float32 => Self::Float32(vec![0.0; len]),
            ArrayKind::Float64 => Self::Float64(vec![0.0; len]),
        }
    }

    /// `len` zeros of the kind named `name` (e.g. `"Uint16Array"`).
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedArrayType`] for any other name.
    pub fn from_name(name: &str, len: usize) -> Result<Self> {
        Ok(Self::zeroed(name.parse()?, len))
    }

    /// Converts `values` into a new array of `kind`.
    pub fn from_f64_slice(kind: ArrayKind, values: &[f64]) -> Self {
        let mut array = Self::zeroed(kind, values.len());
        for (i, &v) in values.iter().enumerate() {
            array.set(i, v);
        }
        array
    }

    /// Element kind.
    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Int8(_) => ArrayKind::Int8,
            Self::Uint8(_) => ArrayKind::Uint8,
            Self::Uint8Clamped(_) => ArrayKind::Uint8Clamped,
            Self::Int16(_) => ArrayKind::Int16,
            Self::Uint16(_) => ArrayKind::Uint16,
            Self::Int32(_) => ArrayKind::Int32,
            Self::Uint32(_) => ArrayKind::Uint32,
            Self::Float32(_) => ArrayKind::Float32,
            Self::Float64(_) => ArrayKind::Float64,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    /// `true` if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the storage in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.kind().bytes_per_element()
    }

    /// Reads element `i` as `f64`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        each_variant!(self, v => v[i].to_f64())
    }

    /// Writes element `i`, converting from `f64`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn set(&mut self, i: usize, value: f64) {
        match self {
            Self::Uint8Clamped(v) => v[i] = clamp_u8(value),
            Self::Int8(v) => v[i] = ArrayElement::from_f64(value),
            Self::Uint8(v) => v[i] = ArrayElement::from_f64(value),
            Self::Int16(v) => v[i] = ArrayElement::from_f64(value),
            Self::Uint16(v) => v[i] = ArrayElement::from_f64(value),
            Self::Int32(v) => v[i] = ArrayElement::from_f64(value),
            Self::Uint32(v) => v[i] = ArrayElement::from_f64(value),
            Self::Float32(v) => v[i] = ArrayElement::from_f64(value),
            Self::Float64(v) => v[i] = value,
        }
    }

    /// Writes `values` starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the values don't fit; nothing is written.
    pub fn write_f64(&mut self, offset: usize, values: &[f64]) -> Result<()> {
        let capacity = self.len();
        if offset.checked_add(values.len()).is_none_or(|end| end > capacity) {
            return Err(Error::OutOfRange { offset, len: values.len(), capacity });
        }
        for (i, &v) in values.iter().enumerate() {
            self.set(offset + i, v);
        }
        Ok(())
    }

    /// Sets every element to zero.
    pub fn fill_zero(&mut self) {
        each_variant!(self, v => v.iter_mut().for_each(|e| *e = Default::default()))
    }

    /// Elements as `f64`, in order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Copies all elements into a `Vec<f64>`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        each_variant!(self, v => v.iter().map(|e| e.to_f64()).collect())
    }

    /// Borrows the storage as `&[T]` if the element type matches.
    pub fn as_slice<T: ArrayElement>(&self) -> Option<&[T]> {
        T::slice_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        for kind in ArrayKind::ALL {
            assert_eq!(ArrayKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.to_string().parse::<ArrayKind>(), Ok(kind));
        }
        assert_eq!(ArrayKind::from_name("Float16Array"), None);
        assert_eq!(
            "BigInt64Array".parse::<ArrayKind>(),
            Err(Error::UnsupportedArrayType("BigInt64Array".into()))
        );
    }

    #[test]
    fn test_kind_properties() {
        assert_eq!(ArrayKind::Uint8Clamped.bytes_per_element(), 1);
        assert_eq!(ArrayKind::Uint16.bytes_per_element(), 2);
        assert_eq!(ArrayKind::Float32.bytes_per_element(), 4);
        assert_eq!(ArrayKind::Float64.bytes_per_element(), 8);
        assert!(ArrayKind::Float32.is_float());
        assert!(ArrayKind::Uint32.is_integer());
        assert!(ArrayKind::Int8.is_signed());
        assert!(!ArrayKind::Uint16.is_signed());
    }

    #[test]
    fn test_from_name() {
        let a = TypedArray::from_name("Int16Array", 4).unwrap();
        assert_eq!(a, TypedArray::Int16(vec![0; 4]));
        assert_eq!(a.byte_len(), 8);
        assert!(matches!(
            TypedArray::from_name("Array", 4),
            Err(Error::UnsupportedArrayType(_))
        ));
    }

    #[test]
    fn test_integer_conversion_saturates() {
        let a = TypedArray::from_f64_slice(ArrayKind::Int8, &[1.9, -1.9, 300.0, -300.0, f64::NAN]);
        assert_eq!(a, TypedArray::Int8(vec![1, -1, 127, -128, 0]));

        let a = TypedArray::from_f64_slice(ArrayKind::Uint16, &[-5.0, 70000.0]);
        assert_eq!(a, TypedArray::Uint16(vec![0, 65535]));
    }

    #[test]
    fn test_clamped_conversion_rounds() {
        let a = TypedArray::from_f64_slice(
            ArrayKind::Uint8Clamped,
            &[-1.0, 0.5, 1.5, 2.5, 254.6, 1000.0, f64::NAN],
        );
        assert_eq!(a, TypedArray::Uint8Clamped(vec![0, 0, 2, 2, 255, 255, 0]));
    }

    #[test]
    fn test_float_storage() {
        let mut a = TypedArray::from(vec![0.0f32; 3]);
        a.set(1, 0.1);
        assert_eq!(a.get(1), 0.1f32 as f64);

        let mut a = TypedArray::zeroed(ArrayKind::Float64, 1);
        a.set(0, 0.1);
        assert_eq!(a.get(0), 0.1);
    }

    #[test]
    fn test_write_f64_checked() {
        let mut a = TypedArray::from(vec![0u32; 4]);
        a.write_f64(1, &[7.0, 8.0, 9.0]).unwrap();
        assert_eq!(a.to_f64_vec(), vec![0.0, 7.0, 8.0, 9.0]);

        assert_eq!(
            a.write_f64(2, &[1.0, 1.0, 1.0]),
            Err(Error::OutOfRange { offset: 2, len: 3, capacity: 4 })
        );
        assert_eq!(a.to_f64_vec(), vec![0.0, 7.0, 8.0, 9.0]);

        a.fill_zero();
        assert!(a.iter().all(|v| v == 0.0));
    }

    #[test]
    fn test_as_slice() {
        let a = TypedArray::from(vec![1u16, 2, 3]);
        assert_eq!(a.as_slice::<u16>(), Some(&[1u16, 2, 3][..]));
        assert_eq!(a.as_slice::<u32>(), None);

        let clamped = TypedArray::Uint8Clamped(vec![9]);
        assert_eq!(clamped.as_slice::<u8>(), Some(&[9u8][..]));
    }
}
