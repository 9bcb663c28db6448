//! Scalar helpers shared by every math type.
//!
//! # Usage
//!
//! ```rust
//! use three_math::{clamp, euclidean_modulo, DEG2RAD};
//!
//! assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
//! assert_eq!(euclidean_modulo(-1.0, 3.0), 2.0);
//! assert!((90.0 * DEG2RAD - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//! ```

use rand::Rng;

/// Degrees to radians factor.
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees factor.
pub const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

/// Machine epsilon for `f64` (2^-52).
pub const EPSILON: f64 = f64::EPSILON;

/// Clamps `value` to `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics when `min > max`; `min` wins.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Modulo whose result takes the sign of the divisor.
///
/// `euclidean_modulo(-1.0, 3.0) == 2.0`, useful for wrapping hues.
#[inline]
pub fn euclidean_modulo(n: f64, m: f64) -> f64 {
    ((n % m) + m) % m
}

/// Rounds half up (`floor(v + 0.5)`), so `-0.5` rounds to `0`.
#[inline]
pub fn round(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Maximum of two or more values.
pub fn max_of(a: f64, b: f64, rest: &[f64]) -> f64 {
    rest.iter().fold(a.max(b), |m, &v| m.max(v))
}

/// Converts degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * DEG2RAD
}

/// Converts radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * RAD2DEG
}

const UUID_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Generates a random version-4 style UUID string.
///
/// The layout is `XXXXXXXX-XXXX-4XXX-YXXX-XXXXXXXXXXXX` where `Y` is one of
/// `8`, `9`, `A` or `B`.
///
/// # Example
///
/// ```rust
/// let id = three_math::generate_uuid();
/// assert_eq!(id.len(), 36);
/// assert_eq!(&id[14..15], "4");
/// ```
pub fn generate_uuid() -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(36);

    for i in 0..36 {
        let c = match i {
            8 | 13 | 18 | 23 => '-',
            14 => '4',
            _ => {
                let r: usize = rng.gen_range(0..16);
                let r = if i == 19 { (r & 0x3) | 0x8 } else { r };
                UUID_CHARS[r] as char
            }
        };
        out.push(c);
    }

    out
}
