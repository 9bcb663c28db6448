//! RGB color with HSL conversion and CSS-style parsing.
//!
//! Channels are `f64` nominally in `[0, 1]`. Arithmetic does not clamp
//! (except [`Color::sub`], which stops at zero), so intermediate values may
//! leave that range; the integer getters clamp when packing.
//!
//! # Parsing
//!
//! [`Color::set_style`] understands, case-insensitively:
//!
//! | Form | Example |
//! |------|---------|
//! | `rgb()` / `rgba()` integers | `rgb(255, 0, 0)` |
//! | `rgb()` / `rgba()` percent | `rgba(100%, 0%, 0%, 0.5)` |
//! | `hsl()` / `hsla()` | `hsl(120, 50%, 50%)` |
//! | short and long hex | `#f00`, `#ff0000` |
//! | CSS keywords | `tomato` |
//!
//! Alpha is accepted and ignored with a warning. Unknown styles log a
//! warning and leave the color unchanged; use [`Color::try_set_style`] to get
//! an error instead.
//!
//! ```rust
//! use three_math::Color;
//!
//! let mut c = Color::default();
//! c.set_style("rgb(255,0,0)");
//! assert_eq!(c.get_hex(), 0xFF0000);
//! assert_eq!(c.get_style(), "rgb(255,000,000)");
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::color_keywords;
use crate::{clamp, euclidean_modulo, Error, Result};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel
    pub r: f64,
    /// Green channel
    pub g: f64,
    /// Blue channel
    pub b: f64,
}

impl Default for Color {
    /// White.
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// White (1, 1, 1).
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Black (0, 0, 0).
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a color from channels.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        let mut c = Self::BLACK;
        c.set_hex(hex);
        c
    }

    /// Looks up a CSS color keyword (lowercase, e.g. `"rebeccapurple"`).
    pub fn from_keyword(name: &str) -> Option<Self> {
        color_keywords::lookup(name).map(Self::from_hex)
    }

    /// Creates from `[r, g, b]`.
    #[inline]
    pub const fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Channels as `[r, g, b]`.
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels narrowed to `f32`.
    pub fn to_array32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Reads three channels starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `array` holds fewer than `offset + 3` values.
    pub fn from_slice(&mut self, array: &[f64], offset: usize) -> &mut Self {
        self.set_rgb(array[offset], array[offset + 1], array[offset + 2])
    }

    /// Writes the channels into `target` at `offset`.
    pub fn write_to_slice(self, target: &mut [f64], offset: usize) {
        target[offset..offset + 3].copy_from_slice(&self.to_array());
    }

    /// Sets all channels.
    pub fn set_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        *self = Self::new(r, g, b);
        self
    }

    /// Sets every channel to `scalar`.
    pub fn set_scalar(&mut self, scalar: f64) -> &mut Self {
        self.set_rgb(scalar, scalar, scalar)
    }

    /// Sets from `0xRRGGBB`. Bits above 24 are ignored.
    pub fn set_hex(&mut self, hex: u32) -> &mut Self {
        self.set_rgb(
            f64::from((hex >> 16) & 0xFF) / 255.0,
            f64::from((hex >> 8) & 0xFF) / 255.0,
            f64::from(hex & 0xFF) / 255.0,
        )
    }

    /// Sets from hue, saturation and lightness, all in `[0, 1]`.
    ///
    /// Hue wraps around; saturation and lightness are clamped.
    pub fn set_hsl(&mut self, h: f64, s: f64, l: f64) -> &mut Self {
        let h = euclidean_modulo(h, 1.0);
        let s = clamp(s, 0.0, 1.0);
        let l = clamp(l, 0.0, 1.0);

        if s == 0.0 {
            return self.set_scalar(l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        self.set_rgb(
            hue_to_rgb(q, p, h + 1.0 / 3.0),
            hue_to_rgb(q, p, h),
            hue_to_rgb(q, p, h - 1.0 / 3.0),
        )
    }

    /// Parses a CSS-style color. Unknown input logs a warning and leaves
    /// the color unchanged.
    pub fn set_style(&mut self, style: &str) -> &mut Self {
        match parse_style(style) {
            Ok(parsed) => *self = parsed,
            Err(_) => warn!(style, "Unknown color"),
        }
        self
    }

    /// Parses a CSS-style color.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorStyle`] if `style` matches no supported form.
    pub fn try_set_style(&mut self, style: &str) -> Result<&mut Self> {
        *self = parse_style(style)?;
        Ok(self)
    }

    /// Sets to `gamma` converted to linear space (gamma 2).
    pub fn copy_gamma_to_linear(&mut self, gamma: Color) -> &mut Self {
        self.set_rgb(gamma.r * gamma.r, gamma.g * gamma.g, gamma.b * gamma.b)
    }

    /// Sets to `linear` converted to gamma space (gamma 2).
    pub fn copy_linear_to_gamma(&mut self, linear: Color) -> &mut Self {
        self.set_rgb(linear.r.sqrt(), linear.g.sqrt(), linear.b.sqrt())
    }

    /// Converts in place from gamma to linear space.
    pub fn convert_gamma_to_linear(&mut self) -> &mut Self {
        let c = *self;
        self.copy_gamma_to_linear(c)
    }

    /// Converts in place from linear to gamma space.
    pub fn convert_linear_to_gamma(&mut self) -> &mut Self {
        let c = *self;
        self.copy_linear_to_gamma(c)
    }

    /// Channels as clamped, truncated bytes.
    fn to_bytes(self) -> [u32; 3] {
        self.to_array().map(|c| (clamp(c, 0.0, 1.0) * 255.0) as u32)
    }

    /// Packs into `0xRRGGBB`.
    pub fn get_hex(&self) -> u32 {
        let [r, g, b] = self.to_bytes();
        (r << 16) | (g << 8) | b
    }

    /// Six lowercase hex digits, e.g. `"ff6347"`.
    pub fn get_hex_string(&self) -> String {
        format!("{:06x}", self.get_hex())
    }

    /// `rgb(RRR,GGG,BBB)` with zero-padded decimal channels.
    pub fn get_style(&self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("rgb({r:03},{g:03},{b:03})")
    }

    /// Returns `(hue, saturation, lightness)`, each in `[0, 1]`.
    pub fn get_hsl(&self) -> (f64, f64, f64) {
        let Color { r, g, b } = *self;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (min + max) / 2.0;

        if min == max {
            return (0.0, 0.0, lightness);
        }

        let delta = max - min;
        let saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let hue = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        (hue / 6.0, saturation, lightness)
    }

    /// Shifts hue, saturation and lightness.
    pub fn offset_hsl(&mut self, h: f64, s: f64, l: f64) -> &mut Self {
        let (hc, sc, lc) = self.get_hsl();
        self.set_hsl(hc + h, sc + s, lc + l)
    }

    /// Adds `c` channel-wise.
    pub fn add(&mut self, c: Color) -> &mut Self {
        self.set_rgb(self.r + c.r, self.g + c.g, self.b + c.b)
    }

    /// Sets to `a + b`.
    pub fn add_colors(&mut self, a: Color, b: Color) -> &mut Self {
        self.set_rgb(a.r + b.r, a.g + b.g, a.b + b.b)
    }

    /// Adds `s` to every channel.
    pub fn add_scalar(&mut self, s: f64) -> &mut Self {
        self.set_rgb(self.r + s, self.g + s, self.b + s)
    }

    /// Subtracts `c` channel-wise, stopping at zero.
    pub fn sub(&mut self, c: Color) -> &mut Self {
        self.set_rgb(
            (self.r - c.r).max(0.0),
            (self.g - c.g).max(0.0),
            (self.b - c.b).max(0.0),
        )
    }

    /// Multiplies channel-wise.
    pub fn multiply(&mut self, c: Color) -> &mut Self {
        self.set_rgb(self.r * c.r, self.g * c.g, self.b * c.b)
    }

    /// Multiplies every channel by `s`.
    pub fn multiply_scalar(&mut self, s: f64) -> &mut Self {
        self.set_rgb(self.r * s, self.g * s, self.b * s)
    }

    /// Moves toward `c` by `alpha`.
    pub fn lerp(&mut self, c: Color, alpha: f64) -> &mut Self {
        self.set_rgb(
            self.r + (c.r - self.r) * alpha,
            self.g + (c.g - self.g) * alpha,
            self.b + (c.b - self.b) * alpha,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.get_hex_string())
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_style(s)
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Compiles `src` once into `cell`. `None` only if the pattern is invalid,
/// in which case the form simply never matches.
fn cached(cell: &'static OnceLock<Option<Regex>>, src: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(src).ok()).as_ref()
}

fn function_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"^((?:rgb|hsl)a?)\(\s*([^)]*)\)$")
}

fn rgb_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"^(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?$")
}

fn rgb_percent_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"^(\d+)%\s*,\s*(\d+)%\s*,\s*(\d+)%\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?$")
}

fn hsl_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"^([0-9]*\.?[0-9]+)\s*,\s*(\d+)%\s*,\s*(\d+)%\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?$")
}

fn hex_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"^#([a-f0-9]+)$")
}

/// Decimal digits over `max`, saturating at 1.
fn channel(digits: &str, max: f64) -> f64 {
    digits.parse::<f64>().unwrap_or(max).min(max) / max
}

fn warn_alpha(alpha: Option<regex::Match<'_>>) {
    if let Some(alpha) = alpha {
        if alpha.as_str().parse::<f64>().is_ok_and(|a| a < 1.0) {
            warn!(alpha = alpha.as_str(), "Alpha component of color will be ignored");
        }
    }
}

fn parse_style(style: &str) -> Result<Color> {
    let lower = style.trim().to_ascii_lowercase();
    let invalid = || Error::InvalidColorStyle(style.to_string());

    if let Some(caps) = function_re().and_then(|re| re.captures(&lower)) {
        let components = caps.get(2).map_or("", |m| m.as_str()).trim();

        return match &caps[1] {
            "rgb" | "rgba" => {
                if let Some(c) = rgb_re().and_then(|re| re.captures(components)) {
                    warn_alpha(c.get(4));
                    Ok(Color::new(
                        channel(&c[1], 255.0),
                        channel(&c[2], 255.0),
                        channel(&c[3], 255.0),
                    ))
                } else if let Some(c) = rgb_percent_re().and_then(|re| re.captures(components)) {
                    warn_alpha(c.get(4));
                    Ok(Color::new(
                        channel(&c[1], 100.0),
                        channel(&c[2], 100.0),
                        channel(&c[3], 100.0),
                    ))
                } else {
                    Err(invalid())
                }
            }
            _ => {
                let c = hsl_re()
                    .and_then(|re| re.captures(components))
                    .ok_or_else(invalid)?;
                warn_alpha(c.get(4));

                let h = c[1].parse::<f64>().map_err(|_| invalid())? / 360.0;
                let s = channel(&c[2], 100.0);
                let l = channel(&c[3], 100.0);

                let mut color = Color::BLACK;
                color.set_hsl(h, s, l);
                Ok(color)
            }
        };
    }

    if let Some(caps) = hex_re().and_then(|re| re.captures(&lower)) {
        let hex = &caps[1];
        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };
        let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
        return Ok(Color::from_hex(value));
    }

    Color::from_keyword(&lower).ok_or_else(invalid)
}
