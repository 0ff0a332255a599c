//! Color values and their validating parsers.
//!
//! A color travels through this crate in one of three shapes:
//!
//! - a hex string such as `#ff8800` or the short form `#f80`,
//! - an [`Rgb`] triple of channel values,
//! - an [`Hsl`] triple of hue (degrees), saturation and lightness (percent).
//!
//! None of them has identity or state. They are plain values produced by the
//! pure functions in [`crate::convert`] and formatted by [`crate::css`].
//!
//! # Lenient and strict input
//!
//! The functions in [`crate::convert`] accept anything and degrade malformed
//! text to zeros or `NaN`. The parsers in this module are the strict
//! counterparts: they validate and return a [`ColorParseError`] instead.
//!
//! ```
//! use chroma_convert::color::{parse_hex_strict, parse_rgb_strict, Rgb};
//!
//! assert_eq!(parse_hex_strict("#f80").unwrap(), Rgb::new(255.0, 136.0, 0.0));
//! assert_eq!(parse_rgb_strict("rgb(1, 2, 3)").unwrap(), Rgb::new(1.0, 2.0, 3.0));
//! assert!(parse_hex_strict("#ggg").is_err());
//! ```

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::convert;
use crate::css;
use crate::number;

/// Red, green and blue channels.
///
/// Channels are conceptually integers in `0..=255`, but values read from user
/// input are carried as received (fractional, out of range or `NaN`) until
/// they are converted to hex, which clamps and rounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Create a triple from raw channel values.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Channels clamped to `0..=255` and rounded; `NaN` becomes `0`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped to 0-255 first"
    )]
    pub fn to_triplet(&self) -> (u8, u8, u8) {
        let channel = |value: f64| {
            let clamped = number::clamp(number::round_half_up(value), 0.0, 255.0);
            if clamped.is_nan() { 0 } else { clamped as u8 }
        };
        (channel(self.r), channel(self.g), channel(self.b))
    }

    /// Returns true if every channel is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(f64::from(r), f64::from(g), f64::from(b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::from((r, g, b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&css::render_rgb(*self))
    }
}

/// Hue in degrees, saturation and lightness in percent.
///
/// Values produced by [`convert::rgb_to_hsl`] have an integral hue and
/// saturation/lightness rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Create a triple from raw component values.
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Returns true if every component is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.h.is_finite() && self.s.is_finite() && self.l.is_finite()
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&css::render_hsl(*self))
    }
}

/// The three interchangeable color representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Hex,
    Rgb,
    Hsl,
}

impl ColorSpace {
    /// All spaces, in display order.
    pub const ALL: [Self; 3] = [Self::Hex, Self::Rgb, Self::Hsl];

    /// Lowercase name of this color space.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Hsl => "hsl",
        }
    }

    /// Parse a color space name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns the unrecognized name.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "hsl" => Ok(Self::Hsl),
            other => Err(other.to_string()),
        }
    }

    /// Guess which space a piece of color text is written in.
    ///
    /// `#`-prefixed text and text made only of 3, 4, 6 or 8 hex digits is
    /// hex, text starting with `hsl` is HSL, everything else is RGB.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if text.starts_with('#') {
            Self::Hex
        } else if lower.starts_with("hsl") {
            Self::Hsl
        } else if matches!(text.len(), 3 | 4 | 6 | 8)
            && text.chars().all(|c| c.is_ascii_hexdigit())
            && !text.chars().all(|c| c.is_ascii_digit())
        {
            Self::Hex
        } else {
            Self::Rgb
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error type for strict color parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    Empty,
    InvalidHexLength(String),
    InvalidHexDigit(String),
    InvalidRgb(String),
    InvalidHsl(String),
    OutOfRange(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty color string"),
            Self::InvalidHexLength(s) => {
                write!(f, "Invalid hex color length (expected 3, 4, 6 or 8 digits): {s}")
            }
            Self::InvalidHexDigit(s) => write!(f, "Invalid hex digit in color: {s}"),
            Self::InvalidRgb(s) => write!(f, "Invalid RGB color: {s}"),
            Self::InvalidHsl(s) => write!(f, "Invalid HSL color: {s}"),
            Self::OutOfRange(s) => write!(f, "Color component out of range: {s}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Parse a hex color, rejecting anything malformed.
///
/// Accepts an optional `#` followed by 3, 4, 6 or 8 hex digits. The alpha
/// digits of the 4- and 8-digit forms are validated but ignored, matching
/// [`convert::hex_to_rgb`].
///
/// # Errors
///
/// - `Empty` if there are no digits
/// - `InvalidHexLength` if the digit count is not 3, 4, 6 or 8
/// - `InvalidHexDigit` if any character is not a hex digit
pub fn parse_hex_strict(text: &str) -> Result<Rgb, ColorParseError> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if body.is_empty() {
        log::debug!("rejected empty hex color {text:?}");
        return Err(ColorParseError::Empty);
    }
    if !matches!(body.chars().count(), 3 | 4 | 6 | 8) {
        log::debug!("rejected hex color {text:?}: bad length");
        return Err(ColorParseError::InvalidHexLength(trimmed.to_string()));
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        log::debug!("rejected hex color {text:?}: bad digit");
        return Err(ColorParseError::InvalidHexDigit(trimmed.to_string()));
    }

    Ok(convert::hex_to_rgb(body))
}

/// Parse an RGB color, rejecting anything malformed.
///
/// Accepts `rgb(R, G, B)` or a bare `R G B` / `R,G,B` triple of integers,
/// each in `0..=255`.
///
/// # Errors
///
/// - `Empty` if the text is blank
/// - `InvalidRgb` if the text is not one of the accepted shapes
/// - `OutOfRange` if a channel exceeds 255
pub fn parse_rgb_strict(text: &str) -> Result<Rgb, ColorParseError> {
    static RGB_FUNC_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
            .expect("valid regex")
    });
    static RGB_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(\d{1,3})(?:\s*,\s*|\s+)(\d{1,3})(?:\s*,\s*|\s+)(\d{1,3})$")
            .expect("valid regex")
    });

    let normalized = text.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ColorParseError::Empty);
    }

    let Some(caps) = RGB_FUNC_RE
        .captures(&normalized)
        .or_else(|| RGB_BARE_RE.captures(&normalized))
    else {
        log::debug!("rejected rgb color {text:?}: unrecognized shape");
        return Err(ColorParseError::InvalidRgb(text.trim().to_string()));
    };

    let mut channels = [0.0; 3];
    for (slot, channel) in channels.iter_mut().enumerate() {
        let value = number::coerce(&caps[slot + 1]);
        if value > 255.0 {
            log::debug!("rejected rgb color {text:?}: channel {value} > 255");
            return Err(ColorParseError::OutOfRange(text.trim().to_string()));
        }
        *channel = value;
    }

    Ok(Rgb::new(channels[0], channels[1], channels[2]))
}

/// Parse an HSL color, rejecting anything malformed.
///
/// Accepts `hsl(Hdeg, S%, L%)` or a bare `H S L` / `H,S,L` triple; the `deg`
/// and `%` units are optional. Hue must lie in `0..360`, saturation and
/// lightness in `0..=100`.
///
/// # Errors
///
/// - `Empty` if the text is blank
/// - `InvalidHsl` if the text is not one of the accepted shapes
/// - `OutOfRange` if a component is outside its range
pub fn parse_hsl_strict(text: &str) -> Result<Hsl, ColorParseError> {
    const NUM: &str = r"(\d+(?:\.\d+)?)";
    static HSL_FUNC_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r"^hsl\(\s*{NUM}(?:deg)?\s*,\s*{NUM}%?\s*,\s*{NUM}%?\s*\)$"
        ))
        .expect("valid regex")
    });
    static HSL_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r"^{NUM}(?:deg)?(?:\s*,\s*|\s+){NUM}%?(?:\s*,\s*|\s+){NUM}%?$"
        ))
        .expect("valid regex")
    });

    let normalized = text.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ColorParseError::Empty);
    }

    let Some(caps) = HSL_FUNC_RE
        .captures(&normalized)
        .or_else(|| HSL_BARE_RE.captures(&normalized))
    else {
        log::debug!("rejected hsl color {text:?}: unrecognized shape");
        return Err(ColorParseError::InvalidHsl(text.trim().to_string()));
    };

    let h = number::coerce(&caps[1]);
    let s = number::coerce(&caps[2]);
    let l = number::coerce(&caps[3]);

    if h >= 360.0 || s > 100.0 || l > 100.0 {
        log::debug!("rejected hsl color {text:?}: component out of range");
        return Err(ColorParseError::OutOfRange(text.trim().to_string()));
    }

    Ok(Hsl::new(h, s, l))
}
