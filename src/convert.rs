//! Conversions between hex, RGB and HSL.
//!
//! Every function here is total: it never panics and never returns an error.
//! Malformed input degrades instead of failing. Hex text that is not hex
//! parses as black, missing RGB numbers become `0`, and `NaN` channels flow
//! through to `NaN` results. Use the strict parsers in [`crate::color`] when
//! bad input should be reported.
//!
//! # Examples
//!
//! ```
//! use chroma_convert::color::{Hsl, Rgb};
//! use chroma_convert::convert::{hex_to_rgb, hsl_to_rgb, normalize_hex, rgb_to_hex, rgb_to_hsl};
//!
//! assert_eq!(normalize_hex("#abc"), "aabbcc");
//!
//! let red = hex_to_rgb("#ff0000");
//! assert_eq!(red, Rgb::new(255.0, 0.0, 0.0));
//! assert_eq!(rgb_to_hsl(red), Hsl::new(0.0, 100.0, 50.0));
//! assert_eq!(rgb_to_hex(hsl_to_rgb(Hsl::new(120.0, 100.0, 50.0))), "#00ff00");
//! ```

use regex::Regex;
use smallvec::SmallVec;
use std::sync::LazyLock;

use crate::color::{Hsl, Rgb};
use crate::number;

/// Matches runs of digits and dots, the numeric tokens of loose color text.
static NUMBER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+").expect("valid regex"));

/// Strip a leading `#` and expand short-form hex.
///
/// A 3- or 4-character body has every character doubled (`abc` becomes
/// `aabbcc`); any other body is returned as is. Characters are not validated.
/// Length is counted in `char`s, so `"a😀"` has two and is left alone.
#[must_use]
pub fn normalize_hex(raw: &str) -> String {
    let body = raw.strip_prefix('#').unwrap_or(raw);
    match body.chars().count() {
        3 | 4 => body.chars().flat_map(|c| [c, c]).collect(),
        _ => body.to_string(),
    }
}

/// Convert hex text to RGB.
///
/// The first six characters of the normalized body are read as one base-16
/// number (up to the first non-hex character) and split into channels.
/// Alpha digits are ignored. Text with no leading hex digits is black.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let normalized = normalize_hex(hex);
    let head: String = normalized.chars().take(6).collect();
    let n = number::to_int32(number::parse_hex_prefix(&head));

    Rgb::new(
        f64::from((n >> 16) & 0xff),
        f64::from((n >> 8) & 0xff),
        f64::from(n & 0xff),
    )
}

/// Format one channel as two lowercase hex digits after clamping and rounding.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to 0-255 first"
)]
fn channel_hex(value: f64) -> String {
    let channel = number::clamp(number::round_half_up(value), 0.0, 255.0);
    if channel.is_nan() {
        // NaN survives clamping and prints literally.
        return "NaN".to_string();
    }
    format!("{:02x}", channel as u8)
}

/// Convert RGB to `#rrggbb`.
///
/// Each channel is rounded, clamped to `0..=255` and written as two lowercase
/// hex digits.
#[must_use]
pub fn rgb_to_hex(rgb: Rgb) -> String {
    let mut hex = String::with_capacity(7);
    hex.push('#');
    for channel in [rgb.r, rgb.g, rgb.b] {
        hex.push_str(&channel_hex(channel));
    }
    hex
}

/// Pull an RGB triple out of free text such as `rgb(12, 34, 56)`.
///
/// The first three runs of digits and dots are assigned to red, green and
/// blue in order; each is read as a leading integer (`12.7` is `12`, `.` is
/// `NaN`). Missing runs count as `0`.
#[must_use]
pub fn parse_loose_rgb(text: &str) -> Rgb {
    let tokens: SmallVec<[&str; 3]> = NUMBER_TOKEN_RE
        .find_iter(text)
        .take(3)
        .map(|m| m.as_str())
        .collect();
    let channel = |idx: usize| number::parse_int_prefix(tokens.get(idx).copied().unwrap_or("0"));

    Rgb::new(channel(0), channel(1), channel(2))
}

/// Pull an HSL triple out of free text such as `hsl(200deg, 50.5%, 10.2%)`.
///
/// Works like [`parse_loose_rgb`] but keeps fractions, since saturation and
/// lightness carry one decimal place. A malformed run such as `1.2.3` is
/// `NaN`.
#[must_use]
pub fn parse_loose_hsl(text: &str) -> Hsl {
    let tokens: SmallVec<[&str; 3]> = NUMBER_TOKEN_RE
        .find_iter(text)
        .take(3)
        .map(|m| m.as_str())
        .collect();
    let component = |idx: usize| number::coerce(tokens.get(idx).copied().unwrap_or("0"));

    Hsl::new(component(0), component(1), component(2))
}

/// Convert HSL to RGB.
///
/// Channels are picked by 60° hue sector. Only `0 <= h < 360` lands in a
/// sector; any other hue (including exactly 360 and `NaN`) contributes no
/// chroma, so every channel is just the lightness offset.
#[must_use]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if (0.0..60.0).contains(&h) {
        (c, x, 0.0)
    } else if (60.0..120.0).contains(&h) {
        (x, c, 0.0)
    } else if (120.0..180.0).contains(&h) {
        (0.0, c, x)
    } else if (180.0..240.0).contains(&h) {
        (0.0, x, c)
    } else if (240.0..300.0).contains(&h) {
        (x, 0.0, c)
    } else if (300.0..360.0).contains(&h) {
        (c, 0.0, x)
    } else {
        (0.0, 0.0, 0.0)
    };

    let channel = |value: f64| number::round_half_up((value + m) * 255.0);
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Convert RGB to HSL.
///
/// Hue is rounded to whole degrees and wrapped into `0..360` when negative.
/// Saturation and lightness are percentages rounded to one decimal place.
/// An achromatic color (all channels equal) has hue and saturation `0`.
#[must_use]
#[allow(clippy::float_cmp, reason = "max channel is selected by exact identity")]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r / 255.0;
    let g = rgb.g / 255.0;
    let b = rgb.b / 255.0;

    let chroma_min = number::min(number::min(r, g), b);
    let chroma_max = number::max(number::max(r, g), b);
    let delta = chroma_max - chroma_min;

    let sector = if delta == 0.0 {
        0.0
    } else if chroma_max == r {
        ((g - b) / delta) % 6.0
    } else if chroma_max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let mut h = number::round_half_up(sector * 60.0);
    if h < 0.0 {
        h += 360.0;
    }

    let l = (chroma_max + chroma_min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };

    Hsl::new(
        h,
        number::round_to_tenth(s * 100.0),
        number::round_to_tenth(l * 100.0),
    )
}
