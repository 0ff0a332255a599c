//! CSS color literals.
//!
//! These renderers interpolate values as given. They do not clamp, round or
//! validate: callers pass values that are already fit for display. The
//! `*_text` variants take the component text verbatim, which is what a form
//! field holds; [`is_valid`] tells whether a browser would accept the result.

use regex::Regex;
use std::sync::LazyLock;

use crate::color::{Hsl, Rgb};
use crate::number::format_number;

/// Render `rgb(R,G,B)` with no spaces after the commas.
#[must_use]
pub fn render_rgb(rgb: Rgb) -> String {
    render_rgb_text([
        &format_number(rgb.r),
        &format_number(rgb.g),
        &format_number(rgb.b),
    ])
}

/// Render `rgb(R,G,B)` from component text.
#[must_use]
pub fn render_rgb_text([r, g, b]: [&str; 3]) -> String {
    format!("rgb({r},{g},{b})")
}

/// Render `hsl(Hdeg, S%, L%)` with an explicit `deg` unit on the hue.
#[must_use]
pub fn render_hsl(hsl: Hsl) -> String {
    render_hsl_text([
        &format_number(hsl.h),
        &format_number(hsl.s),
        &format_number(hsl.l),
    ])
}

/// Render `hsl(Hdeg, S%, L%)` from component text.
#[must_use]
pub fn render_hsl_text([h, s, l]: [&str; 3]) -> String {
    format!("hsl({h}deg, {s}%, {l}%)")
}

/// Prefix a bare hex body with `#`.
///
/// The body is not normalized; pass the output of
/// [`normalize_hex`](crate::convert::normalize_hex).
#[must_use]
pub fn render_hex(body: &str) -> String {
    format!("#{body}")
}

/// Whether a literal produced by this module is valid CSS.
///
/// Components must be CSS numbers (`NaN`, empty text and words are not) and
/// hex bodies must have 3, 4, 6 or 8 hex digits. Invalid literals are what a
/// browser ignores when assigned as a color.
#[must_use]
pub fn is_valid(literal: &str) -> bool {
    static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid regex")
    });

    let components = |inner: &str, units: [&str; 3]| {
        let parts: Vec<&str> = inner.split(',').collect();
        parts.len() == 3
            && parts.iter().zip(units).all(|(part, unit)| {
                let part = part.trim();
                let number = part.strip_suffix(unit).unwrap_or(part).trim_end();
                NUMBER_RE.is_match(number)
            })
    };

    if let Some(body) = literal.strip_prefix('#') {
        matches!(body.len(), 3 | 4 | 6 | 8) && body.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(inner) = literal.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        components(inner, ["", "", ""])
    } else if let Some(inner) = literal.strip_prefix("hsl(").and_then(|s| s.strip_suffix(')')) {
        components(inner, ["deg", "%", "%"])
    } else {
        false
    }
}
