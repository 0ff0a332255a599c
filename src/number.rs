//! Lenient numeric coercion.
//!
//! The converters never reject input. Text that does not look like a number
//! degrades to `NaN` (or `0` when the text is empty) and that value flows
//! through the arithmetic untouched. The helpers here pin down exactly how
//! that degradation happens so every conversion path agrees on it:
//!
//! - [`coerce`] reads a whole string as a number (`""` is `0`, junk is `NaN`).
//! - [`parse_int_prefix`] and [`parse_hex_prefix`] read the longest leading
//!   integer and ignore whatever follows.
//! - [`round_half_up`] and [`round_to_tenth`] are the two rounding modes used
//!   by the color math.
//! - [`min`], [`max`] and [`clamp`] propagate `NaN` instead of hiding it.
//! - [`format_number`] prints a value the way CSS literals expect it.

use regex::Regex;
use std::sync::LazyLock;

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid regex")
});

/// Coerce a whole string to a number.
///
/// Surrounding whitespace is ignored and an empty string is `0`. Decimal
/// literals (with optional sign and exponent), `Infinity` and the `0x`, `0o`
/// and `0b` integer prefixes are understood. Anything else is `NaN`.
#[must_use]
pub fn coerce(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix_body = |prefix_lower: &str, prefix_upper: &str| {
        text.strip_prefix(prefix_lower)
            .or_else(|| text.strip_prefix(prefix_upper))
    };
    for (lower, upper, radix) in [("0x", "0X", 16), ("0o", "0O", 8), ("0b", "0B", 2)] {
        if let Some(body) = radix_body(lower, upper) {
            return digits_value(body, radix).unwrap_or(f64::NAN);
        }
    }

    if DECIMAL_RE.is_match(text) {
        text.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Value of a string made only of digits in `radix`, or `None` if it is
/// empty or holds any other character.
fn digits_value(body: &str, radix: u32) -> Option<f64> {
    if body.is_empty() {
        return None;
    }
    body.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// Split an optional leading sign off `text` (after leading whitespace).
fn split_sign(text: &str) -> (f64, &str) {
    let text = text.trim_start();
    if let Some(rest) = text.strip_prefix('-') {
        (-1.0, rest)
    } else {
        (1.0, text.strip_prefix('+').unwrap_or(text))
    }
}

/// Read the leading run of characters that are digits in `radix`.
fn leading_digits(text: &str, radix: u32) -> Option<f64> {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(text.len(), |(idx, _)| idx);
    digits_value(&text[..end], radix)
}

/// Parse the leading base-10 integer of `text`, ignoring anything after it.
///
/// `"12.9px"` is `12`; `"."` and `""` are `NaN`.
#[must_use]
pub fn parse_int_prefix(text: &str) -> f64 {
    let (sign, rest) = split_sign(text);
    leading_digits(rest, 10).map_or(f64::NAN, |value| sign * value)
}

/// Parse the leading base-16 integer of `text`, ignoring anything after it.
///
/// An optional sign and an optional `0x` prefix are accepted. `"12zz"` is
/// `0x12`; `"zz"` is `NaN`.
#[must_use]
pub fn parse_hex_prefix(text: &str) -> f64 {
    let (sign, rest) = split_sign(text);
    let rest = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    leading_digits(rest, 16).map_or(f64::NAN, |value| sign * value)
}

/// Wrap a number into a 32-bit signed integer for bitwise work.
///
/// `NaN` and infinities become `0`; finite values are truncated and reduced
/// modulo 2^32.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "value is reduced into 0..2^32 before the casts"
)]
pub fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u64 as u32 as i32
}

/// Round to the nearest integer, ties toward positive infinity.
///
/// `2.5` is `3`, `-2.5` is `-2`. `NaN` and infinities pass through.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to one decimal place, ties away from zero.
///
/// Rounding is decided on the exact binary value, so `50.05` (stored just
/// below the tie) becomes `50.0` while `0.25` (an exact tie) becomes `0.3`.
#[must_use]
#[allow(clippy::float_cmp, reason = "tie detection needs exact comparison")]
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e21 {
        return value;
    }

    let sign = if value.is_sign_negative() { -1.0 } else { 1.0 };
    let magnitude = value.abs();

    // Exact ties are odd multiples of 1/4.
    let quarters = magnitude * 4.0;
    let rounded = if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        (magnitude * 10.0).ceil() / 10.0
    } else {
        format!("{magnitude:.1}").parse::<f64>().unwrap_or(f64::NAN)
    };

    sign * rounded
}

/// Smaller of two numbers; `NaN` if either is `NaN`.
#[must_use]
pub fn min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Larger of two numbers; `NaN` if either is `NaN`.
#[must_use]
pub fn max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Clamp into `[low, high]`, keeping `NaN` as `NaN`.
#[must_use]
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    min(high, max(low, value))
}

/// Format a number for interpolation into CSS text.
///
/// Integral values print without a fraction, other values use the shortest
/// representation that round-trips. When two shortest digit strings are
/// equally close to the exact value, the one ending in an even digit wins.
/// Negative zero prints as `0`; very large and very small magnitudes switch
/// to exponent form (`1e+21`, `1e-7`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }

    even_tie_digits(value, format!("{value}"))
}

/// Re-resolve a shortest decimal whose last digit sits on an exact tie.
///
/// `shortest` has `n` fraction digits. If the exact binary value is halfway
/// between the two `n`-digit neighbours and both read back as `value`, pick
/// the neighbour with the even last digit.
fn even_tie_digits(value: f64, shortest: String) -> String {
    let Some((_, fraction)) = shortest.split_once('.') else {
        return shortest;
    };
    let digits = fraction.len();

    // Finite values in plain-notation range need fewer than 80 fraction
    // digits to print exactly.
    let exact = format!("{value:.100}");
    let Some(point) = exact.find('.') else {
        return shortest;
    };
    let (low, rest) = exact.split_at(point + 1 + digits);
    let mut rest = rest.bytes();
    if rest.next() != Some(b'5') || !rest.all(|b| b == b'0') {
        return shortest;
    }

    let high = increment_last_digit(low);
    let reads_back = |text: &str| text.parse::<f64>().is_ok_and(|parsed| parsed == value);
    if !reads_back(low) || !reads_back(&high) {
        return shortest;
    }

    let low_is_even = low.bytes().last().is_some_and(|b| (b - b'0') % 2 == 0);
    if low_is_even { low.to_string() } else { high }
}

/// Add one unit in the last place of a plain decimal string.
fn increment_last_digit(text: &str) -> String {
    let mut bytes = text.as_bytes().to_vec();
    let mut carry = true;
    for byte in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *byte {
            b'9' => *byte = b'0',
            b'0'..=b'8' => {
                *byte += 1;
                carry = false;
            }
            _ => {}
        }
    }

    let mut out = String::from_utf8(bytes).unwrap_or_default();
    if carry {
        let at = usize::from(out.starts_with('-'));
        out.insert(at, '1');
    }
    if out.contains('.') {
        let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(trimmed);
    }
    out
}
