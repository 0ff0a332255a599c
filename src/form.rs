//! Headless model of the converter form.
//!
//! The form has one hex field, three RGB channel fields and three HSL
//! component fields. The user edits one group, presses convert, and the
//! other two groups plus a preview color are derived from it. This module
//! keeps that behaviour (input sanitizing, paste handling, keyboard
//! navigation between channel fields, conversion dispatch) free of any UI
//! toolkit so it can be driven by a terminal front end or by tests.
//!
//! # Example
//!
//! ```
//! use chroma_convert::form::{ConverterForm, Field};
//!
//! let mut form = ConverterForm::new();
//! form.focus(Field::Hex);
//! form.input(Field::Hex, "#f80", None);
//!
//! let conversion = form.convert().expect("a field group was selected");
//! assert_eq!(conversion.hex, "#ff8800");
//! assert_eq!(form.value(Field::Green), "136");
//! assert_eq!(form.value(Field::Hue), "32");
//! assert_eq!(form.preview(), Some("#ff8800"));
//! ```

use crate::color::{self, ColorParseError, ColorSpace, Hsl, Rgb};
use crate::convert;
use crate::css;
use crate::number;

/// One text field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Hex,
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Lightness,
}

impl Field {
    /// All fields, in tab order.
    pub const ALL: [Self; 7] = [
        Self::Hex,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Hue,
        Self::Saturation,
        Self::Lightness,
    ];

    /// The color space this field belongs to.
    #[must_use]
    pub const fn space(self) -> ColorSpace {
        match self {
            Self::Hex => ColorSpace::Hex,
            Self::Red | Self::Green | Self::Blue => ColorSpace::Rgb,
            Self::Hue | Self::Saturation | Self::Lightness => ColorSpace::Hsl,
        }
    }

    /// Lowercase field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Lightness => "lightness",
        }
    }

    /// The channel before this one in the same group.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Green => Some(Self::Red),
            Self::Blue => Some(Self::Green),
            Self::Saturation => Some(Self::Hue),
            Self::Lightness => Some(Self::Saturation),
            Self::Hex | Self::Red | Self::Hue => None,
        }
    }

    /// The channel after this one in the same group.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Red => Some(Self::Green),
            Self::Green => Some(Self::Blue),
            Self::Hue => Some(Self::Saturation),
            Self::Saturation => Some(Self::Lightness),
            Self::Hex | Self::Blue | Self::Lightness => None,
        }
    }

    /// Largest value typed input may hold; `None` for the hex field.
    #[must_use]
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::Hex => None,
            Self::Red | Self::Green | Self::Blue => Some(255.0),
            Self::Hue => Some(360.0),
            Self::Saturation | Self::Lightness => Some(100.0),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// A key press delivered to a channel field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Char(char),
    Other,
}

/// What happened to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key edits the field normally.
    Accepted,
    /// The key was swallowed; focus moved to `focus` if there was one.
    Blocked { focus: Option<Field> },
}

/// One color expressed in every representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The space the color was read from.
    pub source: ColorSpace,
    /// Canonical `#rrggbb`.
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
    /// CSS literal of the source value, used for the preview.
    ///
    /// On the form path this is built from the field text as typed and may
    /// be invalid CSS (`rgb(,0,0)`).
    pub css: String,
}

impl Conversion {
    /// Derive everything from hex text (lenient).
    #[must_use]
    pub fn from_hex(text: &str) -> Self {
        let normalized = convert::normalize_hex(text);
        let rgb = convert::hex_to_rgb(&normalized);
        Self {
            source: ColorSpace::Hex,
            hex: convert::rgb_to_hex(rgb),
            rgb,
            hsl: convert::rgb_to_hsl(rgb),
            css: css::render_hex(&normalized),
        }
    }

    /// Derive everything from an RGB triple.
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self {
            source: ColorSpace::Rgb,
            hex: convert::rgb_to_hex(rgb),
            rgb,
            hsl: convert::rgb_to_hsl(rgb),
            css: css::render_rgb(rgb),
        }
    }

    /// Derive everything from an HSL triple.
    #[must_use]
    pub fn from_hsl(hsl: Hsl) -> Self {
        let rgb = convert::hsl_to_rgb(hsl);
        Self {
            source: ColorSpace::Hsl,
            hex: convert::rgb_to_hex(rgb),
            rgb,
            hsl,
            css: css::render_hsl(hsl),
        }
    }

    /// Read `text` in `space` leniently and derive everything from it.
    #[must_use]
    pub fn from_text(space: ColorSpace, text: &str) -> Self {
        match space {
            ColorSpace::Hex => Self::from_hex(text.trim()),
            ColorSpace::Rgb => Self::from_rgb(convert::parse_loose_rgb(text)),
            ColorSpace::Hsl => Self::from_hsl(convert::parse_loose_hsl(text)),
        }
    }

    /// Read `text` in `space` with the validating parsers.
    ///
    /// # Errors
    ///
    /// Returns the parser's `ColorParseError` for malformed text.
    pub fn from_text_strict(space: ColorSpace, text: &str) -> Result<Self, ColorParseError> {
        match space {
            ColorSpace::Hex => {
                color::parse_hex_strict(text)?;
                Ok(Self::from_hex(text.trim()))
            }
            ColorSpace::Rgb => color::parse_rgb_strict(text).map(Self::from_rgb),
            ColorSpace::Hsl => color::parse_hsl_strict(text).map(Self::from_hsl),
        }
    }
}

/// State of the converter form.
#[derive(Debug, Clone, Default)]
pub struct ConverterForm {
    values: [String; 7],
    focused: Option<Field>,
    last_selected: Option<ColorSpace>,
    preview: Option<String>,
}

impl ConverterForm {
    /// An empty form with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Replace the text of `field` without applying any input rule.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// The field holding focus, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<Field> {
        self.focused
    }

    /// The group that [`convert`](Self::convert) will read from.
    #[must_use]
    pub const fn last_selected(&self) -> Option<ColorSpace> {
        self.last_selected
    }

    /// CSS color of the preview surface after the last conversion.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Focus `field`, making its group the conversion source.
    pub fn focus(&mut self, field: Field) {
        self.focused = Some(field);
        self.last_selected = Some(field.space());
    }

    /// Apply an edit that left `field` holding `value`.
    ///
    /// `data` is the text that was typed, if the edit was typing.
    /// The hex field always keeps a leading `#`: an emptied field becomes
    /// `#`, and typing into a field that lost its `#` starts over with
    /// `#<typed>`. Numeric channel fields are clamped to `0..=upper_bound`;
    /// text that is not a number is left alone.
    pub fn input(&mut self, field: Field, value: &str, data: Option<&str>) {
        let sanitized = match field.upper_bound() {
            None => sanitize_hex(value, data),
            Some(upper) => {
                let n = number::coerce(value);
                if n > upper {
                    number::format_number(upper)
                } else if n < 0.0 {
                    "0".to_string()
                } else {
                    value.to_string()
                }
            }
        };

        if sanitized != value {
            log::debug!("{} input {value:?} became {sanitized:?}", field.name());
        }
        self.set_value(field, sanitized);
    }

    /// Paste `text` into the hex field.
    ///
    /// When both the pasted text and the current value start with `#`, the
    /// value becomes the pasted digits cut to the current value's length.
    /// Any other paste leaves the value unchanged.
    pub fn paste(&mut self, text: &str) {
        let current = self.value(Field::Hex);
        if text.starts_with('#') && current.starts_with('#') {
            let keep = current.chars().count().saturating_sub(1);
            let pasted: String = text.chars().skip(1).take(keep).collect();
            log::debug!("hex paste {text:?} kept {pasted:?}");
            self.set_value(Field::Hex, pasted);
        }
    }

    /// Handle a key press in `field`.
    ///
    /// Backspace in an empty channel jumps to the previous channel. Any other
    /// key in a channel that already holds more than two characters is
    /// swallowed and focus jumps to the next channel. The hex field accepts
    /// every key.
    pub fn key(&mut self, field: Field, key: Key) -> KeyOutcome {
        if field == Field::Hex {
            return KeyOutcome::Accepted;
        }

        let len = self.value(field).chars().count();
        let target = if len == 0 && key == Key::Backspace {
            field.previous()
        } else if len > 2 && key != Key::Backspace {
            field.next()
        } else {
            return KeyOutcome::Accepted;
        };

        if let Some(next) = target {
            log::trace!("focus moves from {} to {}", field.name(), next.name());
            self.focus(next);
        }
        KeyOutcome::Blocked { focus: target }
    }

    /// Convert from the last selected group and write the results back.
    ///
    /// Returns `None` and changes nothing when no field was ever focused.
    /// The returned CSS literal is built from the source fields as typed,
    /// so the preview only changes when that literal is a valid color.
    pub fn convert(&mut self) -> Option<Conversion> {
        let Some(source) = self.last_selected else {
            log::trace!("convert requested with nothing selected");
            return None;
        };
        log::trace!("converting from {source}");

        let conversion = match source {
            ColorSpace::Hex => {
                let conversion = Conversion::from_hex(self.value(Field::Hex));
                self.write_rgb(conversion.rgb);
                self.write_hsl(conversion.hsl);
                conversion
            }
            ColorSpace::Rgb => {
                let mut conversion = Conversion::from_rgb(self.read_rgb());
                conversion.css =
                    css::render_rgb_text(self.texts([Field::Red, Field::Green, Field::Blue]));
                self.write_hsl(conversion.hsl);
                self.set_value(Field::Hex, conversion.hex.clone());
                conversion
            }
            ColorSpace::Hsl => {
                let mut conversion = Conversion::from_hsl(self.read_hsl());
                conversion.css = css::render_hsl_text(self.texts([
                    Field::Hue,
                    Field::Saturation,
                    Field::Lightness,
                ]));
                self.write_rgb(conversion.rgb);
                self.set_value(Field::Hex, conversion.hex.clone());
                conversion
            }
        };

        if css::is_valid(&conversion.css) {
            self.preview = Some(conversion.css.clone());
        } else {
            log::debug!("preview kept: {:?} is not a valid color", conversion.css);
        }
        Some(conversion)
    }

    fn texts(&self, fields: [Field; 3]) -> [&str; 3] {
        fields.map(|field| self.value(field))
    }

    fn read_rgb(&self) -> Rgb {
        Rgb::new(
            number::coerce(self.value(Field::Red)),
            number::coerce(self.value(Field::Green)),
            number::coerce(self.value(Field::Blue)),
        )
    }

    fn read_hsl(&self) -> Hsl {
        Hsl::new(
            number::coerce(self.value(Field::Hue)),
            number::coerce(self.value(Field::Saturation)),
            number::coerce(self.value(Field::Lightness)),
        )
    }

    fn write_rgb(&mut self, rgb: Rgb) {
        self.set_value(Field::Red, number::format_number(rgb.r));
        self.set_value(Field::Green, number::format_number(rgb.g));
        self.set_value(Field::Blue, number::format_number(rgb.b));
    }

    fn write_hsl(&mut self, hsl: Hsl) {
        self.set_value(Field::Hue, number::format_number(hsl.h));
        self.set_value(Field::Saturation, number::format_number(hsl.s));
        self.set_value(Field::Lightness, number::format_number(hsl.l));
    }
}

fn sanitize_hex(value: &str, data: Option<&str>) -> String {
    if value.is_empty() {
        return "#".to_string();
    }
    match data {
        Some(typed) if !value.starts_with('#') && !typed.is_empty() => format!("#{typed}"),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_groups() {
        assert_eq!(Field::Hex.space(), ColorSpace::Hex);
        assert_eq!(Field::Blue.space(), ColorSpace::Rgb);
        assert_eq!(Field::Lightness.space(), ColorSpace::Hsl);
    }

    #[test]
    fn test_field_navigation_stays_in_group() {
        assert_eq!(Field::Red.previous(), None);
        assert_eq!(Field::Red.next(), Some(Field::Green));
        assert_eq!(Field::Blue.next(), None);
        assert_eq!(Field::Hue.previous(), None);
        assert_eq!(Field::Lightness.previous(), Some(Field::Saturation));
        assert_eq!(Field::Hex.next(), None);
    }

    #[test]
    fn test_sanitize_hex() {
        assert_eq!(sanitize_hex("", None), "#");
        assert_eq!(sanitize_hex("a", Some("a")), "#a");
        assert_eq!(sanitize_hex("ab", None), "ab");
        assert_eq!(sanitize_hex("#ab", Some("b")), "#ab");
    }

    #[test]
    fn test_focus_sets_source() {
        let mut form = ConverterForm::new();
        assert_eq!(form.last_selected(), None);
        form.focus(Field::Saturation);
        assert_eq!(form.focused(), Some(Field::Saturation));
        assert_eq!(form.last_selected(), Some(ColorSpace::Hsl));
    }

    #[test]
    fn test_convert_without_selection_is_noop() {
        let mut form = ConverterForm::new();
        form.set_value(Field::Hex, "#ff0000");
        assert_eq!(form.convert(), None);
        assert_eq!(form.value(Field::Red), "");
        assert_eq!(form.preview(), None);
    }

    #[test]
    fn test_conversion_from_text_lenient() {
        let c = Conversion::from_text(ColorSpace::Rgb, "rgb(255, 0, 0)");
        assert_eq!(c.hex, "#ff0000");
        assert_eq!(c.hsl, Hsl::new(0.0, 100.0, 50.0));
        assert_eq!(c.css, "rgb(255,0,0)");
    }

    #[test]
    fn test_conversion_from_text_strict() {
        let c = Conversion::from_text_strict(ColorSpace::Hex, " #0f0 ").unwrap();
        assert_eq!(c.rgb, Rgb::new(0.0, 255.0, 0.0));
        assert_eq!(c.css, "#00ff00");
        assert!(Conversion::from_text_strict(ColorSpace::Hex, "#0g0").is_err());
        assert!(Conversion::from_text_strict(ColorSpace::Hsl, "hsl(400, 1%, 1%)").is_err());
    }
}
