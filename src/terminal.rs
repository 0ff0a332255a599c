//! Terminal detection and the color preview swatch.
//!
//! The swatch is the terminal counterpart of a preview surface: a run of
//! cells painted with the converted color as background. Whether it can be
//! drawn, and with how many colors, is decided from the environment.

use std::io::{self, IsTerminal, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor};

use crate::color::Rgb;
use crate::convert;

/// How the swatch can be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwatchMode {
    /// 24-bit RGB background.
    TrueColor,
    /// Nearest color of the 256-color palette.
    EightBit,
    /// No color output at all.
    #[default]
    Off,
}

impl SwatchMode {
    /// Get the name of this mode.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TrueColor => "truecolor",
            Self::EightBit => "256",
            Self::Off => "off",
        }
    }
}

/// Snapshot of the environment variables that affect color output.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub no_color: Option<String>,
    pub force_color: Option<String>,
    pub colorterm: Option<String>,
    pub term: Option<String>,
}

impl EnvSettings {
    /// Read the settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            no_color: std::env::var("NO_COLOR").ok(),
            force_color: std::env::var("FORCE_COLOR").ok(),
            colorterm: std::env::var("COLORTERM").ok(),
            term: std::env::var("TERM").ok(),
        }
    }
}

fn force_color_forces_terminal(force_color: Option<&str>) -> bool {
    let Some(force_color) = force_color else {
        return false;
    };
    let force_color = force_color.trim();
    // Treat empty / "0" as "unset" (no override).
    !force_color.is_empty() && force_color != "0"
}

/// Detect the swatch mode for stdout.
///
/// Checks environment variables to determine color capabilities:
/// - `NO_COLOR` (non-empty): no color
/// - `FORCE_COLOR` (non-empty, not `0`): treat output as a terminal
/// - `COLORTERM=truecolor` or `24bit`: 24-bit color
/// - `TERM=dumb` or `TERM=unknown`: no color
/// - Otherwise: 256 colors on a terminal, no color elsewhere
#[must_use]
pub fn detect_swatch_mode() -> SwatchMode {
    detect_swatch_mode_with(&EnvSettings::from_env(), io::stdout().is_terminal())
}

/// Returns true if log lines on stderr may carry color.
#[must_use]
pub fn stderr_supports_color() -> bool {
    detect_swatch_mode_with(&EnvSettings::from_env(), io::stderr().is_terminal())
        != SwatchMode::Off
}

/// Detect the swatch mode from an explicit environment snapshot.
#[must_use]
pub fn detect_swatch_mode_with(env: &EnvSettings, is_tty: bool) -> SwatchMode {
    // Check NO_COLOR env var (https://no-color.org/)
    if env
        .no_color
        .as_deref()
        .is_some_and(|value| !value.is_empty())
    {
        return SwatchMode::Off;
    }

    if !is_tty && !force_color_forces_terminal(env.force_color.as_deref()) {
        return SwatchMode::Off;
    }

    if let Some(colorterm) = env.colorterm.as_ref() {
        let colorterm = colorterm.trim().to_lowercase();
        if colorterm == "truecolor" || colorterm == "24bit" {
            return SwatchMode::TrueColor;
        }
    }

    let term = env
        .term
        .as_ref()
        .map(|value| value.trim().to_lowercase())
        .unwrap_or_default();
    if term == "dumb" || term == "unknown" {
        return SwatchMode::Off;
    }

    SwatchMode::EightBit
}

/// Convert RGB to the nearest 256-color palette index.
#[must_use]
pub fn nearest_eight_bit(triplet: (u8, u8, u8)) -> u8 {
    let hsl = convert::rgb_to_hsl(Rgb::from(triplet));
    let lightness = hsl.l / 100.0;

    // Grayscale detection
    if hsl.s < 15.0 {
        if lightness < 0.04 {
            return 16; // Near black
        }
        if lightness > 0.96 {
            return 231; // Near white
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "result is in 0-24 range"
        )]
        let gray_index = ((lightness - 0.04) / 0.92 * 24.0).round() as u8;
        return 232 + gray_index.min(23);
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "values are in 0-5 range"
    )]
    let quantize = |v: u8| -> u8 {
        let level = if v < 95 {
            (f64::from(v) / 95.0).round() as u8
        } else {
            1 + ((f64::from(v) - 95.0) / 40.0).round() as u8
        };
        level.min(5)
    };

    let (r, g, b) = triplet;
    16 + quantize(r) * 36 + quantize(g) * 6 + quantize(b)
}

/// Paint `width` cells of `rgb` as background color.
///
/// Writes nothing in [`SwatchMode::Off`]. The caller flushes.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_swatch<W: Write>(
    out: &mut W,
    rgb: Rgb,
    width: usize,
    mode: SwatchMode,
) -> io::Result<()> {
    let (r, g, b) = rgb.to_triplet();
    let color = match mode {
        SwatchMode::TrueColor => TermColor::Rgb { r, g, b },
        SwatchMode::EightBit => TermColor::AnsiValue(nearest_eight_bit((r, g, b))),
        SwatchMode::Off => return Ok(()),
    };
    queue!(out, SetBackgroundColor(color), Print(" ".repeat(width)), ResetColor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(colorterm: Option<&str>, term: Option<&str>) -> EnvSettings {
        EnvSettings {
            colorterm: colorterm.map(str::to_string),
            term: term.map(str::to_string),
            ..EnvSettings::default()
        }
    }

    #[test]
    fn test_no_color_disables() {
        let settings = EnvSettings {
            no_color: Some("1".to_string()),
            colorterm: Some("truecolor".to_string()),
            ..EnvSettings::default()
        };
        assert_eq!(detect_swatch_mode_with(&settings, true), SwatchMode::Off);
    }

    #[test]
    fn test_empty_no_color_is_ignored() {
        let settings = EnvSettings {
            no_color: Some(String::new()),
            ..EnvSettings::default()
        };
        assert_eq!(detect_swatch_mode_with(&settings, true), SwatchMode::EightBit);
    }

    #[test]
    fn test_not_a_tty_is_off() {
        let settings = env(Some("truecolor"), Some("xterm-256color"));
        assert_eq!(detect_swatch_mode_with(&settings, false), SwatchMode::Off);
    }

    #[test]
    fn test_force_color_overrides_tty() {
        let mut settings = env(Some("24bit"), None);
        settings.force_color = Some("1".to_string());
        assert_eq!(detect_swatch_mode_with(&settings, false), SwatchMode::TrueColor);

        settings.force_color = Some("0".to_string());
        assert_eq!(detect_swatch_mode_with(&settings, false), SwatchMode::Off);
    }

    #[test]
    fn test_colorterm_truecolor() {
        let settings = env(Some(" TrueColor "), Some("xterm"));
        assert_eq!(detect_swatch_mode_with(&settings, true), SwatchMode::TrueColor);
    }

    #[test]
    fn test_dumb_terminal_is_off() {
        assert_eq!(
            detect_swatch_mode_with(&env(None, Some("dumb")), true),
            SwatchMode::Off
        );
        assert_eq!(
            detect_swatch_mode_with(&env(None, Some("unknown")), true),
            SwatchMode::Off
        );
    }

    #[test]
    fn test_default_terminal_is_eight_bit() {
        assert_eq!(
            detect_swatch_mode_with(&env(None, Some("xterm")), true),
            SwatchMode::EightBit
        );
        assert_eq!(detect_swatch_mode_with(&env(None, None), true), SwatchMode::EightBit);
    }

    #[test]
    fn test_nearest_eight_bit() {
        assert_eq!(nearest_eight_bit((255, 0, 0)), 196);
        assert_eq!(nearest_eight_bit((0, 0, 255)), 21);
        assert_eq!(nearest_eight_bit((0, 0, 0)), 16);
        assert_eq!(nearest_eight_bit((255, 255, 255)), 231);
        assert_eq!(nearest_eight_bit((128, 128, 128)), 244);
    }

    #[test]
    fn test_write_swatch_truecolor() {
        let mut out = Vec::new();
        write_swatch(&mut out, Rgb::new(255.0, 0.0, 0.0), 4, SwatchMode::TrueColor).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("48;2;255;0;0m"), "got {text:?}");
        assert!(text.contains("    "));
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_write_swatch_eight_bit_clamps_channels() {
        let mut out = Vec::new();
        write_swatch(&mut out, Rgb::new(300.0, -5.0, 0.0), 2, SwatchMode::EightBit).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("48;5;196m"), "got {text:?}");
    }

    #[test]
    fn test_write_swatch_off_writes_nothing() {
        let mut out = Vec::new();
        write_swatch(&mut out, Rgb::new(1.0, 2.0, 3.0), 8, SwatchMode::Off).unwrap();
        assert!(out.is_empty());
    }
}
