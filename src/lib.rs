//! # chroma_convert
//!
//! Conversion between hex, RGB and HSL color notations.
//!
//! The core conversions are lenient: malformed text produces a result (often
//! zeros or `NaN`) rather than an error, the way a form that converts
//! whatever the user typed would behave. Validating parsers live alongside
//! them for callers that want errors instead.
//!
//! ## Quick Start
//!
//! ```rust
//! use chroma_convert::prelude::*;
//!
//! let rgb = hex_to_rgb(&normalize_hex("#f80"));
//! assert_eq!(rgb, Rgb::new(255.0, 136.0, 0.0));
//! assert_eq!(render_hsl(rgb_to_hsl(rgb)), "hsl(32deg, 100%, 50%)");
//! ```
//!
//! ## Core Concepts
//!
//! - **Rgb / Hsl**: Plain numeric color triples, not validated
//! - **convert**: Hex normalization and the three conversions
//! - **css**: Rendering of `rgb(...)`, `hsl(...)` and `#hex` literals
//! - **form**: Headless model of the seven-field converter form
//! - **terminal**: Color preview swatch and capability detection

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod convert;
pub mod css;
pub mod form;
pub mod logging;
pub mod number;
pub mod terminal;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::color::{
        ColorParseError, ColorSpace, Hsl, Rgb, parse_hex_strict, parse_hsl_strict,
        parse_rgb_strict,
    };
    pub use crate::convert::{
        hex_to_rgb, hsl_to_rgb, normalize_hex, parse_loose_hsl, parse_loose_rgb, rgb_to_hex,
        rgb_to_hsl,
    };
    pub use crate::css::{render_hex, render_hsl, render_rgb};
    pub use crate::form::{Conversion, ConverterForm, Field, Key, KeyOutcome};
    pub use crate::terminal::{SwatchMode, detect_swatch_mode, write_swatch};
}

// Re-export key types at crate root
pub use color::{ColorParseError, ColorSpace, Hsl, Rgb};
pub use form::{Conversion, ConverterForm};
pub use logging::ConsoleLogger;
