//! # Swatch Tokens - Design Token Aggregation
//!
//! `swatch-tokens` reduces raw computed-style samples from a rendered page to a
//! small set of ranked design tokens: dominant colors, fonts, border styles and
//! a light/dark verdict.
//!
//! Everything here is pure. Collection from a live page happens elsewhere (see
//! the `swatch` crate); this crate only sees strings as a browser reports them.
//!
//! ## Core Concepts
//!
//! - [`to_hex`] / [`to_rgb`]: canonical color normalization, where transparent
//!   means "no color"
//! - [`FrequencyTable`] / [`rank`]: counting with stable, first-seen tie-breaks
//! - [`BorderAnalysis`]: most common radius, width and color
//! - [`FontAnalysis`]: font variants grouped by family, classified and ranked
//! - [`ColorSummary`]: landmark colors, palettes and button pairs
//! - [`ThemeSignal`] / [`classify`]: light or dark, by a fixed rule chain
//!
//! ## Quick Start
//!
//! ```rust
//! use swatch_tokens::{classify, ColorMode, ThemeReading, ThemeSignal};
//!
//! let reading = ThemeReading {
//!     body_background: Some("rgb(24, 24, 27)".into()),
//!     ..Default::default()
//! };
//! let signal = ThemeSignal::from_reading(&reading);
//! assert_eq!(classify(&signal).0, ColorMode::Dark);
//! ```

pub mod border;
pub mod color;
pub mod error;
pub mod font;
pub mod frequency;
pub mod palette;
pub mod theme;

pub use border::{
    normalize_radius, parse_border_shorthand, BorderAnalysis, BorderProperties, BorderSample,
    BorderShorthand, BorderTables, BorderUsage,
};
pub use color::{is_fully_transparent, parse_color, to_hex, to_rgb, HexColor, ParsedColor, Rgb};
pub use error::ParseFailure;
pub use font::{
    categorize_font_type, classify_element, is_web_font, parse_font_family, ElementRole,
    FamilyVariant, FontAnalysis, FontFamily, FontKey, FontSummary, FontType, FontUsage,
    FontVariant, FontVariants, SampleElement, TopFont, NOT_DETECTED,
};
pub use frequency::{rank, FrequencyTable};
pub use palette::{
    is_valid_button_pair, ButtonColorPair, ColorPair, ColorSample, ColorSummary,
    ElementColorProfile,
};
pub use theme::{
    classify, ColorMode, ThemeReading, ThemeRule,
    ThemeSignal, DARK_BRIGHTNESS_THRESHOLD, DARK_CLASSES,
};

/// Collection and ranking limits.
///
/// The defaults are the sizes the token summaries are designed around; they
/// can be raised or lowered through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Entries kept in each border and font ranking.
    pub top_entries: usize,
    /// Button color pairs kept in a [`ColorSummary`].
    pub button_pairs: usize,
    /// Sample elements kept per font variant.
    pub sample_elements: usize,
    /// Characters of text kept per sample element.
    pub excerpt_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            top_entries: 5,
            button_pairs: 3,
            sample_elements: 5,
            excerpt_chars: 100,
        }
    }
}
