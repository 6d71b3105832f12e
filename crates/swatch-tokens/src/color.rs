//! Color normalization.
//!
//! Computed styles report the same color in several spellings. Everything in
//! this crate compares colors by their canonical form, a lowercase `#rrggbb`
//! [`HexColor`]. A fully transparent color has no canonical form and
//! normalizes to `None`.
//!
//! Accepted inputs:
//!
//! - Hex: `#ff6b35`, `#fff`, or the same digits without the `#`
//! - Functional: `rgb(255, 107, 53)`, `rgba(0, 0, 0, 0.5)`, `rgb(255 107 53 / 50%)`
//! - The keyword `transparent`
//!
//! Named colors (`red`, `rebeccapurple`) are not accepted: computed styles never
//! report them.
//!
//! # Example
//!
//! ```rust
//! use swatch_tokens::{to_hex, to_rgb, Rgb};
//!
//! assert_eq!(to_hex("rgb(255, 107, 53)").unwrap().to_string(), "#ff6b35");
//! assert_eq!(to_rgb("#FFF"), Some(Rgb(255, 255, 255)));
//! assert_eq!(to_hex("rgba(0, 0, 0, 0)"), None);
//! ```

use std::fmt;
use std::str::FromStr;

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};
use serde::{Deserialize, Serialize};

use crate::error::ParseFailure;

/// An opaque 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Perceived brightness, `0.299 R + 0.587 G + 0.114 B`, in `0.0..=255.0`.
    pub fn luma(self) -> f64 {
        let Rgb(r, g, b) = self;
        (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) as f64 / 1000.0
    }

    pub fn to_hex(self) -> HexColor {
        HexColor(self)
    }
}

/// A color in canonical form. Displays and serializes as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(Rgb);

impl HexColor {
    pub fn rgb(self) -> Rgb {
        self.0
    }

    pub fn is_white(self) -> bool {
        self.0 == Rgb::WHITE
    }

    pub fn is_black(self) -> bool {
        self.0 == Rgb::BLACK
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for HexColor {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)?
            .visible()
            .map(Rgb::to_hex)
            .ok_or_else(|| ParseFailure::UnrecognizedColor(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ParseFailure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// A parsed color literal, alpha included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedColor {
    pub rgb: Rgb,
    /// `None` when the literal carried no alpha channel.
    pub alpha: Option<f32>,
}

impl ParsedColor {
    const TRANSPARENT: ParsedColor = ParsedColor {
        rgb: Rgb::BLACK,
        alpha: Some(0.0),
    };

    fn opaque(rgb: Rgb) -> Self {
        ParsedColor { rgb, alpha: None }
    }

    /// True when the alpha channel is present and zero.
    pub fn is_transparent(&self) -> bool {
        self.alpha == Some(0.0)
    }

    /// The color, unless it is fully transparent.
    pub fn visible(self) -> Option<Rgb> {
        if self.is_transparent() {
            None
        } else {
            Some(self.rgb)
        }
    }
}

/// Parses a color literal.
///
/// Returns the color with its alpha channel; `transparent` parses as black with
/// alpha zero. Use [`to_rgb`] or [`to_hex`] when transparency should mean "no
/// color".
pub fn parse_color(input: &str) -> Result<ParsedColor, ParseFailure> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ParseFailure::Empty);
    }

    if value.eq_ignore_ascii_case("transparent") {
        return Ok(ParsedColor::TRANSPARENT);
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).map(ParsedColor::opaque);
    }

    if value.contains('(') {
        return parse_functional(value);
    }

    parse_hex(value)
        .map(ParsedColor::opaque)
        .map_err(|_| ParseFailure::UnrecognizedColor(value.to_string()))
}

/// Converts a color literal to RGB. `None` for anything unparseable or fully
/// transparent.
pub fn to_rgb(color: &str) -> Option<Rgb> {
    parse_color(color).ok().and_then(ParsedColor::visible)
}

/// Converts a color literal to its canonical form. `None` for empty input,
/// `transparent`, zero-alpha colors, and anything unparseable.
pub fn to_hex(color: &str) -> Option<HexColor> {
    to_rgb(color).map(Rgb::to_hex)
}

/// True for `transparent` and for any literal whose alpha is zero.
pub fn is_fully_transparent(color: &str) -> bool {
    matches!(parse_color(color), Ok(parsed) if parsed.is_transparent())
}

/// Parses hex digits (without the `#`), 3 or 6 of them.
fn parse_hex(hex: &str) -> Result<Rgb, ParseFailure> {
    let invalid = || ParseFailure::InvalidHex(hex.to_string());
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    match hex.len() {
        // #rgb -> #rrggbb
        3 => Ok(Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Ok(Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(invalid()),
    }
}

#[derive(Debug, Clone, Copy)]
enum FunctionalError {
    UnknownFunction,
    Component,
}

fn parse_functional(value: &str) -> Result<ParsedColor, ParseFailure> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);

    parse_rgb_function(&mut parser).map_err(|err| match err.kind {
        ParseErrorKind::Custom(FunctionalError::UnknownFunction) => {
            ParseFailure::UnrecognizedColor(value.to_string())
        }
        _ => ParseFailure::InvalidComponent(value.to_string()),
    })
}

fn parse_rgb_function<'i, 't>(
    parser: &mut Parser<'i, 't>,
) -> Result<ParsedColor, ParseError<'i, FunctionalError>> {
    let name = parser.expect_function()?.clone();
    if !name.eq_ignore_ascii_case("rgb") && !name.eq_ignore_ascii_case("rgba") {
        return Err(parser.new_custom_error(FunctionalError::UnknownFunction));
    }

    let color = parser.parse_nested_block(parse_rgb_components)?;
    parser.expect_exhausted()?;
    Ok(color)
}

/// Parses the inside of `rgb(...)`: three channels, then an optional alpha.
/// Commas, whitespace and `/` all separate.
fn parse_rgb_components<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<ParsedColor, ParseError<'i, FunctionalError>> {
    let mut channels: Vec<f32> = Vec::with_capacity(3);
    let mut alpha = None;

    loop {
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Comma | Token::Delim('/') => {}
            Token::Number { value, .. } if channels.len() < 3 => channels.push(value),
            Token::Number { value, .. } if alpha.is_none() => alpha = Some(value),
            Token::Percentage { unit_value, .. } if channels.len() == 3 && alpha.is_none() => {
                alpha = Some(unit_value)
            }
            _ => return Err(input.new_custom_error(FunctionalError::Component)),
        }
    }

    if channels.len() != 3 {
        return Err(input.new_custom_error(FunctionalError::Component));
    }

    let mut rgb = [0u8; 3];
    for (slot, value) in rgb.iter_mut().zip(&channels) {
        if !(0.0..=255.0).contains(value) || value.fract() != 0.0 {
            return Err(input.new_custom_error(FunctionalError::Component));
        }
        *slot = *value as u8;
    }

    if let Some(a) = alpha {
        if !(0.0..=1.0).contains(&a) {
            return Err(input.new_custom_error(FunctionalError::Component));
        }
    }

    Ok(ParsedColor {
        rgb: Rgb(rgb[0], rgb[1], rgb[2]),
        alpha,
    })
}

/// Serde adapter for `Option<HexColor>` that writes an absent color as `""`.
///
/// ```rust
/// use serde::Serialize;
/// use swatch_tokens::HexColor;
///
/// #[derive(Serialize)]
/// struct Pair {
///     #[serde(with = "swatch_tokens::color::blank_if_absent")]
///     background: Option<HexColor>,
/// }
///
/// let json = serde_json::to_string(&Pair { background: None }).unwrap();
/// assert_eq!(json, r#"{"background":""}"#);
/// ```
pub mod blank_if_absent {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::HexColor;

    pub fn serialize<S: Serializer>(
        color: &Option<HexColor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match color {
            Some(color) => serializer.collect_str(color),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<HexColor>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex(s: &str) -> String {
        to_hex(s).map(|c| c.to_string()).unwrap_or_default()
    }

    // =========================================================================
    // Hex
    // =========================================================================

    #[test]
    fn test_six_digit_hex_is_lowercased() {
        assert_eq!(hex("#FFAA00"), "#ffaa00");
        assert_eq!(hex("#1a2B3c"), "#1a2b3c");
    }

    #[test]
    fn test_three_digit_hex_expands() {
        assert_eq!(hex("#fff"), "#ffffff");
        assert_eq!(hex("#0a3"), "#00aa33");
    }

    #[test]
    fn test_hex_without_hash() {
        assert_eq!(to_rgb("ff6b35"), Some(Rgb(255, 107, 53)));
        assert_eq!(to_rgb("abc"), Some(Rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(
            parse_color("#12345"),
            Err(ParseFailure::InvalidHex("12345".into()))
        );
        assert!(matches!(
            parse_color("#gg0000"),
            Err(ParseFailure::InvalidHex(_))
        ));
        assert!(to_rgb("#+f+f+f").is_none());
    }

    // =========================================================================
    // Functional notation
    // =========================================================================

    #[test]
    fn test_rgb_and_rgba() {
        assert_eq!(hex("rgb(255, 0, 0)"), "#ff0000");
        assert_eq!(hex("rgba(10, 20, 30, 0.5)"), "#0a141e");
        assert_eq!(hex("RGB(0,0,0)"), "#000000");
    }

    #[test]
    fn test_space_separated_with_slash_alpha() {
        assert_eq!(hex("rgb(10 20 30 / 0.5)"), "#0a141e");
        assert_eq!(hex("rgb(10 20 30 / 50%)"), "#0a141e");
        assert_eq!(to_hex("rgb(10 20 30 / 0%)"), None);
    }

    #[test]
    fn test_zero_alpha_at_any_precision_is_absent() {
        assert_eq!(to_hex("rgba(0, 0, 0, 0)"), None);
        assert_eq!(to_hex("rgba(12, 34, 56, 0.0)"), None);
        assert_eq!(to_hex("rgba(255,255,255,0.00)"), None);
        assert!(is_fully_transparent("rgba(0, 0, 0, 0)"));
        assert!(!is_fully_transparent("rgba(0, 0, 0, 0.01)"));
    }

    #[test]
    fn test_transparent_keyword_and_empty() {
        assert_eq!(to_hex("transparent"), None);
        assert_eq!(to_hex("TRANSPARENT"), None);
        assert_eq!(to_hex(""), None);
        assert_eq!(parse_color("   "), Err(ParseFailure::Empty));
        assert!(is_fully_transparent("transparent"));
    }

    #[test]
    fn test_malformed_functional() {
        assert_eq!(to_rgb("rgb(300, 0, 0)"), None);
        assert_eq!(to_rgb("rgb(1, 2)"), None);
        assert_eq!(to_rgb("rgb(1, 2, 3, 4, 5)"), None);
        assert_eq!(to_rgb("rgb(1, 2, 3, 1.5)"), None);
        assert_eq!(to_rgb("rgb(1.5, 2, 3)"), None);
        assert_eq!(to_rgb("rgb(a, b, c)"), None);
        assert!(matches!(
            parse_color("rgb(1, 2, 3) trailing"),
            Err(ParseFailure::InvalidComponent(_))
        ));
    }

    #[test]
    fn test_other_functions_and_names_are_unrecognized() {
        assert!(matches!(
            parse_color("hsl(0, 0%, 0%)"),
            Err(ParseFailure::UnrecognizedColor(_))
        ));
        assert!(matches!(
            parse_color("red"),
            Err(ParseFailure::UnrecognizedColor(_))
        ));
    }

    // =========================================================================
    // Brightness and serde
    // =========================================================================

    #[test]
    fn test_luma() {
        assert_eq!(Rgb::WHITE.luma(), 255.0);
        assert_eq!(Rgb::BLACK.luma(), 0.0);
        assert_eq!(Rgb(128, 128, 128).luma(), 128.0);
        assert_eq!(Rgb(255, 0, 0).luma(), 76.245);
    }

    #[test]
    fn test_hex_color_serde() {
        let color = to_hex("rgb(1, 2, 3)").unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), r##""#010203""##);

        let back: HexColor = serde_json::from_str(r##""#010203""##).unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<HexColor>(r#""transparent""#).is_err());
    }

    proptest! {
        #[test]
        fn prop_hex_round_trip(digits in "[0-9a-fA-F]{6}") {
            let input = format!("#{}", digits);
            let rgb = to_rgb(&input).unwrap();
            prop_assert_eq!(rgb.to_hex().to_string(), input.to_lowercase());
        }

        #[test]
        fn prop_rgb_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let hex = Rgb(r, g, b).to_hex().to_string();
            prop_assert_eq!(to_rgb(&hex), Some(Rgb(r, g, b)));

            let functional = format!("rgb({}, {}, {})", r, g, b);
            prop_assert_eq!(to_rgb(&functional), Some(Rgb(r, g, b)));
        }

        #[test]
        fn prop_to_hex_is_idempotent(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in 0.0f32..=1.0) {
            let input = format!("rgba({}, {}, {}, {})", r, g, b, a);
            let once = to_hex(&input);
            let twice = once.and_then(|c| to_hex(&c.to_string()));
            prop_assert_eq!(once, twice);
        }
    }
}
