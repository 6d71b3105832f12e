//! Page theme classification.

use serde::{Deserialize, Serialize};

use super::ColorMode;
use crate::color::{is_fully_transparent, to_hex, to_rgb, HexColor};

/// Backgrounds darker than this are dark.
pub const DARK_BRIGHTNESS_THRESHOLD: f64 = 128.0;

/// Classes on `<body>` or `<html>` that mark a page as dark.
pub const DARK_CLASSES: &[&str] = &["dark", "dark-theme"];

/// Raw theme evidence as read from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeReading {
    pub body_background: Option<String>,
    pub root_background: Option<String>,
    pub text_color: Option<String>,
    pub has_dark_class: bool,
    pub color_scheme: Option<String>,
    pub prefers_dark: bool,
}

/// Theme evidence with colors resolved and brightness computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSignal {
    pub background_color: Option<HexColor>,
    pub text_color: Option<HexColor>,
    pub background_brightness: Option<f64>,
    /// Recorded for reporting; not used by [`classify`].
    pub text_brightness: Option<f64>,
    pub has_dark_class: bool,
    pub color_scheme: Option<String>,
    /// Recorded for reporting; not used by [`classify`].
    pub prefers_dark: bool,
}

impl ThemeSignal {
    /// Resolves a reading. The body background wins unless it is missing or
    /// fully transparent, in which case the root background is used.
    pub fn from_reading(reading: &ThemeReading) -> Self {
        let body = reading
            .body_background
            .as_deref()
            .filter(|bg| !bg.trim().is_empty() && !is_fully_transparent(bg));
        let background = body.or(reading.root_background.as_deref());
        let text = reading.text_color.as_deref();

        ThemeSignal {
            background_color: background.and_then(to_hex),
            text_color: text.and_then(to_hex),
            background_brightness: background.and_then(to_rgb).map(|rgb| rgb.luma()),
            text_brightness: text.and_then(to_rgb).map(|rgb| rgb.luma()),
            has_dark_class: reading.has_dark_class,
            color_scheme: reading.color_scheme.clone(),
            prefers_dark: reading.prefers_dark,
        }
    }

    pub fn classify(&self) -> ColorMode {
        classify(self).0
    }
}

/// The rule that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeRule {
    DarkClass,
    ColorScheme,
    Brightness,
    Default,
}

/// Classifies a page. The first rule that applies wins:
///
/// 1. a dark class on body or root: dark
/// 2. `color-scheme: dark`: dark
/// 3. background brightness below [`DARK_BRIGHTNESS_THRESHOLD`]: dark, else light
/// 4. light
///
/// ```rust
/// use swatch_tokens::{classify, ColorMode, ThemeRule, ThemeSignal};
///
/// let signal = ThemeSignal {
///     has_dark_class: true,
///     background_brightness: Some(240.0),
///     ..Default::default()
/// };
/// assert_eq!(classify(&signal), (ColorMode::Dark, ThemeRule::DarkClass));
/// ```
pub fn classify(signal: &ThemeSignal) -> (ColorMode, ThemeRule) {
    if signal.has_dark_class {
        return (ColorMode::Dark, ThemeRule::DarkClass);
    }

    let scheme_is_dark = signal
        .color_scheme
        .as_deref()
        .is_some_and(|scheme| scheme.trim().eq_ignore_ascii_case("dark"));
    if scheme_is_dark {
        return (ColorMode::Dark, ThemeRule::ColorScheme);
    }

    if let Some(brightness) = signal.background_brightness {
        let mode = if brightness < DARK_BRIGHTNESS_THRESHOLD {
            ColorMode::Dark
        } else {
            ColorMode::Light
        };
        return (mode, ThemeRule::Brightness);
    }

    (ColorMode::Light, ThemeRule::Default)
}
