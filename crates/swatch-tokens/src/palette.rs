//! Page palette: background and foreground colors of landmark elements and
//! the dominant button color pairs.
//!
//! Button pairs go through [`is_valid_button_pair`] before they are counted, so
//! inherited white text, white buttons and invisible text never rank.

use serde::{Deserialize, Serialize};

use crate::color::{blank_if_absent, to_hex, HexColor};
use crate::frequency::FrequencyTable;

/// A background/foreground pair in canonical form. Either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPair {
    #[serde(with = "blank_if_absent", default)]
    pub background: Option<HexColor>,
    #[serde(with = "blank_if_absent", default)]
    pub foreground: Option<HexColor>,
}

impl ColorPair {
    pub fn new(background: Option<HexColor>, foreground: Option<HexColor>) -> Self {
        ColorPair {
            background,
            foreground,
        }
    }

    /// Normalizes raw computed colors. Transparent and unparseable values
    /// become absent.
    pub fn from_raw(background: &str, foreground: &str) -> Self {
        ColorPair::new(to_hex(background), to_hex(foreground))
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.foreground.is_none()
    }

    pub fn is_valid_button(&self) -> bool {
        is_valid_button_pair(self.background, self.foreground)
    }
}

/// Whether a button's colors are worth reporting.
///
/// Rejects pairs with no color, identical colors, a lone white foreground
/// (usually inherited), a white background, and black on black.
pub fn is_valid_button_pair(background: Option<HexColor>, foreground: Option<HexColor>) -> bool {
    match (background, foreground) {
        (None, None) => false,
        (Some(bg), Some(fg)) if bg == fg => false,
        (None, Some(fg)) if fg.is_white() => false,
        (Some(bg), _) if bg.is_white() => false,
        (Some(bg), Some(fg)) if bg.is_black() && fg.is_black() => false,
        _ => true,
    }
}

/// A ranked button color pair. `score` counts the buttons using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonColorPair {
    #[serde(flatten)]
    pub colors: ColorPair,
    pub score: usize,
}

impl ButtonColorPair {
    /// The single entry reported when a page has no valid button pair.
    pub fn placeholder() -> Self {
        ButtonColorPair {
            colors: ColorPair::default(),
            score: 0,
        }
    }
}

/// Raw color observations from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub body: Option<ColorPair>,
    pub header: Option<ColorPair>,
    pub footer: Option<ColorPair>,
    /// Valid button pairs, counted in first-seen order.
    pub buttons: FrequencyTable<ColorPair>,
}

impl ColorSample {
    /// Normalizes and counts one button. Returns `false` when the pair was
    /// rejected by [`is_valid_button_pair`].
    pub fn observe_button(&mut self, background: &str, foreground: &str) -> bool {
        let pair = ColorPair::from_raw(background, foreground);
        if !pair.is_valid_button() {
            return false;
        }
        self.buttons.observe(pair);
        true
    }
}

/// Colors of the landmark elements plus the top button pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementColorProfile {
    pub button: Vec<ButtonColorPair>,
    pub header: ColorPair,
    pub body: ColorPair,
    pub footer: ColorPair,
}

/// The color tokens of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSummary {
    /// Distinct backgrounds in order body, header, footer, buttons.
    pub backgrounds: Vec<HexColor>,
    /// Distinct foregrounds in the same order.
    pub foregrounds: Vec<HexColor>,
    pub elements: ElementColorProfile,
}

impl ColorSummary {
    /// No colors at all: empty palettes, empty landmarks and the placeholder
    /// button pair.
    pub fn empty() -> Self {
        ColorSummary {
            backgrounds: Vec::new(),
            foregrounds: Vec::new(),
            elements: ElementColorProfile {
                button: vec![ButtonColorPair::placeholder()],
                header: ColorPair::default(),
                body: ColorPair::default(),
                footer: ColorPair::default(),
            },
        }
    }

    /// Builds the summary, keeping the `button_pairs` highest-scoring pairs.
    pub fn from_sample(sample: &ColorSample, button_pairs: usize) -> Self {
        let landmarks = [sample.body, sample.header, sample.footer];
        let pairs = landmarks.iter().flatten().chain(sample.buttons.keys());

        let mut backgrounds = Vec::new();
        let mut foregrounds = Vec::new();
        for pair in pairs {
            push_distinct(&mut backgrounds, pair.background);
            push_distinct(&mut foregrounds, pair.foreground);
        }

        let mut button: Vec<ButtonColorPair> = sample
            .buttons
            .top(button_pairs)
            .into_iter()
            .map(|(colors, score)| ButtonColorPair { colors, score })
            .collect();
        if button.is_empty() {
            button.push(ButtonColorPair::placeholder());
        }

        ColorSummary {
            backgrounds,
            foregrounds,
            elements: ElementColorProfile {
                button,
                header: sample.header.unwrap_or_default(),
                body: sample.body.unwrap_or_default(),
                footer: sample.footer.unwrap_or_default(),
            },
        }
    }
}

fn push_distinct(colors: &mut Vec<HexColor>, color: Option<HexColor>) {
    if let Some(color) = color {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Option<HexColor> {
        to_hex(s)
    }

    // =========================================================================
    // Button validity
    // =========================================================================

    #[test]
    fn test_button_validity_rules() {
        assert!(!is_valid_button_pair(hex("#ffffff"), hex("#123456")));
        assert!(!is_valid_button_pair(hex("#000000"), hex("#000000")));
        assert!(!is_valid_button_pair(None, hex("#ffffff")));
        assert!(!is_valid_button_pair(None, None));
        assert!(!is_valid_button_pair(hex("#abcdef"), hex("rgb(171, 205, 239)")));
        assert!(is_valid_button_pair(hex("#111111"), hex("#eeeeee")));
        assert!(is_valid_button_pair(hex("#000000"), hex("#ffffff")));
        assert!(is_valid_button_pair(None, hex("#333333")));
        assert!(is_valid_button_pair(hex("#0055ff"), None));
    }

    #[test]
    fn test_equivalent_spellings_are_compared_canonically() {
        let pair = ColorPair::from_raw("rgba(255, 255, 255, 1)", "#123456");
        assert!(!pair.is_valid_button());

        let pair = ColorPair::from_raw("rgb(0, 0, 0)", "#000");
        assert!(!pair.is_valid_button());
    }

    // =========================================================================
    // Summary
    // =========================================================================

    #[test]
    fn test_empty_summary_has_placeholder_button() {
        let json = serde_json::to_value(ColorSummary::empty()).unwrap();
        assert_eq!(
            json["elements"]["button"],
            serde_json::json!([{ "background": "", "foreground": "", "score": 0 }])
        );
        assert_eq!(json["elements"]["body"]["background"], "");
        assert_eq!(json["backgrounds"], serde_json::json!([]));
    }

    #[test]
    fn test_no_valid_buttons_yields_placeholder() {
        let mut sample = ColorSample::default();
        assert!(!sample.observe_button("rgb(255, 255, 255)", "rgb(0, 0, 0)"));
        assert!(!sample.observe_button("transparent", "rgb(255, 255, 255)"));

        let summary = ColorSummary::from_sample(&sample, 3);
        assert_eq!(summary.elements.button, vec![ButtonColorPair::placeholder()]);
    }

    #[test]
    fn test_top_three_buttons_by_score() {
        let mut sample = ColorSample::default();
        let buttons = [
            ("rgb(0, 85, 255)", "rgb(255, 255, 255)"),
            ("rgb(255, 0, 0)", "rgb(255, 255, 255)"),
            ("rgb(0, 85, 255)", "rgb(255, 255, 255)"),
            ("rgb(0, 128, 0)", "rgb(255, 255, 255)"),
            ("rgb(50, 50, 50)", "rgb(255, 255, 255)"),
            ("rgb(255, 0, 0)", "rgb(255, 255, 255)"),
        ];
        for (bg, fg) in buttons {
            assert!(sample.observe_button(bg, fg));
        }

        let summary = ColorSummary::from_sample(&sample, 3);
        let ranked: Vec<(String, usize)> = summary
            .elements
            .button
            .iter()
            .map(|b| (b.colors.background.unwrap().to_string(), b.score))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("#0055ff".to_string(), 2),
                ("#ff0000".to_string(), 2),
                ("#008000".to_string(), 1),
            ]
        );

        // All valid buttons feed the palette, not just the top three.
        assert_eq!(summary.backgrounds.len(), 4);
        assert_eq!(summary.foregrounds, vec![hex("#ffffff").unwrap()]);
    }

    #[test]
    fn test_palette_order_and_dedup() {
        let mut sample = ColorSample {
            body: Some(ColorPair::from_raw("rgb(255, 255, 255)", "rgb(17, 17, 17)")),
            header: Some(ColorPair::from_raw("#111", "rgba(0, 0, 0, 0)")),
            footer: Some(ColorPair::from_raw("rgb(255, 255, 255)", "#111111")),
            ..Default::default()
        };
        sample.observe_button("#222222", "#ffffff");

        let summary = ColorSummary::from_sample(&sample, 3);
        let names = |colors: &[HexColor]| colors.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        assert_eq!(names(&summary.backgrounds), ["#ffffff", "#111111", "#222222"]);
        assert_eq!(names(&summary.foregrounds), ["#111111", "#ffffff"]);
        assert_eq!(summary.elements.header.foreground, None);
    }

    #[test]
    fn test_button_pair_round_trips_through_json() {
        let pair = ButtonColorPair {
            colors: ColorPair::from_raw("#0055ff", ""),
            score: 4,
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r##"{"background":"#0055ff","foreground":"","score":4}"##);
        let back: ButtonColorPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }
}
