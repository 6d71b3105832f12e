//! Border style aggregation.
//!
//! Borders are collected into three [`FrequencyTable`]s (radius, width, color)
//! while walking a page, then reduced to the most common value of each plus a
//! short usage list.
//!
//! ```rust
//! use swatch_tokens::border::{BorderAnalysis, BorderSample, BorderTables};
//!
//! let mut tables = BorderTables::default();
//! tables.observe(&BorderSample {
//!     radius: "8px".into(),
//!     widths: ["1px".into(), "1px".into(), "0px".into(), "0px".into()],
//!     colors: ["rgb(0, 0, 0)".into(), "#000".into(), "transparent".into(), "".into()],
//!     shorthand: String::new(),
//! });
//!
//! let analysis = BorderAnalysis::from_tables(&tables, 5);
//! assert_eq!(analysis.border_radius.as_deref(), Some("8px"));
//! assert_eq!(analysis.border_width.as_deref(), Some("1px"));
//! assert_eq!(analysis.border_color.unwrap().to_string(), "#000000");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::{to_hex, HexColor};
use crate::error::ParseFailure;
use crate::frequency::FrequencyTable;

/// Side order used for per-side properties (`border-top-width`, ...).
pub const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// `<width> <style> <color>`, as reported for the computed `border` shorthand.
static SHORTHAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?px)\s+([a-zA-Z-]+)\s+(.+)$").expect("border shorthand pattern")
});

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Shorthand values that carry no border at all.
const EMPTY_SHORTHANDS: &[&str] = &["none", "0px none rgba(0, 0, 0, 0)"];

/// Raw computed border values of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSample {
    pub radius: String,
    /// Per-side widths in [`SIDES`] order.
    pub widths: [String; 4],
    /// Per-side colors in [`SIDES`] order.
    pub colors: [String; 4],
    /// The `border` shorthand, empty when the page does not report one.
    pub shorthand: String,
}

/// A `border` shorthand split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderShorthand {
    pub width: String,
    pub style: String,
    pub color: String,
}

/// Splits a computed `border` shorthand of the form `<width> <style> <color>`.
///
/// Other orderings are rejected rather than guessed at.
pub fn parse_border_shorthand(value: &str) -> Result<BorderShorthand, ParseFailure> {
    let value = value.trim();
    let unsupported = || ParseFailure::BorderShorthand(value.to_string());

    let caps = SHORTHAND.captures(value).ok_or_else(unsupported)?;
    let style = caps[2].to_ascii_lowercase();
    if !BORDER_STYLES.contains(&style.as_str()) {
        return Err(unsupported());
    }

    Ok(BorderShorthand {
        width: caps[1].to_string(),
        style,
        color: caps[3].trim().to_string(),
    })
}

/// Collapses a multi-value radius whose values are all equal (`"4px 4px"` to
/// `"4px"`). Anything else passes through unchanged.
pub fn normalize_radius(radius: &str) -> String {
    let mut values = radius.split_whitespace();
    match values.next() {
        Some(first) if values.all(|v| v == first) => first.to_string(),
        _ => radius.to_string(),
    }
}

/// Border frequency tables for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderTables {
    pub radius: FrequencyTable<String>,
    pub width: FrequencyTable<String>,
    /// Keyed by canonical color, so `#000` and `rgb(0, 0, 0)` count together.
    pub color: FrequencyTable<HexColor>,
}

impl BorderTables {
    pub fn observe(&mut self, sample: &BorderSample) {
        self.observe_radius(&sample.radius);
        for width in &sample.widths {
            self.observe_width(width);
        }
        for color in &sample.colors {
            self.observe_color(color);
        }
        self.observe_shorthand(&sample.shorthand);
    }

    pub fn observe_radius(&mut self, radius: &str) {
        let radius = radius.trim();
        if !is_zero_or_empty(radius) {
            self.radius.observe(radius.to_string());
        }
    }

    pub fn observe_width(&mut self, width: &str) {
        let width = width.trim();
        if !is_zero_or_empty(width) {
            self.width.observe(width.to_string());
        }
    }

    /// Counts a color by its canonical form. Transparent and unparseable
    /// colors are skipped.
    pub fn observe_color(&mut self, color: &str) {
        match to_hex(color) {
            Some(hex) => self.color.observe(hex),
            None if !color.trim().is_empty() => {
                tracing::trace!(color, "skipping transparent or unparseable border color")
            }
            None => {}
        }
    }

    /// Folds the shorthand's width and color into the tables. Values that do
    /// not parse are dropped.
    pub fn observe_shorthand(&mut self, shorthand: &str) {
        let shorthand = shorthand.trim();
        if shorthand.is_empty() || EMPTY_SHORTHANDS.contains(&shorthand) {
            return;
        }

        match parse_border_shorthand(shorthand) {
            Ok(parsed) => {
                self.observe_width(&parsed.width);
                self.observe_color(&parsed.color);
            }
            Err(err) => tracing::trace!(%err, "skipping border shorthand"),
        }
    }
}

fn is_zero_or_empty(value: &str) -> bool {
    value.is_empty() || value == "0px"
}

/// Usage lists behind a [`BorderAnalysis`], as `[value, count]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderUsage {
    pub border_radius_usage: Vec<(String, usize)>,
    pub border_width_usage: Vec<(String, usize)>,
    pub border_color_usage: Vec<(HexColor, usize)>,
}

/// The most common border values of a page.
///
/// A value is `None` when the page had no border of that kind; see
/// [`BorderProperties`] for the defaulted view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderAnalysis {
    pub border_radius: Option<String>,
    pub border_width: Option<String>,
    pub border_color: Option<HexColor>,
    pub details: BorderUsage,
}

impl BorderAnalysis {
    /// Reduces the tables to their most common values and the first `top`
    /// entries of each ranking.
    pub fn from_tables(tables: &BorderTables, top: usize) -> Self {
        BorderAnalysis {
            border_radius: tables.radius.most_common().map(|r| normalize_radius(r)),
            border_width: tables.width.most_common().cloned(),
            border_color: tables.color.most_common().copied(),
            details: BorderUsage {
                border_radius_usage: tables.radius.top(top),
                border_width_usage: tables.width.top(top),
                border_color_usage: tables.color.top(top),
            },
        }
    }

    pub fn properties(&self) -> BorderProperties {
        BorderProperties::from(self)
    }
}

/// Flat, always-populated border tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderProperties {
    pub border_radius: String,
    pub border_width: String,
    pub border_color: String,
}

impl BorderProperties {
    pub const DEFAULT_RADIUS: &'static str = "0px";
    pub const DEFAULT_WIDTH: &'static str = "0px";
    pub const DEFAULT_COLOR: &'static str = "transparent";
}

impl Default for BorderProperties {
    fn default() -> Self {
        BorderProperties {
            border_radius: Self::DEFAULT_RADIUS.to_string(),
            border_width: Self::DEFAULT_WIDTH.to_string(),
            border_color: Self::DEFAULT_COLOR.to_string(),
        }
    }
}

impl From<&BorderAnalysis> for BorderProperties {
    fn from(analysis: &BorderAnalysis) -> Self {
        let defaults = BorderProperties::default();
        BorderProperties {
            border_radius: analysis
                .border_radius
                .clone()
                .unwrap_or(defaults.border_radius),
            border_width: analysis
                .border_width
                .clone()
                .unwrap_or(defaults.border_width),
            border_color: analysis
                .border_color
                .map(|c| c.to_string())
                .unwrap_or(defaults.border_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(radius: &str, width: &str, color: &str, shorthand: &str) -> BorderSample {
        BorderSample {
            radius: radius.into(),
            widths: [width.into(), width.into(), width.into(), width.into()],
            colors: [color.into(), color.into(), color.into(), color.into()],
            shorthand: shorthand.into(),
        }
    }

    // =========================================================================
    // Shorthand parsing
    // =========================================================================

    #[test]
    fn test_parse_shorthand() {
        let parsed = parse_border_shorthand("1px solid rgb(0, 0, 0)").unwrap();
        assert_eq!(parsed.width, "1px");
        assert_eq!(parsed.style, "solid");
        assert_eq!(parsed.color, "rgb(0, 0, 0)");

        let fractional = parse_border_shorthand("0.5px dashed #ccc").unwrap();
        assert_eq!(fractional.width, "0.5px");
    }

    #[test]
    fn test_parse_shorthand_rejects_other_orders() {
        assert!(parse_border_shorthand("solid 1px red").is_err());
        assert!(parse_border_shorthand("1px rgb(0, 0, 0) solid").is_err());
        assert!(parse_border_shorthand("thin solid black").is_err());
        assert_eq!(
            parse_border_shorthand("none"),
            Err(ParseFailure::BorderShorthand("none".into()))
        );
    }

    #[test]
    fn test_normalize_radius() {
        assert_eq!(normalize_radius("4px 4px 4px 4px"), "4px");
        assert_eq!(normalize_radius("8px"), "8px");
        assert_eq!(normalize_radius("10px 5px 10px 5px"), "10px 5px 10px 5px");
        assert_eq!(normalize_radius(""), "");
    }

    // =========================================================================
    // Tables
    // =========================================================================

    #[test]
    fn test_zero_and_transparent_values_are_skipped() {
        let mut tables = BorderTables::default();
        tables.observe(&sample("0px", "0px", "rgba(0, 0, 0, 0)", "0px none rgba(0, 0, 0, 0)"));
        tables.observe(&sample("", "", "transparent", "none"));
        assert!(tables.radius.is_empty());
        assert!(tables.width.is_empty());
        assert!(tables.color.is_empty());
    }

    #[test]
    fn test_colors_are_counted_canonically() {
        let mut tables = BorderTables::default();
        tables.observe_color("rgb(0, 0, 0)");
        tables.observe_color("#000");
        tables.observe_color("#000000");
        tables.observe_color("not-a-color");
        assert_eq!(tables.color.len(), 1);
        assert_eq!(tables.color.count(&"#000000".parse().unwrap()), 3);
    }

    #[test]
    fn test_shorthand_contributes_width_and_color() {
        let mut tables = BorderTables::default();
        tables.observe_shorthand("2px solid rgb(255, 0, 0)");
        tables.observe_shorthand("garbage");
        assert_eq!(tables.width.ranked(), vec![("2px".to_string(), 1)]);
        assert_eq!(tables.color.len(), 1);
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    #[test]
    fn test_uniform_page() {
        let mut tables = BorderTables::default();
        for _ in 0..10 {
            tables.observe(&sample("8px", "1px", "rgb(0, 0, 0)", "1px solid rgb(0, 0, 0)"));
        }

        let analysis = BorderAnalysis::from_tables(&tables, 5);
        assert_eq!(analysis.border_radius.as_deref(), Some("8px"));
        assert_eq!(analysis.border_width.as_deref(), Some("1px"));
        assert_eq!(analysis.border_color.map(|c| c.to_string()).as_deref(), Some("#000000"));

        let props = analysis.properties();
        assert_eq!(props.border_radius, "8px");
        assert_eq!(props.border_width, "1px");
        assert_eq!(props.border_color, "#000000");
    }

    #[test]
    fn test_empty_page_uses_defaults_only_in_properties() {
        let analysis = BorderAnalysis::from_tables(&BorderTables::default(), 5);
        assert_eq!(analysis.border_radius, None);
        assert_eq!(analysis.border_width, None);
        assert_eq!(analysis.border_color, None);
        assert!(analysis.details.border_radius_usage.is_empty());

        assert_eq!(analysis.properties(), BorderProperties::default());
    }

    #[test]
    fn test_usage_lists_are_capped() {
        let mut tables = BorderTables::default();
        for (i, radius) in ["1px", "2px", "3px", "4px", "5px", "6px", "7px"].iter().enumerate() {
            for _ in 0..=i {
                tables.observe_radius(radius);
            }
        }

        let analysis = BorderAnalysis::from_tables(&tables, 5);
        assert_eq!(analysis.details.border_radius_usage.len(), 5);
        assert_eq!(analysis.details.border_radius_usage[0], ("7px".to_string(), 7));
        assert_eq!(analysis.border_radius.as_deref(), Some("7px"));
    }

    #[test]
    fn test_most_common_radius_is_normalized() {
        let mut tables = BorderTables::default();
        tables.observe_radius("6px 6px 6px 6px");
        let analysis = BorderAnalysis::from_tables(&tables, 5);
        assert_eq!(analysis.border_radius.as_deref(), Some("6px"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut tables = BorderTables::default();
        tables.observe_radius("4px");
        let json = serde_json::to_value(BorderAnalysis::from_tables(&tables, 5)).unwrap();
        assert_eq!(json["borderRadius"], "4px");
        assert_eq!(json["borderColor"], serde_json::Value::Null);
        assert_eq!(json["details"]["borderRadiusUsage"][0][1], 1);
    }
}
