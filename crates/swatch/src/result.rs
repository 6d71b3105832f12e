use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use swatch_dispatch::StageResults;
use swatch_tokens::{BorderProperties, ColorMode, ColorSummary, FontUsage};

use crate::stages::{BORDERS, COLORS, FONTS, THEME};

/// The design tokens of one page, as produced by the default pipeline.
///
/// A field is `None` when its stage was not configured or failed; failed
/// stages are also listed in `unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub captured_at: DateTime<Utc>,
    pub theme: Option<ColorMode>,
    pub colors: Option<ColorSummary>,
    pub fonts: Option<FontUsage>,
    pub borders: Option<BorderProperties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<String>,
}

impl AnalysisResult {
    pub fn from_stages(url: &str, results: &StageResults) -> Self {
        let mut unavailable: Vec<String> =
            results.unavailable().into_iter().map(String::from).collect();

        let theme = decode_stage(results, THEME, &mut unavailable);
        let colors = decode_stage(results, COLORS, &mut unavailable);
        let fonts = decode_stage(results, FONTS, &mut unavailable);
        let borders = decode_stage(results, BORDERS, &mut unavailable);

        AnalysisResult {
            url: url.to_string(),
            captured_at: Utc::now(),
            theme,
            colors,
            fonts,
            borders,
            unavailable,
        }
    }
}

fn decode_stage<T: DeserializeOwned>(
    results: &StageResults,
    name: &str,
    unavailable: &mut Vec<String>,
) -> Option<T> {
    match results.decode::<T>(name)? {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(stage = name, %err, "stage result has an unexpected shape");
            unavailable.push(name.to_string());
            None
        }
    }
}
