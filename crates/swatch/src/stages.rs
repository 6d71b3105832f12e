//! Analyzers over an already-navigated page, and the default pipeline built
//! from them.
//!
//! | stage     | output                                        |
//! |-----------|-----------------------------------------------|
//! | `theme`   | [`ColorMode`]                                 |
//! | `colors`  | [`ColorSummary`]                              |
//! | `fonts`   | [`FontUsage`](swatch_tokens::FontUsage)       |
//! | `borders` | [`BorderProperties`](swatch_tokens::BorderProperties) |

use swatch_dispatch::{collect, ConfigurationError, ExtractionFailure, Pipeline, RenderedPage};
use swatch_tokens::{
    BorderAnalysis, ColorMode, ColorSummary, FontAnalysis, Limits, ThemeRule, ThemeSignal,
};

use crate::collect::{BorderProbe, ColorProbe, FontProbe, ThemeProbe};
use crate::config::SwatchConfig;

pub const THEME: &str = "theme";
pub const COLORS: &str = "colors";
pub const FONTS: &str = "fonts";
pub const BORDERS: &str = "borders";

/// Stage names of the default pipeline, in run order.
pub const DEFAULT_STAGES: &[&str] = &[THEME, COLORS, FONTS, BORDERS];

pub fn analyze_borders(
    page: &mut dyn RenderedPage,
    limits: &Limits,
) -> Result<BorderAnalysis, ExtractionFailure> {
    let tables = collect(page, &BorderProbe)?;
    Ok(BorderAnalysis::from_tables(&tables, limits.top_entries))
}

pub fn analyze_colors(
    page: &mut dyn RenderedPage,
    limits: &Limits,
) -> Result<ColorSummary, ExtractionFailure> {
    let sample = collect(page, &ColorProbe)?;
    Ok(ColorSummary::from_sample(&sample, limits.button_pairs))
}

pub fn analyze_fonts(
    page: &mut dyn RenderedPage,
    limits: &Limits,
) -> Result<FontAnalysis, ExtractionFailure> {
    let variants = collect(page, &FontProbe::new(limits))?;
    Ok(FontAnalysis::from_variants(&variants, limits.top_entries))
}

pub fn detect_theme(page: &mut dyn RenderedPage) -> Result<ColorMode, ExtractionFailure> {
    let reading = collect(page, &ThemeProbe)?;
    let signal = ThemeSignal::from_reading(&reading);
    let (mode, rule) = swatch_tokens::classify(&signal);
    if rule == ThemeRule::Default {
        tracing::debug!("no theme evidence, assuming light");
    }
    Ok(mode)
}

/// Builds the pipeline named by `config.stages`.
///
/// Fails on the first name that is not a known stage.
pub fn default_pipeline(config: &SwatchConfig) -> Result<Pipeline, ConfigurationError> {
    let limits = config.limits;
    let mut pipeline = Pipeline::new();

    for name in &config.stages {
        match name.as_str() {
            THEME => pipeline.stage(THEME, |page: &mut dyn RenderedPage, _url: &str| {
                detect_theme(page)
            })?,
            COLORS => pipeline.stage(COLORS, move |page: &mut dyn RenderedPage, _url: &str| {
                analyze_colors(page, &limits)
            })?,
            FONTS => pipeline.stage(FONTS, move |page: &mut dyn RenderedPage, _url: &str| {
                analyze_fonts(page, &limits).map(|fonts| fonts.usage())
            })?,
            BORDERS => pipeline.stage(BORDERS, move |page: &mut dyn RenderedPage, _url: &str| {
                analyze_borders(page, &limits).map(|borders| borders.properties())
            })?,
            other => return Err(ConfigurationError::UnknownStage(other.to_string())),
        };
    }
    Ok(pipeline)
}
