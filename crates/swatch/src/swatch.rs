use swatch_dispatch::{
    export, validate_url, ExtractionFailure, PageGuard, PageProvider, Pipeline, RenderedPage,
    StageResults,
};
use swatch_tokens::{
    BorderAnalysis, BorderProperties, ColorMode, ColorSummary, FontAnalysis, FontUsage,
};

use crate::config::SwatchConfig;
use crate::error::SwatchError;
use crate::result::AnalysisResult;
use crate::stages;

/// Design-token analysis over pages from a [`PageProvider`].
///
/// Each single-analyzer call opens one page, navigates it, analyzes it and
/// releases it, whether or not the analysis succeeded. The provider is started
/// on first use and stays up between calls. Pipeline runs
/// ([`run_pipeline`](Self::run_pipeline), [`analyze`](Self::analyze)) manage
/// the provider themselves and shut it down when they finish.
pub struct Swatch<P: PageProvider> {
    provider: P,
    config: SwatchConfig,
}

impl<P: PageProvider> Swatch<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SwatchConfig::default())
    }

    pub fn with_config(provider: P, config: SwatchConfig) -> Self {
        Swatch { provider, config }
    }

    pub fn config(&self) -> &SwatchConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Opens `url` in a fresh page and runs `analyze` on it.
    fn on_page<T>(
        &mut self,
        url: &str,
        analyze: impl FnOnce(&mut dyn RenderedPage, &SwatchConfig) -> Result<T, ExtractionFailure>,
    ) -> Result<T, SwatchError> {
        let url = validate_url(url)?;
        self.provider.init()?;

        let mut page = PageGuard::acquire(&mut self.provider)?;
        page.navigate(url)?;
        tracing::debug!(url, "page ready");
        Ok(analyze(&mut *page, &self.config)?)
    }

    /// Most common border radius, width and color, with their rankings.
    pub fn analyze_borders(&mut self, url: &str) -> Result<BorderAnalysis, SwatchError> {
        self.on_page(url, |page, config| stages::analyze_borders(page, &config.limits))
    }

    /// Border tokens with defaults filled in.
    pub fn get_border_properties(&mut self, url: &str) -> Result<BorderProperties, SwatchError> {
        Ok(self.analyze_borders(url)?.properties())
    }

    /// The page palette. Without a URL, returns [`ColorSummary::empty`]
    /// without touching the provider.
    pub fn get_colors(&mut self, url: Option<&str>) -> Result<ColorSummary, SwatchError> {
        match url {
            None => Ok(ColorSummary::empty()),
            Some(url) => {
                self.on_page(url, |page, config| stages::analyze_colors(page, &config.limits))
            }
        }
    }

    pub fn analyze_fonts(&mut self, url: &str) -> Result<FontAnalysis, SwatchError> {
        self.on_page(url, |page, config| stages::analyze_fonts(page, &config.limits))
    }

    /// The primary heading and body font names.
    pub fn get_font_usage(&mut self, url: &str) -> Result<FontUsage, SwatchError> {
        Ok(self.analyze_fonts(url)?.usage())
    }

    pub fn detect_theme(&mut self, url: &str) -> Result<ColorMode, SwatchError> {
        self.on_page(url, |page, _| stages::detect_theme(page))
    }

    /// Runs `pipeline` against one page showing `url`.
    pub fn run_pipeline(
        &mut self,
        url: &str,
        pipeline: &Pipeline,
    ) -> Result<StageResults, SwatchError> {
        Ok(pipeline.extract(&mut self.provider, url)?)
    }

    /// Runs the configured default pipeline.
    pub fn analyze(&mut self, url: &str) -> Result<AnalysisResult, SwatchError> {
        let pipeline = stages::default_pipeline(&self.config)?;
        let results = self.run_pipeline(url, &pipeline)?;
        Ok(AnalysisResult::from_stages(url.trim(), &results))
    }

    /// [`analyze`](Self::analyze), exported in the configured format.
    pub fn report(&mut self, url: &str) -> Result<String, SwatchError> {
        let result = self.analyze(url)?;
        Ok(export(&result, self.config.format)?)
    }
}
