//! # Swatch - Design Tokens from Rendered Pages
//!
//! Swatch reads the computed styles of a rendered web page and reduces them to
//! the handful of tokens a style guide starts from:
//!
//! - **Colors**: body, header and footer colors, palettes, dominant button
//!   color pairs
//! - **Fonts**: heading and body families, every variant grouped by family and
//!   classified (serif, sans-serif, monospace, ...)
//! - **Borders**: most common radius, width and color
//! - **Theme**: light or dark
//!
//! Pages come from a [`PageProvider`], usually a headless browser. Swatch never
//! renders anything itself; `swatch-test` provides an in-process provider over
//! synthetic documents.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use swatch::{init_tracing, Swatch};
//!
//! init_tracing();
//! let mut swatch = Swatch::new(provider);
//!
//! let borders = swatch.get_border_properties("https://example.com/")?;
//! println!("radius {}", borders.border_radius);
//!
//! let result = swatch.analyze("https://example.com/")?;
//! println!("{}", swatch::to_json(&result)?);
//! ```
//!
//! ## Pipelines
//!
//! [`Swatch::analyze`] runs the stages named in [`SwatchConfig::stages`]
//! (`theme`, `colors`, `fonts`, `borders` by default) against a single page.
//! A stage that fails is reported as unavailable; the others still run. Custom
//! pipelines are built with [`Pipeline`] and run with [`Swatch::run_pipeline`].
//!
//! ## Logging
//!
//! Swatch logs through `tracing`. [`init_tracing`] installs a stderr
//! subscriber filtered by `SWATCH_LOG`.

pub mod collect;
mod config;
mod error;
mod logging;
mod result;
pub mod stages;
mod swatch;

pub use config::SwatchConfig;
pub use error::{ConfigError, SwatchError};
pub use logging::init_tracing;
pub use result::AnalysisResult;
pub use swatch::Swatch;

pub use swatch_dispatch::{
    export, to_csv, to_json, to_yaml, ConfigurationError, ExportFormat, ExtractionFailure,
    PageProvider, Pipeline, ProviderError, RenderedPage, StageOutcome, StageResults,
    StyledDocument,
};

pub use swatch_tokens::{
    BorderAnalysis, BorderProperties, ColorMode,
    ColorPair, ColorSummary, FontAnalysis, FontUsage, HexColor, Limits,
};
