//! Page providers and named-stage extraction for `swatch`.
//!
//! `swatch-dispatch` sits between the token analyzers and whatever renders the
//! pages. It defines:
//!
//! - **Provider interface**: [`PageProvider`], [`RenderedPage`] and the
//!   [`StyledDocument`] that in-page [`Probe`]s read from
//! - **Scoped cleanup**: [`Session`] and [`PageGuard`] shut the provider down
//!   and release pages on every exit path
//! - **Pipeline**: an ordered registry of named [`Stage`]s run against one
//!   navigated page, with per-stage failure isolation
//! - **Export**: JSON, YAML and CSV serialization of results
//!
//! ```rust,ignore
//! use swatch_dispatch::{Pipeline, RenderedPage};
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.stage("title", |page: &mut dyn RenderedPage, _url: &str| {
//!     swatch_dispatch::collect(page, &TitleProbe)
//! })?;
//!
//! let results = pipeline.extract(&mut provider, "https://example.com/")?;
//! println!("{}", swatch_dispatch::to_json(&results)?);
//! ```

mod error;
mod page;
mod pipeline;
mod serialize;
mod stage;

pub use error::{ConfigurationError, ExtractionFailure, PipelineError, ProviderError};

pub use page::{
    collect, evaluate_as, ElementId, PageGuard, PageProvider, Probe, RenderedPage, Session,
    StyledDocument, TypedProbe,
};

pub use pipeline::{validate_url, Pipeline, StageOutcome, StageRecord, StageResults};

pub use serialize::{export, to_csv, to_json, to_yaml, ExportFormat, SerializeError};

pub use stage::{FnStage, Stage, StageResult};
