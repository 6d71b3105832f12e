//! Pipeline stages.
//!
//! A stage is one analyzer run against an already-navigated page. It receives
//! the page and the URL it shows, and returns a serializable result. Errors are
//! `anyhow::Error` so stages can use `?` on whatever they call; the pipeline
//! turns a failed stage into an unavailable result instead of failing the run.

use serde::Serialize;

use crate::page::RenderedPage;

/// The result type stages produce.
pub type StageResult = anyhow::Result<serde_json::Value>;

/// One named analysis step.
pub trait Stage {
    fn run(&self, page: &mut dyn RenderedPage, url: &str) -> StageResult;
}

/// Wraps a closure returning any serializable value as a [`Stage`].
///
/// ```rust
/// use swatch_dispatch::{FnStage, RenderedPage, Stage};
///
/// let stage = FnStage::new(|_page: &mut dyn RenderedPage, url: &str| {
///     Ok::<_, anyhow::Error>(url.len())
/// });
/// # let _ = stage;
/// ```
pub struct FnStage<F, T, E> {
    f: F,
    _phantom: std::marker::PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> FnStage<F, T, E>
where
    F: Fn(&mut dyn RenderedPage, &str) -> Result<T, E>,
    T: Serialize,
    E: Into<anyhow::Error>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, T, E> Stage for FnStage<F, T, E>
where
    F: Fn(&mut dyn RenderedPage, &str) -> Result<T, E>,
    T: Serialize,
    E: Into<anyhow::Error>,
{
    fn run(&self, page: &mut dyn RenderedPage, url: &str) -> StageResult {
        let output = (self.f)(page, url).map_err(Into::<anyhow::Error>::into)?;
        Ok(serde_json::to_value(output)?)
    }
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    fn run(&self, page: &mut dyn RenderedPage, url: &str) -> StageResult {
        (**self).run(page, url)
    }
}
