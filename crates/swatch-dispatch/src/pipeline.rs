//! Named-stage extraction pipeline.
//!
//! A [`Pipeline`] is an ordered registry of stages. [`Pipeline::extract`] opens
//! one page, navigates it once and runs every stage against it in registration
//! order. A stage that fails or panics does not stop the run: its entry in the
//! [`StageResults`] becomes unavailable and the next stage runs.
//!
//! ```rust
//! use swatch_dispatch::{Pipeline, RenderedPage};
//!
//! let mut pipeline = Pipeline::new();
//! pipeline
//!     .stage("title", |_page: &mut dyn RenderedPage, _url: &str| Ok::<_, anyhow::Error>("Home"))?
//!     .stage("url", |_page: &mut dyn RenderedPage, url: &str| Ok::<_, anyhow::Error>(url.to_string()))?;
//!
//! assert_eq!(pipeline.names(), vec!["title", "url"]);
//! # Ok::<(), swatch_dispatch::ConfigurationError>(())
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{ConfigurationError, PipelineError};
use crate::page::{PageProvider, RenderedPage, Session};
use crate::stage::{FnStage, Stage};

/// Checks that `url` is present and absolute. Returns it trimmed.
pub fn validate_url(url: &str) -> Result<&str, ConfigurationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigurationError::MissingUrl);
    }
    url::Url::parse(url).map_err(|e| ConfigurationError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(url)
}

/// What a stage produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Completed(serde_json::Value),
    /// The stage failed; `error` is its rendered error chain.
    Unavailable { error: String },
}

impl StageOutcome {
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            StageOutcome::Completed(value) => Some(value),
            StageOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StageOutcome::Completed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub name: String,
    pub outcome: StageOutcome,
}

/// Per-stage results of one run, in registration order.
///
/// Serializes as a map from stage name to result, with `null` for stages that
/// failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageResults {
    records: Vec<StageRecord>,
}

impl StageResults {
    fn push(&mut self, name: &str, outcome: StageOutcome) {
        self.records.push(StageRecord {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn outcome(&self, name: &str) -> Option<&StageOutcome> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    /// The value of a completed stage. `None` if the stage failed or did not run.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.outcome(name).and_then(StageOutcome::value)
    }

    /// Decodes a completed stage's value.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Option<Result<T, serde_json::Error>> {
        self.get(name)
            .map(|value| serde_json::from_value(value.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageRecord> {
        self.records.iter()
    }

    /// Names of stages that failed.
    pub fn unavailable(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| !r.outcome.is_available())
            .map(|r| r.name.as_str())
            .collect()
    }
}

impl Serialize for StageResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.name, &record.outcome.value())?;
        }
        map.end()
    }
}

/// An ordered registry of named stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<(String, Box<dyn Stage>)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stage. Re-registering a name replaces that stage and keeps
    /// its position.
    pub fn add<S: Stage + 'static>(
        &mut self,
        name: impl Into<String>,
        stage: S,
    ) -> Result<&mut Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyStageName);
        }

        let stage: Box<dyn Stage> = Box::new(stage);
        match self.stages.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = stage,
            None => self.stages.push((name, stage)),
        }
        Ok(self)
    }

    /// Registers a closure as a stage.
    pub fn stage<F, T, E>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&mut dyn RenderedPage, &str) -> Result<T, E> + 'static,
        T: Serialize + 'static,
        E: Into<anyhow::Error> + 'static,
    {
        self.add(name, FnStage::new(f))
    }

    /// Removes a stage. Returns whether it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.stages.len();
        self.stages.retain(|(existing, _)| existing != name);
        self.stages.len() != before
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stages.iter().any(|(existing, _)| existing == name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage against one page showing `url`.
    ///
    /// Fails without touching the provider when `url` is missing or invalid.
    /// Returns empty results, also without touching the provider, when no
    /// stages are registered. Provider start-up, page acquisition and
    /// navigation failures end the run; stage failures do not. The page is
    /// released and the provider shut down before this returns, whatever the
    /// outcome.
    pub fn extract<P: PageProvider>(
        &self,
        provider: &mut P,
        url: &str,
    ) -> Result<StageResults, PipelineError> {
        let url = validate_url(url)?;
        if self.stages.is_empty() {
            tracing::debug!(url, "no stages registered");
            return Ok(StageResults::default());
        }

        tracing::info!(url, stages = self.stages.len(), "starting extraction");
        let mut session = Session::start(provider)?;
        let mut page = session.page()?;
        page.navigate(url)?;

        let mut results = StageResults::default();
        for (name, stage) in &self.stages {
            tracing::debug!(stage = %name, "running stage");
            let run = panic::catch_unwind(AssertUnwindSafe(|| stage.run(&mut *page, url)));
            let outcome = match run {
                Ok(Ok(value)) => StageOutcome::Completed(value),
                Ok(Err(err)) => {
                    let error = format!("{:#}", err);
                    tracing::warn!(stage = %name, %error, "stage failed");
                    StageOutcome::Unavailable { error }
                }
                Err(payload) => {
                    let error = format!("stage panicked: {}", panic_message(payload.as_ref()));
                    tracing::warn!(stage = %name, %error, "stage panicked");
                    StageOutcome::Unavailable { error }
                }
            };
            results.push(name, outcome);
        }

        tracing::info!(
            url,
            unavailable = results.unavailable().len(),
            "extraction finished"
        );
        Ok(results)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.names())
            .finish()
    }
}
