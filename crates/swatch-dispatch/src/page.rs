//! The rendered-page provider interface.
//!
//! Rendering, navigation and pixel capture belong to an external engine (a
//! headless browser, a test double). This module defines what the extraction
//! pipeline needs from it:
//!
//! - [`PageProvider`]: owns the engine and hands out pages, with an explicit
//!   lifecycle (`init`, `acquire`, `release`, `shutdown`)
//! - [`RenderedPage`]: one page; navigates, evaluates probes, captures pixels
//! - [`StyledDocument`]: what a probe sees, the live document with computed
//!   styles
//! - [`Probe`]: a pure function run against the document whose result crosses
//!   back as JSON
//!
//! # Cleanup
//!
//! [`PageGuard`] and [`Session`] release what they hold when dropped, on every
//! exit path, unwinding included:
//!
//! ```rust,ignore
//! let mut session = Session::start(&mut provider)?;   // init
//! let mut page = session.page()?;                     // acquire
//! page.navigate("https://example.com/")?;
//! let value = page.evaluate(&probe)?;
//! // drop: release, then shutdown
//! ```

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ExtractionFailure, ProviderError};

/// Opaque handle to an element of a [`StyledDocument`].
pub type ElementId = usize;

/// A rendered document with resolved computed styles.
///
/// Style values are returned exactly as the engine reports them; no cascade or
/// layout happens on this side.
pub trait StyledDocument {
    /// Every element in document order.
    fn elements(&self) -> Vec<ElementId>;

    /// The root (`<html>`) element.
    fn root(&self) -> Option<ElementId>;

    fn body(&self) -> Option<ElementId>;

    /// The first element, in document order, matching any selector of the list.
    fn query_selector(&self, selectors: &str) -> Option<ElementId> {
        self.query_selector_all(selectors).into_iter().next()
    }

    /// All elements matching any selector of the list, in document order.
    fn query_selector_all(&self, selectors: &str) -> Vec<ElementId>;

    /// Lowercase tag name.
    fn tag_name(&self, element: ElementId) -> String;

    /// The raw `class` attribute; empty when absent.
    fn class_name(&self, element: ElementId) -> String;

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.class_name(element)
            .split_whitespace()
            .any(|c| c == class)
    }

    /// Concatenated text of the element and its descendants.
    fn text_content(&self, element: ElementId) -> String;

    /// The computed value of a CSS property (`background-color`,
    /// `border-top-width`, ...). `None` when the engine reports nothing.
    fn computed_style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Evaluates a media query such as `(prefers-color-scheme: dark)`.
    fn matches_media(&self, query: &str) -> bool;
}

/// A function evaluated inside a rendered page.
///
/// Probes only read the document. Their result is JSON so that engines running
/// out of process can carry it back.
pub trait Probe {
    /// Identifies the probe in errors and logs.
    fn name(&self) -> &str;

    fn run(&self, document: &dyn StyledDocument) -> Result<serde_json::Value, serde_json::Error>;
}

/// A probe with a typed result.
///
/// Every `TypedProbe` is a [`Probe`]; use [`collect`] to get the typed value
/// back out of a page.
pub trait TypedProbe {
    type Output: Serialize + DeserializeOwned;

    const NAME: &'static str;

    fn collect(&self, document: &dyn StyledDocument) -> Self::Output;
}

impl<T: TypedProbe> Probe for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn run(&self, document: &dyn StyledDocument) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.collect(document))
    }
}

/// One page handle from a [`PageProvider`].
pub trait RenderedPage {
    /// Loads `url` and returns once the page has settled.
    fn navigate(&mut self, url: &str) -> Result<(), ProviderError>;

    /// Runs a probe against the current document.
    fn evaluate(&mut self, probe: &dyn Probe) -> Result<serde_json::Value, ProviderError>;

    /// PNG bytes of the viewport, or of the whole document with `full_page`.
    fn capture_pixels(&mut self, full_page: bool) -> Result<Vec<u8>, ProviderError>;
}

/// Evaluates a probe and decodes its result.
pub fn evaluate_as<T: DeserializeOwned>(
    page: &mut dyn RenderedPage,
    probe: &dyn Probe,
) -> Result<T, ExtractionFailure> {
    let value = page.evaluate(probe)?;
    serde_json::from_value(value).map_err(|source| ExtractionFailure::Decode {
        probe: probe.name().to_string(),
        source,
    })
}

/// Runs a typed probe in a page.
pub fn collect<T: TypedProbe>(
    page: &mut dyn RenderedPage,
    probe: &T,
) -> Result<T::Output, ExtractionFailure> {
    evaluate_as(page, probe)
}

/// Source of rendered pages.
pub trait PageProvider {
    type Page: RenderedPage;

    /// Starts the engine. Calling it on a started provider does nothing.
    fn init(&mut self) -> Result<(), ProviderError>;

    fn acquire(&mut self) -> Result<Self::Page, ProviderError>;

    /// Closes a page. Must tolerate pages that already failed.
    fn release(&mut self, page: &mut Self::Page);

    /// Stops the engine. Pages still open become unusable.
    fn shutdown(&mut self);
}

/// A page that is released back to its provider when dropped.
pub struct PageGuard<'p, P: PageProvider> {
    provider: &'p mut P,
    page: P::Page,
}

impl<'p, P: PageProvider> PageGuard<'p, P> {
    pub fn acquire(provider: &'p mut P) -> Result<Self, ProviderError> {
        let page = provider.acquire()?;
        Ok(PageGuard { provider, page })
    }
}

impl<P: PageProvider> Deref for PageGuard<'_, P> {
    type Target = P::Page;

    fn deref(&self) -> &Self::Target {
        &self.page
    }
}

impl<P: PageProvider> DerefMut for PageGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.page
    }
}

impl<P: PageProvider> Drop for PageGuard<'_, P> {
    fn drop(&mut self) {
        tracing::debug!("releasing page");
        self.provider.release(&mut self.page);
    }
}

/// A started provider that is shut down when dropped.
pub struct Session<'p, P: PageProvider> {
    provider: &'p mut P,
}

impl<'p, P: PageProvider> Session<'p, P> {
    pub fn start(provider: &'p mut P) -> Result<Self, ProviderError> {
        provider.init()?;
        Ok(Session { provider })
    }

    pub fn page(&mut self) -> Result<PageGuard<'_, P>, ProviderError> {
        PageGuard::acquire(self.provider)
    }
}

impl<P: PageProvider> Drop for Session<'_, P> {
    fn drop(&mut self) {
        tracing::debug!("shutting down page provider");
        self.provider.shutdown();
    }
}
