//! Test harness for `swatch`.
//!
//! Provides a [`SyntheticProvider`] that serves hand-built
//! [`SyntheticDocument`]s instead of driving a browser, so analyzers and
//! pipelines can be exercised in-process with exact computed styles.
//!
//! ```rust
//! use swatch_test::{Element, SyntheticDocument, SyntheticProvider};
//!
//! let mut doc = SyntheticDocument::new().with_default_style("border-radius", "8px");
//! doc.append_to_body(
//!     Element::new("button")
//!         .class("btn")
//!         .style("background-color", "rgb(0, 85, 255)")
//!         .style("color", "rgb(255, 255, 255)"),
//! );
//!
//! let provider = SyntheticProvider::new().route("https://example.test/", doc);
//! assert_eq!(provider.log().acquired, 0);
//! ```
//!
//! `(prefers-color-scheme: dark)` answers from
//! [`SyntheticDocument::prefers_dark`], light unless set.

mod document;
mod provider;
mod selector;

pub use document::{Element, SyntheticDocument};
pub use provider::{ProviderLog, SyntheticPage, SyntheticProvider};
pub use selector::{Matchable, SelectorError, SelectorList};
