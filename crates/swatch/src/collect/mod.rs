//! In-page probes.
//!
//! Each probe walks a [`StyledDocument`](swatch_dispatch::StyledDocument) and
//! returns raw, unranked samples. Counting happens in the page so only
//! compact tables cross the provider boundary; ranking and interpretation are
//! left to `swatch_tokens`.
//!
//! A document missing the elements a probe looks for (no body, no header, no
//! buttons) yields empty samples, never an error.

mod borders;
mod colors;
mod fonts;
mod theme;

pub use borders::BorderProbe;
pub use colors::{ColorProbe, BUTTON_SELECTORS, FOOTER_SELECTORS, HEADER_SELECTORS};
pub use fonts::FontProbe;
pub use theme::ThemeProbe;
