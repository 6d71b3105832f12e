//! Light/dark classification.
//!
//! [`ThemeSignal`] gathers the evidence from a rendered page and [`classify`]
//! decides with a priority-ordered rule chain.

mod classifier;
mod mode;

pub use mode::ColorMode;
pub use classifier::{
    classify, ThemeReading, ThemeRule, ThemeSignal, DARK_BRIGHTNESS_THRESHOLD, DARK_CLASSES,
};
