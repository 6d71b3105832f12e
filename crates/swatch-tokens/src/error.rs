//! Error types for token parsing.
//!
//! [`ParseFailure`] is never fatal to an analysis: callers drop the sample that
//! failed to parse and keep going.

use thiserror::Error;

/// A computed-style value that could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The value was empty or whitespace.
    #[error("empty value")]
    Empty,

    /// The value is not a hex, `rgb()`/`rgba()` or `transparent` literal.
    #[error("unrecognized color: {0}")]
    UnrecognizedColor(String),

    /// A hex literal with the wrong length or non-hex digits.
    #[error("invalid hex color: {0} (must be 3 or 6 digits)")]
    InvalidHex(String),

    /// An `rgb()`/`rgba()` component out of range or of the wrong kind.
    #[error("invalid color component in {0}")]
    InvalidComponent(String),

    /// A `border` shorthand not in `<width> <style> <color>` form.
    #[error("unsupported border shorthand: {0}")]
    BorderShorthand(String),
}
