use std::fmt;

use serde::{Deserialize, Serialize};

/// Light or dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ColorMode {
    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Light => f.write_str("light"),
            ColorMode::Dark => f.write_str("dark"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ColorMode::Dark).unwrap(), r#""dark""#);
        assert_eq!(
            serde_json::from_str::<ColorMode>(r#""light""#).unwrap(),
            ColorMode::Light
        );
        assert_eq!(ColorMode::Dark.to_string(), "dark");
        assert!(!ColorMode::default().is_dark());
    }
}
