//! Analyzer configuration.
//!
//! ```yaml
//! limits:
//!   top_entries: 5
//!   button_pairs: 3
//!   sample_elements: 5
//!   excerpt_chars: 100
//! stages: [theme, colors, fonts, borders]
//! format: json
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use swatch_dispatch::ExportFormat;
use swatch_tokens::Limits;

use crate::error::ConfigError;
use crate::stages::DEFAULT_STAGES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwatchConfig {
    pub limits: Limits,
    /// Stages of the default pipeline, in run order.
    pub stages: Vec<String>,
    /// Format used by [`Swatch::report`](crate::Swatch::report).
    pub format: ExportFormat,
}

impl Default for SwatchConfig {
    fn default() -> Self {
        SwatchConfig {
            limits: Limits::default(),
            stages: DEFAULT_STAGES.iter().map(|s| s.to_string()).collect(),
            format: ExportFormat::default(),
        }
    }
}

impl SwatchConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document is a config with every default.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_yaml(&yaml)
    }
}
