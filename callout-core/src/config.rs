//! Extraction configuration
//!
//! Names the utility whose work is being called out and the record types kept
//! from graph exports. Stored as TOML under `.callout/config.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::LocationLabel;

/// Configuration for callout extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutConfig {
    /// Organization whose construction notes are kept
    pub utility: String,

    /// Notes text for poles with no work by the utility
    pub no_work_notes: String,

    /// Node type retained from `nodes` exports
    pub pole_type: String,

    /// Connection type retained from `connections` exports
    pub span_type: String,

    /// Default callout label; a workbook flag cell can switch it
    pub label: LocationLabel,

    /// Hide locations whose notes are the no-work sentinel
    pub hide_no_work: bool,
}

impl Default for CalloutConfig {
    fn default() -> Self {
        Self {
            utility: "Alabama Power".to_string(),
            no_work_notes: "NO APC WORK".to_string(),
            pole_type: "pole".to_string(),
            span_type: "aerial cable".to_string(),
            label: LocationLabel::Loc,
            hide_no_work: true,
        }
    }
}

impl CalloutConfig {
    /// Get the default configuration path
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(".callout/config.toml")
    }

    /// Load the given file, the default file if present, or the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).context("Failed to parse callout config")?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize callout config")?;

        fs::write(path, content).context("Failed to write callout config file")?;

        Ok(())
    }
}
