pub mod loader;
pub mod validator;

use std::path::PathBuf;

use serde::Deserialize;

pub use loader::{load_config, load_config_from, CONFIG_ENV_VAR};

/// pH grid used for every computed diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for PhRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 14.0,
            step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Folder the save dialog opens in; falls back to the documents folder.
    pub start_dir: Option<PathBuf>,
    pub page_size: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            start_dir: None,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_per_second: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_per_second: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub image_name: String,
    pub workbook_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            image_width: 1000,
            image_height: 600,
            image_name: "distribution_diagram.png".to_string(),
            workbook_name: "distribution_diagram.xlsx".to_string(),
        }
    }
}

/// Default species names offered by the name prompts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelDefaults {
    pub acid: String,
    pub base: String,
}

impl Default for LabelDefaults {
    fn default() -> Self {
        Self {
            acid: "acid".to_string(),
            base: "base".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ph: PhRange,
    pub browser: BrowserConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub labels: LabelDefaults,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Config {
    /// Settings used when no config file is present.
    pub fn builtin() -> Self {
        Self {
            ph: PhRange::default(),
            browser: BrowserConfig::default(),
            display: DisplayConfig::default(),
            export: ExportConfig::default(),
            labels: LabelDefaults::default(),
            log_file: None,
        }
    }

    pub fn ph_values(&self) -> Vec<f64> {
        crate::distribution::ph_grid(self.ph.min, self.ph.max, self.ph.step)
    }
}
