//! xref configuration loading from `.xrefrc.toml`.
//!
//! Configuration is optional. Every setting has a built-in default and every
//! setting can be overridden from the command line.
//!
//! # Example Configuration
//!
//! ```toml
//! [data]
//! fp_file = "exports/FP_WIN.csv"
//! ac_file = "exports/AC.csv"
//! delimiter = ";"
//!
//! [ingest]
//! on_malformed = "skip"
//!
//! [output]
//! format = "json"
//! color = false
//! ```

use serde::Deserialize;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".xrefrc.toml";

/// Default location of the function/failure export.
pub const DEFAULT_FP_FILE: &str = "./data/FP_WIN.csv";

/// Default location of the article/cause export.
pub const DEFAULT_AC_FILE: &str = "./data/AC.csv";

/// Root configuration structure loaded from `.xrefrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct XrefConfig {
    /// Input file locations and syntax.
    #[serde(default)]
    pub data: DataConfig,

    /// Row handling.
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where the two exports live and how they are delimited.
#[derive(Debug, Deserialize, Default)]
pub struct DataConfig {
    /// Function/failure export path.
    #[serde(default)]
    pub fp_file: Option<String>,

    /// Article/cause export path.
    #[serde(default)]
    pub ac_file: Option<String>,

    /// Field separator. Must be a single character.
    #[serde(default)]
    pub delimiter: Option<char>,
}

#[derive(Debug, Deserialize, Default)]
pub struct IngestConfig {
    /// One of `stop`, `skip`, `fail`.
    #[serde(default)]
    pub on_malformed: Option<String>,
}

/// Output formatting preferences.
///
/// Command-line flags (e.g., `--format json`) override these settings.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `table`, `json`, `csv`, `tree`
    #[serde(default)]
    pub format: Option<String>,

    /// Defaults to `true` when stdout is a TTY.
    #[serde(default)]
    pub color: Option<bool>,
}

impl XrefConfig {
    /// Load configuration from `.xrefrc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn fp_file(&self) -> &str {
        self.data.fp_file.as_deref().unwrap_or(DEFAULT_FP_FILE)
    }

    pub fn ac_file(&self) -> &str {
        self.data.ac_file.as_deref().unwrap_or(DEFAULT_AC_FILE)
    }

    pub fn delimiter(&self) -> Option<char> {
        self.data.delimiter
    }

    pub fn on_malformed(&self) -> Option<&str> {
        self.ingest.on_malformed.as_deref()
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
