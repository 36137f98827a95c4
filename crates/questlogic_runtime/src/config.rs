//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [completion]
//! mode = "backward-only"
//! max_passes = 64
//!
//! [pipeline]
//! reduce = true
//! contract = false
//!
//! [log]
//! filter = "questlogic=debug"
//! ```

use std::fs;
use std::path::Path;

use questlogic_engine::{CompletionLimits, CompletionMode, PipelineConfig};
use questlogic_foundation::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// The `[completion]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSection {
    /// `"full"` or `"backward-only"`.
    pub mode: ModeSetting,
    /// Pass budget.
    pub max_passes: u32,
    /// Fetch budget.
    pub max_fetches: u32,
    /// Backward chain budget.
    pub max_depth: usize,
}

impl Default for CompletionSection {
    fn default() -> Self {
        let limits = CompletionLimits::default();
        Self {
            mode: ModeSetting::Full,
            max_passes: limits.max_passes,
            max_fetches: limits.max_fetches,
            max_depth: limits.max_depth,
        }
    }
}

/// Completion mode as written in the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSetting {
    /// Backward and forward closure.
    #[default]
    Full,
    /// Backward closure only.
    BackwardOnly,
}

impl From<ModeSetting> for CompletionMode {
    fn from(mode: ModeSetting) -> Self {
        match mode {
            ModeSetting::Full => Self::Full,
            ModeSetting::BackwardOnly => Self::BackwardOnly,
        }
    }
}

/// The `[pipeline]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Run transitive reduction.
    pub reduce: bool,
    /// Run cluster contraction.
    pub contract: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            reduce: true,
            contract: true,
        }
    }
}

/// The `[log]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default `EnvFilter` directives; a non-empty `RUST_LOG` replaces them.
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "questlogic=info".to_string(),
        }
    }
}

impl LogSection {
    /// Builds the subscriber filter from `RUST_LOG` (if set and valid), else
    /// from this table, else `info`.
    #[must_use]
    pub fn env_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .or_else(|| EnvFilter::try_new(&self.filter).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}

/// Everything the CLI reads from its config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Completion settings.
    pub completion: CompletionSection,
    /// Stage toggles.
    pub pipeline: PipelineSection,
    /// Logging settings.
    pub log: LogSection,
}

impl RuntimeConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    /// Returns a config error if the text is not valid TOML for this shape.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::new(ErrorKind::ConfigError(e.to_string())))
    }

    /// Loads a config file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a config error if
    /// it does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to read config '{}': {e}",
                path.display()
            )))
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e.kind {
            ErrorKind::ConfigError(message) => Error::new(ErrorKind::ConfigError(format!(
                "{}: {message}",
                path.display()
            ))),
            kind => Error::new(kind),
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    /// Returns a serialization error if TOML encoding fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }

    /// Completion budgets.
    #[must_use]
    pub fn limits(&self) -> CompletionLimits {
        CompletionLimits::default()
            .with_max_passes(self.completion.max_passes)
            .with_max_fetches(self.completion.max_fetches)
            .with_max_depth(self.completion.max_depth)
    }

    /// The engine pipeline configuration this file describes.
    #[must_use]
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_mode(self.completion.mode.into())
            .with_limits(self.limits())
            .with_reduce(self.pipeline.reduce)
            .with_contract(self.pipeline.contract)
    }
}
