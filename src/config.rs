//! Configuration management for dockerizer
//!
//! Settings are read from environment variables with fallback defaults. CLI flags take
//! precedence over everything loaded here.
//!
//! # Environment Variables
//!
//! - `DOCKERIZER_CATALOG_DIR`: directory holding `languages.yaml` and/or `databases.yaml`
//!   that replace the built-in catalogs - default: `<config dir>/dockerizer` when it exists
//! - `DOCKERIZER_OUTPUT_DIR`: where generated files are written - default: the analyzed
//!   project directory
//! - `DOCKERIZER_LOG_LEVEL`: logging level - default: "warn"
//!
//! # Example
//!
//! ```no_run
//! use dockerizer::DockerizerConfig;
//!
//! let config = DockerizerConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CATALOG_DIR_ENV: &str = "DOCKERIZER_CATALOG_DIR";
pub const OUTPUT_DIR_ENV: &str = "DOCKERIZER_OUTPUT_DIR";
pub const LOG_LEVEL_ENV: &str = crate::util::logging::LOG_LEVEL_ENV;

const DEFAULT_LOG_LEVEL: &str = "warn";
const APP_DIR: &str = "dockerizer";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Catalog directory {0:?} does not exist or is not a directory")]
    CatalogDirMissing(PathBuf),

    #[error("Output path {0:?} exists and is not a directory")]
    OutputNotADirectory(PathBuf),

    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerizerConfig {
    /// User catalog overrides
    pub catalog_dir: Option<PathBuf>,

    /// Output directory; `None` writes next to the analyzed project
    pub output_dir: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `<config dir>/dockerizer`, only when the directory exists
fn user_catalog_dir() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .filter(|dir| dir.is_dir())
}

impl Default for DockerizerConfig {
    fn default() -> Self {
        let catalog_dir = non_empty_var(CATALOG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(user_catalog_dir);

        let output_dir = non_empty_var(OUTPUT_DIR_ENV).map(PathBuf::from);

        let log_level = non_empty_var(LOG_LEVEL_ENV)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            catalog_dir,
            output_dir,
            log_level,
        }
    }
}

impl DockerizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.catalog_dir {
            if !dir.is_dir() {
                return Err(ConfigError::CatalogDirMissing(dir.clone()));
            }
        }

        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::OutputNotADirectory(dir.clone()));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }

    /// Output directory for a project, defaulting to the project itself
    pub fn output_dir_for(&self, project: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| project.to_path_buf())
    }
}

impl fmt::Display for DockerizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dockerizer Configuration:")?;
        match &self.catalog_dir {
            Some(dir) => writeln!(f, "  Catalog Dir: {}", dir.display())?,
            None => writeln!(f, "  Catalog Dir: (built-in)")?,
        }
        match &self.output_dir {
            Some(dir) => writeln!(f, "  Output Dir: {}", dir.display())?,
            None => writeln!(f, "  Output Dir: (project directory)")?,
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
