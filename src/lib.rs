//! dockerizer - container configuration from project manifests
//!
//! Inspects a project directory, identifies its language, framework and runtime version
//! from dependency manifests, and generates a multi-stage `Dockerfile` and a
//! `docker-compose.yml` with the backing services the framework usually needs.
//!
//! # Example Usage
//!
//! ```no_run
//! use dockerizer::{generate_all, Catalog, ProjectAnalyzer, RealFileSystem};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fs = RealFileSystem;
//! let catalog = Catalog::builtin()?;
//! let analysis = ProjectAnalyzer::new(&catalog, &fs).analyze(Path::new("."))?;
//!
//! let report = generate_all(&analysis.descriptor, &catalog, &fs, Path::new("."));
//! for error in report.errors() {
//!     eprintln!("{}", error);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`catalog`]: language, framework and database data (built-in YAML, user overridable)
//! - [`manifest`]: per-language dependency manifest readers
//! - [`version`]: runtime version resolution and normalization
//! - [`detection`]: the analyzer producing a [`ProjectDescriptor`]
//! - [`generate`]: Dockerfile recipes, compose topology and cleanup

pub mod catalog;
pub mod cli;
pub mod config;
pub mod detection;
pub mod fs;
pub mod generate;
pub mod manifest;
pub mod stack;
pub mod util;
pub mod version;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, DockerizerConfig};
pub use detection::{Analysis, AnalysisError, Overrides, ProjectAnalyzer, ProjectDescriptor};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use generate::{generate_all, GenerateError, GenerationReport};
pub use stack::{DatabaseId, FrameworkId, LanguageId};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
