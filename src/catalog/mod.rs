//! Language and database catalogs.
//!
//! The catalogs are plain data: which indicator files select a language, which base image
//! and default version it uses, which frameworks exist per language (dependency markers,
//! default port, commands, database choices), and which database engines can be added to
//! the generated topology. Embedded defaults ship with the binary; a catalog directory
//! containing `languages.yaml` and/or `databases.yaml` replaces the corresponding catalog.

use crate::detection::EnvVar;
use crate::fs::FileSystem;
use crate::stack::{DatabaseId, FrameworkId, LanguageId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_LANGUAGES: &str = include_str!("defaults/languages.yaml");
const DEFAULT_DATABASES: &str = include_str!("defaults/databases.yaml");

pub const LANGUAGES_FILE: &str = "languages.yaml";
pub const DATABASES_FILE: &str = "databases.yaml";

const VERSION_PLACEHOLDER: &str = "{version}";
const PORT_PLACEHOLDER: &str = "{port}";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to parse catalog {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid catalog {origin}: {message}")]
    Invalid { origin: String, message: String },
}

/// A framework within a language's catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkCatalogEntry {
    pub name: FrameworkId,
    /// Dependency names whose presence signals this framework
    pub markers: Vec<String>,
    /// Default application port, 0 for none
    #[serde(default)]
    pub port: u16,
    /// Builder stage `RUN` step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    /// Start command, split on whitespace into the exec-form `CMD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Database engines that make sense for this framework
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<DatabaseId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<EnvVar>,
}

impl FrameworkCatalogEntry {
    pub fn default_port(&self) -> Option<u16> {
        (self.port != 0).then_some(self.port)
    }

    pub fn allows_database(&self, database: &DatabaseId) -> bool {
        self.databases.is_empty() || self.databases.contains(database)
    }

    /// Build step with `{port}` replaced by `port`, or the framework default port
    pub fn build_command(&self, port: Option<u16>) -> Option<String> {
        self.build.as_deref().map(|build| self.fill_port(build, port))
    }

    /// Start command in exec form with `{port}` replaced like [`Self::build_command`]
    pub fn start_command(&self, port: Option<u16>) -> Option<Vec<String>> {
        let start = self.fill_port(self.start.as_deref()?, port);
        let args: Vec<String> = start.split_whitespace().map(str::to_string).collect();
        (!args.is_empty()).then_some(args)
    }

    fn fill_port(&self, command: &str, port: Option<u16>) -> String {
        match port.or(self.default_port()) {
            Some(port) => command.replace(PORT_PLACEHOLDER, &port.to_string()),
            None => command.to_string(),
        }
    }

    fn uses_port(&self) -> bool {
        [&self.build, &self.start]
            .into_iter()
            .flatten()
            .any(|command| command.contains(PORT_PLACEHOLDER))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCatalogEntry {
    pub name: LanguageId,
    /// Filenames whose presence in a directory signals this language
    pub indicators: Vec<String>,
    /// Base image template; `{version}` is replaced with the resolved version
    pub image: String,
    pub default_version: String,
    #[serde(default)]
    pub frameworks: Vec<FrameworkCatalogEntry>,
}

impl LanguageCatalogEntry {
    pub fn image_for(&self, version: &str) -> String {
        self.image.replace(VERSION_PLACEHOLDER, version)
    }

    pub fn default_image(&self) -> String {
        self.image_for(&self.default_version)
    }

    pub fn framework(&self, id: &FrameworkId) -> Option<&FrameworkCatalogEntry> {
        self.frameworks.iter().find(|f| &f.name == id)
    }

    /// First indicator file present in `dir`, if any
    pub fn find_indicator(&self, fs: &dyn FileSystem, dir: &Path) -> Option<PathBuf> {
        self.indicators
            .iter()
            .map(|name| dir.join(name))
            .find(|path| fs.is_file(path))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseCatalogEntry {
    pub name: DatabaseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub image: String,
    /// Container port
    pub port: u16,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
}

#[derive(Debug, Clone, Deserialize)]
struct LanguagesFile {
    languages: Vec<LanguageCatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabasesFile {
    databases: Vec<DatabaseCatalogEntry>,
}

/// Read-only catalog consulted during detection and generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub languages: Vec<LanguageCatalogEntry>,
    pub databases: Vec<DatabaseCatalogEntry>,
}

impl Catalog {
    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self {
            languages: parse_languages(DEFAULT_LANGUAGES, "builtin languages")?,
            databases: parse_databases(DEFAULT_DATABASES, "builtin databases")?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Builtin catalog with any `languages.yaml` / `databases.yaml` found in `dir` replacing
    /// the corresponding part
    pub fn load(fs: &dyn FileSystem, dir: Option<&Path>) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin()?;

        let Some(dir) = dir else {
            return Ok(catalog);
        };

        let languages_path = dir.join(LANGUAGES_FILE);
        if fs.is_file(&languages_path) {
            let content = read_catalog_file(fs, &languages_path)?;
            catalog.languages = parse_languages(&content, &languages_path.display().to_string())?;
            info!(path = %languages_path.display(), "Loaded language catalog");
        }

        let databases_path = dir.join(DATABASES_FILE);
        if fs.is_file(&databases_path) {
            let content = read_catalog_file(fs, &databases_path)?;
            catalog.databases = parse_databases(&content, &databases_path.display().to_string())?;
            info!(path = %databases_path.display(), "Loaded database catalog");
        }

        catalog.validate()?;
        debug!(
            languages = catalog.languages.len(),
            databases = catalog.databases.len(),
            "Catalog ready"
        );
        Ok(catalog)
    }

    pub fn language(&self, id: &LanguageId) -> Option<&LanguageCatalogEntry> {
        self.languages.iter().find(|l| &l.name == id)
    }

    pub fn database(&self, id: &DatabaseId) -> Option<&DatabaseCatalogEntry> {
        self.databases.iter().find(|d| &d.name == id)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |message: String| CatalogError::Invalid {
            origin: "catalog".to_string(),
            message,
        };

        if self.languages.is_empty() {
            return Err(invalid("no languages defined".to_string()));
        }

        let mut seen = HashSet::new();
        for language in &self.languages {
            if !seen.insert(&language.name) {
                return Err(invalid(format!("language '{}' defined twice", language.name)));
            }
            if language.indicators.is_empty() {
                return Err(invalid(format!(
                    "language '{}' has no indicator files",
                    language.name
                )));
            }
            if language.image.trim().is_empty() || language.default_version.trim().is_empty() {
                return Err(invalid(format!(
                    "language '{}' needs both an image and a default_version",
                    language.name
                )));
            }

            let mut frameworks = HashSet::new();
            for framework in &language.frameworks {
                if !frameworks.insert(&framework.name) {
                    return Err(invalid(format!(
                        "framework '{}' defined twice for {}",
                        framework.name.key(),
                        language.name
                    )));
                }
                if framework.markers.is_empty() {
                    return Err(invalid(format!(
                        "framework '{}' of {} has no dependency markers",
                        framework.name.key(),
                        language.name
                    )));
                }
                if framework.uses_port() && framework.default_port().is_none() {
                    return Err(invalid(format!(
                        "framework '{}' of {} uses {} in a command but has no port",
                        framework.name.key(),
                        language.name,
                        PORT_PLACEHOLDER
                    )));
                }
            }
        }

        let mut databases = HashSet::new();
        for database in &self.databases {
            if !databases.insert(&database.name) {
                return Err(invalid(format!(
                    "database '{}' defined twice",
                    database.name.key()
                )));
            }
            if database.port == 0 {
                return Err(invalid(format!(
                    "database '{}' needs a nonzero port",
                    database.name.key()
                )));
            }
        }

        Ok(())
    }
}

fn read_catalog_file(fs: &dyn FileSystem, path: &Path) -> Result<String, CatalogError> {
    fs.read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_languages(content: &str, origin: &str) -> Result<Vec<LanguageCatalogEntry>, CatalogError> {
    serde_yaml::from_str::<LanguagesFile>(content)
        .map(|file| file.languages)
        .map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })
}

fn parse_databases(content: &str, origin: &str) -> Result<Vec<DatabaseCatalogEntry>, CatalogError> {
    serde_yaml::from_str::<DatabasesFile>(content)
        .map(|file| file.databases)
        .map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })
}
