//! Manifest readers.
//!
//! Each reader locates one ecosystem's manifest in a project directory and parses it into
//! a [`RawManifest`]: the dependency names it declares plus any runtime version hints it
//! carries. Readers never write and never look past their own manifest; auxiliary version
//! files are the [`crate::version`] resolver's concern.

mod go;
mod java;
mod node;
pub mod parsers;
mod php;
mod python;
mod ruby;

pub use go::GoModReader;
pub use java::PomReader;
pub use node::PackageJsonReader;
pub use php::ComposerReader;
pub use python::RequirementsReader;
pub use ruby::GemfileReader;

use crate::fs::FileSystem;
use crate::stack::LanguageId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{language} manifest not found at {path:?}")]
    NotFound { language: String, path: PathBuf },

    #[error("{language} manifest {path:?} could not be parsed: {reason}")]
    Unreadable {
        language: String,
        path: PathBuf,
        reason: String,
    },
}

impl ManifestError {
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. } | Self::Unreadable { path, .. } => path,
        }
    }
}

/// A version constraint found inside a manifest, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHint {
    pub source: String,
    pub constraint: String,
}

impl VersionHint {
    pub fn new(source: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            constraint: constraint.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawManifest {
    pub path: PathBuf,
    pub dependencies: BTreeSet<String>,
    /// In priority order
    pub version_hints: Vec<VersionHint>,
}

pub trait ManifestReader: Send + Sync {
    fn language(&self) -> LanguageId;

    /// Manifest filename, relative to the project directory
    fn manifest_name(&self) -> &'static str;

    /// Parse manifest content; `path` is only used for error context
    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError>;

    fn read(&self, fs: &dyn FileSystem, dir: &Path) -> Result<RawManifest, ManifestError> {
        let path = dir.join(self.manifest_name());
        if !fs.is_file(&path) {
            return Err(ManifestError::NotFound {
                language: self.language().name(),
                path,
            });
        }

        let content = fs
            .read_to_string(&path)
            .map_err(|e| self.unreadable(&path, format!("{:#}", e)))?;
        self.parse(&path, &content)
    }

    fn unreadable(&self, path: &Path, reason: String) -> ManifestError {
        ManifestError::Unreadable {
            language: self.language().name(),
            path: path.to_path_buf(),
            reason,
        }
    }
}

/// Reader registered for a language; catalog-defined languages have none
pub fn reader_for(language: &LanguageId) -> Option<Box<dyn ManifestReader>> {
    match language {
        LanguageId::NodeJs => Some(Box::new(PackageJsonReader)),
        LanguageId::Python => Some(Box::new(RequirementsReader)),
        LanguageId::Go => Some(Box::new(GoModReader)),
        LanguageId::Java => Some(Box::new(PomReader)),
        LanguageId::Php => Some(Box::new(ComposerReader)),
        LanguageId::Ruby => Some(Box::new(GemfileReader)),
        LanguageId::Custom(_) => None,
    }
}
