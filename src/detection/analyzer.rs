use super::classifier::FrameworkClassifier;
use super::descriptor::ProjectDescriptor;
use crate::catalog::{Catalog, LanguageCatalogEntry};
use crate::fs::FileSystem;
use crate::manifest::{self, ManifestError, RawManifest};
use crate::version::{VersionResolver, VersionSource};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Result of analyzing one project directory
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub descriptor: ProjectDescriptor,
    /// Indicator file that committed the language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_source: Option<VersionSource>,
    /// Set when the committed language's manifest could not be read
    #[serde(skip)]
    pub manifest_error: Option<ManifestError>,
}

impl Analysis {
    fn undetected() -> Self {
        Self {
            descriptor: ProjectDescriptor::default(),
            indicator: None,
            version_source: None,
            manifest_error: None,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.descriptor.is_detected()
    }
}

/// Walks the catalog languages in order and commits to the first one whose indicator is
/// present; only that language's manifest is read.
pub struct ProjectAnalyzer<'a> {
    catalog: &'a Catalog,
    fs: &'a dyn FileSystem,
}

impl<'a> ProjectAnalyzer<'a> {
    pub fn new(catalog: &'a Catalog, fs: &'a dyn FileSystem) -> Self {
        Self { catalog, fs }
    }

    pub fn analyze(&self, dir: &Path) -> Result<Analysis, AnalysisError> {
        self.validate_dir(dir)?;

        for entry in &self.catalog.languages {
            if let Some(indicator) = entry.find_indicator(self.fs, dir) {
                debug!("Found {} indicator {}", entry.name, indicator.display());
                return Ok(self.analyze_language(entry, dir, indicator));
            }
        }

        info!(
            "No supported language detected in {}; manual classification required",
            dir.display()
        );
        Ok(Analysis::undetected())
    }

    fn validate_dir(&self, dir: &Path) -> Result<(), AnalysisError> {
        if !self.fs.exists(dir) {
            return Err(AnalysisError::PathNotFound(dir.to_path_buf()));
        }

        if !self.fs.is_dir(dir) {
            return Err(AnalysisError::NotADirectory(dir.to_path_buf()));
        }

        Ok(())
    }

    fn analyze_language(
        &self,
        entry: &LanguageCatalogEntry,
        dir: &Path,
        indicator: PathBuf,
    ) -> Analysis {
        let mut descriptor = ProjectDescriptor::new(entry.name.clone(), entry.default_image());
        descriptor.version = Some(entry.default_version.clone());

        let (manifest, manifest_error) = match self.read_manifest(entry, dir) {
            Some(Ok(manifest)) => (Some(manifest), None),
            Some(Err(e)) => {
                warn!("{}; framework detection skipped", e);
                (None, Some(e))
            }
            None => {
                debug!("No manifest reader for {}; using defaults", entry.name);
                (None, None)
            }
        };

        // An unreadable manifest keeps the default image
        let version_source = if manifest_error.is_none() {
            let resolved = VersionResolver::new(self.fs).resolve(entry, dir, manifest.as_ref());
            descriptor.base_image = entry.image_for(&resolved.version);
            descriptor.version = Some(resolved.version);
            Some(resolved.source)
        } else {
            Some(VersionSource::Default)
        };

        if let Some(manifest) = manifest {
            descriptor.dependencies = manifest.dependencies;
            self.classify(entry, &mut descriptor);
        }

        info!(
            "Detected {} ({}) in {}",
            entry.name,
            descriptor
                .framework
                .as_ref()
                .map(|f| f.name())
                .unwrap_or_else(|| "no framework".to_string()),
            dir.display()
        );

        Analysis {
            descriptor,
            indicator: Some(indicator),
            version_source,
            manifest_error,
        }
    }

    fn read_manifest(
        &self,
        entry: &LanguageCatalogEntry,
        dir: &Path,
    ) -> Option<Result<RawManifest, ManifestError>> {
        let reader = manifest::reader_for(&entry.name)?;
        Some(reader.read(self.fs, dir))
    }

    fn classify(&self, entry: &LanguageCatalogEntry, descriptor: &mut ProjectDescriptor) {
        let Some(found) = FrameworkClassifier::new(entry).classify(&descriptor.dependencies)
        else {
            debug!("No {} framework markers matched", entry.name);
            return;
        };

        debug!(
            "Framework {} matched by dependency {}",
            found.entry.name, found.dependency
        );

        let framework = found.entry.clone();
        descriptor.framework = Some(framework.name.clone());
        if let Some(port) = framework.default_port() {
            descriptor.clear_ports();
            // Nonzero catalog ports are always accepted
            let _ = descriptor.add_port(port);
        }
        for var in framework.environment {
            descriptor.set_env(var);
        }
    }
}
