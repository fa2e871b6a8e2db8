//! Dockerfile and docker-compose generation from a [`ProjectDescriptor`].
//!
//! Both generators read the descriptor only. They are attempted independently so one
//! failing does not prevent the other from being written.

pub mod output;
pub mod proxy;
pub mod recipe;
pub mod shapes;
pub mod topology;

pub use output::{clean, CleanReport, COMPOSE_FILE, DOCKERFILE};
pub use recipe::{build_recipe, generate_recipe, Instruction, Recipe, Stage};
pub use topology::{build_topology, generate_topology, ComposeDocument, Topology, TopologyOutput};

use crate::catalog::Catalog;
use crate::detection::ProjectDescriptor;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Port PHP-FPM listens on inside the app container
pub const PHP_FPM_PORT: u16 = 9000;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Cannot generate a Dockerfile: no language detected (use --language to set one)")]
    LanguageNotDetected,

    #[error("Unsupported language for Dockerfile generation: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported {language} framework for Dockerfile generation: {framework}")]
    UnsupportedFramework { language: String, framework: String },

    #[error("No base image set for {0}")]
    MissingBaseImage(String),

    #[error("Generated {path:?} is empty, no recipe matched the project")]
    EmptyRenderOutput { path: PathBuf },

    #[error("Failed to write {path:?}: {source:#}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to serialize docker-compose document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Outcome of running both generators
#[derive(Debug)]
pub struct GenerationReport {
    pub dockerfile: Result<PathBuf, GenerateError>,
    pub topology: Result<TopologyOutput, GenerateError>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.dockerfile.is_ok() && self.topology.is_ok()
    }

    pub fn errors(&self) -> Vec<&GenerateError> {
        let mut errors = Vec::new();
        if let Err(e) = &self.dockerfile {
            errors.push(e);
        }
        if let Err(e) = &self.topology {
            errors.push(e);
        }
        errors
    }
}

pub fn generate_all(
    descriptor: &ProjectDescriptor,
    catalog: &Catalog,
    fs: &dyn FileSystem,
    output_dir: &Path,
) -> GenerationReport {
    GenerationReport {
        dockerfile: generate_recipe(descriptor, catalog, fs, output_dir),
        topology: generate_topology(descriptor, catalog, fs, output_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::stack::{FrameworkId, LanguageId};

    #[test]
    fn test_generate_all_attempts_both_outputs() {
        let fs = MockFileSystem::new();
        let catalog = Catalog::builtin().unwrap();
        let descriptor = ProjectDescriptor::new(LanguageId::Php, "php:8.3-fpm")
            .with_framework(Some(FrameworkId::Symfony));

        let report = generate_all(&descriptor, &catalog, &fs, Path::new("/mock"));

        assert!(!report.is_success());
        assert!(matches!(
            report.dockerfile,
            Err(GenerateError::UnsupportedFramework { .. })
        ));
        assert!(report.topology.is_ok());
        assert!(!fs.exists(Path::new("/mock/Dockerfile")));
        assert!(fs.exists(Path::new("/mock/docker-compose.yml")));
        assert_eq!(report.errors().len(), 1);
    }

    #[test]
    fn test_error_messages_name_language_and_framework() {
        let err = GenerateError::UnsupportedFramework {
            language: "PHP".to_string(),
            framework: "symfony".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported PHP framework for Dockerfile generation: symfony"
        );
    }
}
