//! Integration tests for the project analyzer
//!
//! Each test builds a real project directory on disk and runs detection through
//! `RealFileSystem`, covering every language and framework in the built-in catalog.

use dockerizer::detection::{AnalysisError, ProjectAnalyzer};
use dockerizer::manifest::ManifestError;
use dockerizer::version::VersionSource;
use dockerizer::{Catalog, FrameworkId, LanguageId, RealFileSystem};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use yare::parameterized;

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Manifest file name and content declaring exactly `markers` as dependencies
fn manifest_with(language: &LanguageId, markers: &[String]) -> (&'static str, String) {
    match language {
        LanguageId::NodeJs => {
            let deps: Vec<String> = markers.iter().map(|m| format!("\"{}\": \"*\"", m)).collect();
            (
                "package.json",
                format!("{{\"name\": \"app\", \"dependencies\": {{{}}}}}", deps.join(", ")),
            )
        }
        LanguageId::Python => ("requirements.txt", format!("{}\n", markers.join("\n"))),
        LanguageId::Go => {
            let requires: Vec<String> = markers.iter().map(|m| format!("\t{} v1.0.0", m)).collect();
            (
                "go.mod",
                format!("module example.com/app\n\nrequire (\n{}\n)\n", requires.join("\n")),
            )
        }
        LanguageId::Java => {
            let deps: Vec<String> = markers
                .iter()
                .map(|m| {
                    let (group, artifact) = m.split_once(':').unwrap();
                    format!(
                        "<dependency><groupId>{}</groupId><artifactId>{}</artifactId></dependency>",
                        group, artifact
                    )
                })
                .collect();
            (
                "pom.xml",
                format!(
                    "<project><modelVersion>4.0.0</modelVersion><dependencies>{}</dependencies></project>",
                    deps.join("")
                ),
            )
        }
        LanguageId::Php => {
            let deps: Vec<String> = markers.iter().map(|m| format!("\"{}\": \"*\"", m)).collect();
            (
                "composer.json",
                format!("{{\"require\": {{{}}}}}", deps.join(", ")),
            )
        }
        LanguageId::Ruby => {
            let gems: Vec<String> = markers.iter().map(|m| format!("gem '{}'", m)).collect();
            (
                "Gemfile",
                format!("source 'https://rubygems.org'\n\n{}\n", gems.join("\n")),
            )
        }
        LanguageId::Custom(name) => panic!("no manifest fixture for {}", name),
    }
}

#[parameterized(
    node = { "package.json", LanguageId::NodeJs, "node:18-alpine" },
    python = { "requirements.txt", LanguageId::Python, "python:3.9-slim" },
    go = { "go.mod", LanguageId::Go, "golang:1.21-alpine" },
    java = { "pom.xml", LanguageId::Java, "openjdk:17-slim" },
    php = { "composer.json", LanguageId::Php, "php:8.3-fpm" },
    ruby = { "Gemfile", LanguageId::Ruby, "ruby:3.2-alpine" },
)]
fn test_indicator_only_uses_default_image(indicator: &str, language: LanguageId, image: &str) {
    let temp = TempDir::new().unwrap();
    write(temp.path(), indicator, "");

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();

    assert_eq!(analysis.descriptor.language, Some(language));
    assert_eq!(analysis.descriptor.base_image, image);
    assert_eq!(analysis.descriptor.framework, None);
    assert_eq!(analysis.indicator, Some(temp.path().join(indicator)));
}

#[test]
fn test_every_catalog_framework_is_detected_from_its_markers() {
    let catalog = catalog();

    for language in &catalog.languages {
        for framework in &language.frameworks {
            let temp = TempDir::new().unwrap();
            let (file, content) = manifest_with(&language.name, &framework.markers);
            write(temp.path(), file, &content);

            let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
                .analyze(temp.path())
                .unwrap();
            let descriptor = &analysis.descriptor;

            assert_eq!(
                descriptor.language.as_ref(),
                Some(&language.name),
                "language for {}",
                framework.name
            );
            assert_eq!(
                descriptor.framework.as_ref(),
                Some(&framework.name),
                "framework from {}",
                content
            );
            if let Some(port) = framework.default_port() {
                assert_eq!(descriptor.primary_port(), Some(port), "port for {}", framework.name);
            }
            for var in &framework.environment {
                assert!(descriptor.environment.contains(var));
            }
        }
    }
}

#[test]
fn test_go_module_without_framework() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "go.mod", "module x\n\ngo 1.21\n");

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();
    let descriptor = &analysis.descriptor;

    assert_eq!(descriptor.language, Some(LanguageId::Go));
    assert_eq!(descriptor.framework, None);
    assert_eq!(descriptor.base_image, "golang:1.21-alpine");
    assert!(descriptor.ports().is_empty());
    assert_eq!(
        analysis.version_source,
        Some(VersionSource::Manifest("go directive".to_string()))
    );
}

#[test]
fn test_laravel_project() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "composer.json",
        r#"{
    "name": "laravel/laravel",
    "require": {
        "php": "^8.1",
        "guzzlehttp/guzzle": "^7.2",
        "laravel/framework": "^10.10"
    },
    "require-dev": {
        "phpunit/phpunit": "^10.1"
    }
}"#,
    );

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();
    let descriptor = &analysis.descriptor;

    assert_eq!(descriptor.language, Some(LanguageId::Php));
    assert_eq!(descriptor.framework, Some(FrameworkId::Laravel));
    assert_eq!(descriptor.ports(), &[8000]);
    assert_eq!(descriptor.base_image, "php:8.1-fpm");
    assert!(descriptor.dependencies.contains("phpunit/phpunit"));
    assert!(!descriptor.dependencies.contains("php"));
}

#[test]
fn test_version_from_auxiliary_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "requirements.txt", "fastapi==0.104.0\nuvicorn[standard]\n");
    write(temp.path(), "runtime.txt", "python-3.11.6\n");

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();

    assert_eq!(analysis.descriptor.framework, Some(FrameworkId::FastApi));
    assert_eq!(analysis.descriptor.base_image, "python:3.11-slim");
    assert_eq!(
        analysis.version_source,
        Some(VersionSource::File(temp.path().join("runtime.txt")))
    );
}

#[test]
fn test_first_matching_framework_wins() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "package.json",
        r#"{"dependencies": {"react": "^18.2.0", "next": "14.0.0"}}"#,
    );

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();

    assert_eq!(analysis.descriptor.framework, Some(FrameworkId::NextJs));
}

#[test]
fn test_unreadable_manifest_keeps_default_image() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "package.json", "{ \"dependencies\": ");

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();

    assert_eq!(analysis.descriptor.language, Some(LanguageId::NodeJs));
    assert_eq!(analysis.descriptor.base_image, "node:18-alpine");
    assert!(matches!(
        analysis.manifest_error,
        Some(ManifestError::Unreadable { .. })
    ));
}

#[test]
fn test_empty_directory_is_not_detected() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "README.md", "# Nothing to see\n");

    let catalog = catalog();
    let analysis = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap();

    assert!(!analysis.is_detected());
    assert!(analysis.descriptor.base_image.is_empty());
    assert!(analysis.manifest_error.is_none());
}

#[test]
fn test_analyze_nonexistent_path() {
    let catalog = catalog();
    let result = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(Path::new("/nonexistent/path/that/does/not/exist"));

    assert!(matches!(result, Err(AnalysisError::PathNotFound(_))));
}

#[test]
fn test_analyze_file_instead_of_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "go.mod", "module x\n");

    let catalog = catalog();
    let result =
        ProjectAnalyzer::new(&catalog, &RealFileSystem).analyze(&temp.path().join("go.mod"));

    assert!(matches!(result, Err(AnalysisError::NotADirectory(_))));
}
