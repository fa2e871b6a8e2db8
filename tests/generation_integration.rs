//! Integration tests for Dockerfile and docker-compose generation
//!
//! Projects are detected from real directories, then both generators write into a
//! temporary output directory.

use dockerizer::detection::{Overrides, ProjectAnalyzer, ProjectDescriptor};
use dockerizer::generate::{self, build_recipe, build_topology, clean, GenerateError};
use dockerizer::{Catalog, DatabaseId, FrameworkId, LanguageId, RealFileSystem};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn detect(dir: &Path) -> ProjectDescriptor {
    let catalog = catalog();
    ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(dir)
        .unwrap()
        .descriptor
}

fn laravel_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("composer.json"),
        r#"{"require": {"php": "^8.2", "laravel/framework": "^10.0"}}"#,
    )
    .unwrap();
    temp
}

#[test]
fn test_go_project_without_framework() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("go.mod"), "module x\n\ngo 1.21\n").unwrap();

    let descriptor = detect(temp.path());
    let report = generate::generate_all(&descriptor, &catalog(), &RealFileSystem, temp.path());
    assert!(report.is_success());

    let dockerfile = fs::read_to_string(temp.path().join("Dockerfile")).unwrap();
    assert!(dockerfile.starts_with("# Build stage\nFROM golang:1.21-alpine AS builder\n"));
    assert!(dockerfile.contains("\nFROM alpine:3.19\n"));
    assert_eq!(dockerfile.matches("FROM ").count(), 2);
    assert!(!dockerfile.contains("EXPOSE"));
    assert!(dockerfile.ends_with("CMD [\"./main\"]\n"));

    let compose = fs::read_to_string(temp.path().join("docker-compose.yml")).unwrap();
    assert!(compose.contains("app-network"));
    assert!(!compose.contains("ports:"));
}

#[test]
fn test_laravel_project_topology() {
    let temp = laravel_project();
    let out = TempDir::new().unwrap();

    let descriptor = detect(temp.path());
    assert_eq!(descriptor.framework, Some(FrameworkId::Laravel));
    assert_eq!(descriptor.ports(), &[8000]);

    let topology = build_topology(&descriptor, &catalog());
    let app = topology.service("app").unwrap();
    let mysql = topology.service("mysql").unwrap();
    assert!(mysql.depends_on.is_empty());
    assert!(app.depends_on.contains(&"mysql".to_string()));
    assert!(app.depends_on.contains(&"redis".to_string()));
    assert!(topology.service("nginx").is_some());

    let report = generate::generate_all(&descriptor, &catalog(), &RealFileSystem, out.path());
    assert!(report.is_success());

    let proxy = out.path().join("docker/nginx/conf.d/default.conf");
    assert_eq!(
        report.topology.unwrap().proxy_config_path.as_deref(),
        Some(proxy.as_path())
    );
    let config = fs::read_to_string(&proxy).unwrap();
    assert!(config.contains("fastcgi_pass app:9000;"));

    let dockerfile = fs::read_to_string(out.path().join("Dockerfile")).unwrap();
    assert!(dockerfile.contains("FROM composer:2 AS builder"));
    assert!(dockerfile.contains("FROM php:8.2-fpm"));
    assert!(dockerfile.contains("EXPOSE 9000"));
}

#[test]
fn test_compose_document_shape() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("requirements.txt"), "Django>=4.2\n").unwrap();

    let descriptor = detect(temp.path());
    let output = generate::generate_topology(&descriptor, &catalog(), &RealFileSystem, temp.path())
        .unwrap();
    let yaml = fs::read_to_string(output.compose_path).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(doc["version"], "3.8");
    assert_eq!(doc["services"]["app"]["build"]["dockerfile"], "Dockerfile");
    assert_eq!(doc["services"]["app"]["ports"][0], "8000:8000");
    assert_eq!(doc["services"]["app"]["env_file"][0], ".env");
    assert_eq!(doc["services"]["app"]["restart"], "unless-stopped");
    assert_eq!(doc["services"]["postgres"]["healthcheck"]["retries"], 5);
    assert_eq!(doc["services"]["postgres"]["healthcheck"]["interval"], "10s");
    assert_eq!(doc["services"]["redis"]["healthcheck"]["test"][1], "redis-cli");
    assert_eq!(doc["volumes"]["postgres-data"]["driver"], "local");
    assert_eq!(doc["volumes"]["redis-data"]["driver"], "local");
    assert_eq!(doc["networks"]["app-network"]["driver"], "bridge");
}

#[test]
fn test_unrequested_database_comes_from_framework_pairing() {
    let descriptor = ProjectDescriptor::new(LanguageId::Python, "python:3.9-slim")
        .with_framework(Some(FrameworkId::Flask))
        .with_ports(&[5000])
        .unwrap();
    assert!(descriptor.database.is_none());

    let topology = build_topology(&descriptor, &catalog());
    let db = topology.service("postgres").unwrap();

    assert!(db.healthcheck.is_some());
    assert!(topology.document.volumes.contains_key("postgres-data"));
}

#[test]
fn test_database_overrides_reach_topology() {
    let temp = laravel_project();
    let catalog = catalog();

    let mut descriptor = detect(temp.path());
    let overrides = Overrides {
        database: Some(DatabaseId::MySql),
        database_port: Some(13306),
        ..Default::default()
    };
    descriptor.apply_overrides(&overrides, &catalog).unwrap();

    let topology = build_topology(&descriptor, &catalog);
    assert_eq!(topology.service("mysql").unwrap().ports, vec!["13306:3306"]);
}

#[test]
fn test_recipe_generation_is_deterministic() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("package.json"),
        r#"{"dependencies": {"@nestjs/core": "^10.0.0"}, "engines": {"node": "20.11.x"}}"#,
    )
    .unwrap();

    let descriptor = detect(temp.path());
    let first = build_recipe(&descriptor, &catalog()).unwrap().to_string();
    let second = build_recipe(&descriptor.clone(), &catalog()).unwrap().to_string();

    assert_eq!(first, second);
    assert!(first.contains("FROM node:20.11-alpine AS builder"));
}

#[test]
fn test_edited_catalog_start_command_reaches_dockerfile() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("package.json"),
        r#"{"dependencies": {"express": "4"}}"#,
    )
    .unwrap();

    let mut catalog = catalog();
    for language in &mut catalog.languages {
        for framework in &mut language.frameworks {
            if framework.name == FrameworkId::Express {
                framework.start = Some("node server.js".to_string());
            }
        }
    }

    let descriptor = ProjectAnalyzer::new(&catalog, &RealFileSystem)
        .analyze(temp.path())
        .unwrap()
        .descriptor;
    let rendered = build_recipe(&descriptor, &catalog).unwrap().to_string();

    assert!(rendered.ends_with("CMD [\"node\", \"server.js\"]\n"));
}

#[test]
fn test_failed_recipe_still_writes_topology() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("composer.json"),
        r#"{"require": {"symfony/framework-bundle": "^6.3"}}"#,
    )
    .unwrap();

    let descriptor = detect(temp.path());
    let report = generate::generate_all(&descriptor, &catalog(), &RealFileSystem, temp.path());

    assert!(matches!(
        report.dockerfile,
        Err(GenerateError::UnsupportedFramework { .. })
    ));
    assert!(report.topology.is_ok());
    assert!(!temp.path().join("Dockerfile").exists());
    assert!(temp.path().join("docker-compose.yml").exists());
}

#[test]
fn test_clean_after_generation() {
    let temp = laravel_project();

    let descriptor = detect(temp.path());
    let report = generate::generate_all(&descriptor, &catalog(), &RealFileSystem, temp.path());
    assert!(report.is_success());

    let removed = clean(&RealFileSystem, temp.path()).unwrap();
    assert!(!removed.is_empty());

    assert!(!temp.path().join("Dockerfile").exists());
    assert!(!temp.path().join("docker-compose.yml").exists());
    assert!(!temp.path().join("docker").exists());
    assert!(temp.path().join("composer.json").exists());
}

#[test]
fn test_clean_without_generated_files_is_noop() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("go.mod"), "module x\n").unwrap();

    let report = clean(&RealFileSystem, temp.path()).unwrap();

    assert!(report.is_empty());
    assert!(temp.path().join("go.mod").exists());
}
