//! Command handlers; each returns the process exit code

use super::commands::{AnalyzeArgs, CleanArgs, GenerateArgs};
use super::output::{GenerationSummary, OutputFormat, OutputFormatter};
use crate::catalog::Catalog;
use crate::config::DockerizerConfig;
use crate::detection::{Analysis, Overrides, ProjectAnalyzer};
use crate::fs::{FileSystem, RealFileSystem};
use crate::generate::{self, GenerateError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

fn project_path(path: &Option<PathBuf>) -> PathBuf {
    path.clone().unwrap_or_else(|| PathBuf::from("."))
}

fn load_catalog(fs: &dyn FileSystem, config: &DockerizerConfig) -> Result<Catalog> {
    Catalog::load(fs, config.catalog_dir.as_deref()).context("Failed to load catalog")
}

fn analyze_project(
    fs: &dyn FileSystem,
    catalog: &Catalog,
    path: &Path,
) -> Result<Analysis> {
    ProjectAnalyzer::new(catalog, fs)
        .analyze(path)
        .with_context(|| format!("Failed to analyze {}", path.display()))
}

fn print_output(formatted: Result<String>) -> i32 {
    match formatted {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn fail(e: anyhow::Error) -> i32 {
    error!("{:#}", e);
    eprintln!("Error: {:#}", e);
    EXIT_FAILURE
}

pub fn handle_analyze(args: &AnalyzeArgs, config: &DockerizerConfig) -> i32 {
    let fs = RealFileSystem;
    let path = project_path(&args.project_path);
    debug!("Analyzing {}", path.display());

    let analysis = match load_catalog(&fs, config).and_then(|c| analyze_project(&fs, &c, &path)) {
        Ok(analysis) => analysis,
        Err(e) => return fail(e),
    };

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let code = print_output(formatter.format_analysis(&analysis));

    match &analysis.manifest_error {
        Some(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
        None => code,
    }
}

/// Detection, overrides, then both generators; one failing generator does not stop the other
pub fn run_generate(
    fs: &dyn FileSystem,
    catalog: &Catalog,
    path: &Path,
    output_dir: &Path,
    overrides: &Overrides,
) -> Result<GenerationSummary> {
    let analysis = analyze_project(fs, catalog, path)?;
    let detected = analysis.descriptor.language.clone();

    let mut descriptor = analysis.descriptor;
    let mut warnings = descriptor
        .apply_overrides(overrides, catalog)
        .context("Invalid override")?;

    // A language override discards everything read from the broken manifest
    if let Some(e) = analysis.manifest_error {
        if descriptor.language == detected {
            return Err(
                anyhow::Error::new(e).context("Cannot generate from an unreadable manifest")
            );
        }
        warnings.push(format!("Ignored unreadable manifest: {}", e));
    }

    if !descriptor.is_detected() {
        return Err(GenerateError::LanguageNotDetected.into());
    }

    info!("Writing container configuration to {}", output_dir.display());
    let report = generate::generate_all(&descriptor, catalog, fs, output_dir);

    let errors = report.errors().iter().map(|e| e.to_string()).collect();
    let mut summary = GenerationSummary {
        dockerfile: report.dockerfile.ok(),
        errors,
        ..Default::default()
    };
    if let Ok(topology) = report.topology {
        summary.compose = Some(topology.compose_path);
        summary.proxy_config = topology.proxy_config_path;
        warnings.extend(topology.warnings);
    }
    summary.descriptor = descriptor;
    summary.warnings = warnings;

    Ok(summary)
}

pub fn handle_generate(args: &GenerateArgs, config: &DockerizerConfig) -> i32 {
    let fs = RealFileSystem;
    let path = project_path(&args.project_path);
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir_for(&path));
    let overrides = Overrides::from(&args.overrides);

    let summary = match load_catalog(&fs, config)
        .and_then(|catalog| run_generate(&fs, &catalog, &path, &output_dir, &overrides))
    {
        Ok(summary) => summary,
        Err(e) => return fail(e),
    };

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let code = print_output(formatter.format_generation(&summary));

    if summary.is_success() {
        code
    } else {
        for e in &summary.errors {
            eprintln!("Error: {}", e);
        }
        EXIT_FAILURE
    }
}

pub fn handle_clean(args: &CleanArgs, config: &DockerizerConfig) -> i32 {
    let fs = RealFileSystem;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir_for(Path::new(".")));

    match generate::clean(&fs, &output_dir) {
        Ok(report) => print_output(OutputFormatter::new(OutputFormat::Human).format_clean(&report)),
        Err(e) => fail(anyhow::Error::new(e)),
    }
}
