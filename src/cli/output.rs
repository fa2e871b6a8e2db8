//! Output formatting for analysis, generation and clean results
//!
//! JSON and YAML are meant for scripts and go to stdout unchanged; the human format uses
//! the same tree layout for every command.
//!
//! # Example
//!
//! ```ignore
//! use dockerizer::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format_analysis(&analysis)?);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::detection::{Analysis, ProjectDescriptor};
use crate::generate::CleanReport;
use crate::version::VersionSource;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";
const BRANCH: &str = "\u{251C}\u{2500}";
const LAST_BRANCH: &str = "\u{2514}\u{2500}";
const CHECK: &str = "\u{2713}";
const WARNING: &str = "\u{26A0}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// What `generate` wrote, plus everything that went wrong
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationSummary {
    pub descriptor: ProjectDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl GenerationSummary {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(analysis)
                .context("Failed to serialize analysis to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(analysis).context("Failed to serialize analysis to YAML")
            }
            OutputFormat::Human => Ok(self.format_analysis_human(analysis)),
        }
    }

    pub fn format_generation(&self, summary: &GenerationSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize generation summary to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(summary)
                .context("Failed to serialize generation summary to YAML"),
            OutputFormat::Human => Ok(self.format_generation_human(summary)),
        }
    }

    pub fn format_clean(&self, report: &CleanReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize clean report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize clean report to YAML")
            }
            OutputFormat::Human => Ok(self.format_clean_human(report)),
        }
    }

    fn format_analysis_human(&self, analysis: &Analysis) -> String {
        let mut output = String::new();

        if analysis.is_detected() {
            output.push_str(&format!("{} Project Analysis\n", CHECK));
        } else {
            output.push_str(&format!("{} Project Analysis (Nothing Detected)\n", WARNING));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        push_descriptor(&mut output, &analysis.descriptor);

        if let Some(source) = &analysis.version_source {
            output.push_str(&format!("\nVersion Source: {}\n", describe_source(source)));
        }
        if let Some(indicator) = &analysis.indicator {
            output.push_str(&format!("Indicator:      {}\n", indicator.display()));
        }

        if !analysis.descriptor.dependencies.is_empty() {
            output.push_str(&format!(
                "\nDependencies ({}):\n",
                analysis.descriptor.dependencies.len()
            ));
            push_list(&mut output, analysis.descriptor.dependencies.iter());
        }

        if let Some(error) = &analysis.manifest_error {
            output.push_str(&format!("\n{} {}\n", WARNING, error));
        }
        if !analysis.is_detected() {
            output.push_str("\nNo supported language found; use `generate --language` to set one.\n");
        }

        output
    }

    fn format_generation_human(&self, summary: &GenerationSummary) -> String {
        let mut output = String::new();

        if summary.is_success() {
            output.push_str(&format!("{} Container Configuration Generated\n", CHECK));
        } else {
            output.push_str(&format!(
                "{} Container Configuration Generated With Errors\n",
                WARNING
            ));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        push_descriptor(&mut output, &summary.descriptor);

        let written: Vec<String> = [&summary.dockerfile, &summary.compose, &summary.proxy_config]
            .into_iter()
            .flatten()
            .map(|p| p.display().to_string())
            .collect();
        if !written.is_empty() {
            output.push_str("\nWritten:\n");
            push_list(&mut output, written.iter());
        }

        if !summary.warnings.is_empty() {
            output.push_str(&format!("\n{} Warnings:\n", WARNING));
            for warning in &summary.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        if !summary.errors.is_empty() {
            output.push_str("\n\u{2717} Errors:\n");
            for error in &summary.errors {
                output.push_str(&format!("  - {}\n", error));
            }
        }

        output
    }

    fn format_clean_human(&self, report: &CleanReport) -> String {
        if report.is_empty() {
            return "Nothing to clean\n".to_string();
        }

        let mut output = format!("{} Removed {} path(s)\n", CHECK, report.removed.len());
        let paths: Vec<String> = report
            .removed
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        push_list(&mut output, paths.iter());
        output
    }
}

fn push_descriptor(output: &mut String, descriptor: &ProjectDescriptor) {
    let language = descriptor
        .language
        .as_ref()
        .map(|l| l.name())
        .unwrap_or_else(|| "(not detected)".to_string());
    let framework = descriptor
        .framework
        .as_ref()
        .map(|f| f.name())
        .unwrap_or_else(|| "(none)".to_string());
    let ports = if descriptor.ports().is_empty() {
        "(none)".to_string()
    } else {
        descriptor
            .ports()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    output.push_str(&format!("Language:   {}\n", language));
    output.push_str(&format!("Framework:  {}\n\n", framework));

    output.push_str("Container:\n");
    let image = if descriptor.base_image.is_empty() {
        "(none)"
    } else {
        descriptor.base_image.as_str()
    };
    output.push_str(&format!("{} Base Image:  {}\n", BRANCH, image));
    if let Some(version) = &descriptor.version {
        output.push_str(&format!("{} Version:     {}\n", BRANCH, version));
    }
    if let Some(database) = &descriptor.database {
        output.push_str(&format!("{} Database:    {}\n", BRANCH, database.name()));
    }
    if !descriptor.environment.is_empty() {
        let env: Vec<String> = descriptor.environment.iter().map(|e| e.to_string()).collect();
        output.push_str(&format!("{} Environment: {}\n", BRANCH, env.join(" ")));
    }
    output.push_str(&format!("{} Ports:       {}\n", LAST_BRANCH, ports));
}

fn push_list<'a>(output: &mut String, items: impl ExactSizeIterator<Item = &'a String>) {
    let len = items.len();
    for (i, item) in items.enumerate() {
        let connector = if i + 1 == len { LAST_BRANCH } else { BRANCH };
        output.push_str(&format!("{} {}\n", connector, item));
    }
}

fn describe_source(source: &VersionSource) -> String {
    match source {
        VersionSource::Manifest(hint) => format!("manifest ({})", hint),
        VersionSource::File(path) => format!("file ({})", path.display()),
        VersionSource::Default => "catalog default".to_string(),
    }
}
