use crate::detection::{EnvVar, Overrides};
use crate::stack::{DatabaseId, FrameworkId, LanguageId};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Project detection and container configuration generator
#[derive(Parser, Debug)]
#[command(
    name = "dockerizer",
    about = "Detects a project's stack and generates a Dockerfile and docker-compose.yml",
    version,
    author,
    long_about = "dockerizer inspects a project directory, identifies its language, framework \
                  and runtime version from dependency manifests, and writes a multi-stage \
                  Dockerfile plus a docker-compose.yml with the services the framework \
                  usually needs."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory with languages.yaml and/or databases.yaml replacing the built-in catalogs"
    )]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect the language, framework and runtime version of a project",
        long_about = "Reads the project's dependency manifest and reports what was detected \
                      without writing anything.\n\n\
                      Examples:\n  \
                      dockerizer analyze\n  \
                      dockerizer analyze /path/to/project\n  \
                      dockerizer analyze --format json"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Generate a Dockerfile and docker-compose.yml",
        long_about = "Detects the project stack, applies any overrides, then writes \
                      Dockerfile and docker-compose.yml (plus an nginx configuration for \
                      Laravel) to the output directory.\n\n\
                      Examples:\n  \
                      dockerizer generate\n  \
                      dockerizer generate ./api --output ./deploy\n  \
                      dockerizer generate --framework flask --port 5000 --database postgres"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Remove generated files",
        long_about = "Removes Dockerfile, docker-compose.yml and the generated nginx \
                      configuration from the output directory.\n\n\
                      Examples:\n  \
                      dockerizer clean\n  \
                      dockerizer clean --output ./deploy"
    )]
    Clean(CleanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write generated files here instead of the project directory"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Summary format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Replacements for detected values
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    #[arg(long, value_parser = parse_language, help = "Language to use instead of the detected one")]
    pub language: Option<LanguageId>,

    #[arg(long, value_parser = parse_framework, help = "Framework to use instead of the detected one")]
    pub framework: Option<FrameworkId>,

    #[arg(short = 'p', long, help = "Primary application port")]
    pub port: Option<u16>,

    #[arg(long, value_parser = parse_database, help = "Database service to add (postgres, mysql, mongodb)")]
    pub database: Option<DatabaseId>,

    #[arg(long, value_name = "PORT", help = "Host port for the database service")]
    pub database_port: Option<u16>,

    #[arg(
        short = 'e',
        long = "env",
        value_name = "NAME=VALUE",
        value_parser = parse_env_var,
        help = "Environment variable for the app (repeatable)"
    )]
    pub environment: Vec<EnvVar>,
}

impl From<&OverrideArgs> for Overrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            language: args.language.clone(),
            framework: args.framework.clone(),
            port: args.port,
            database: args.database.clone(),
            database_port: args.database_port,
            environment: args.environment.clone(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory to clean (defaults to the current directory)"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn non_empty(s: &str) -> Result<&str, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(trimmed)
    }
}

// Unknown names are kept as custom ids; the catalog decides whether they exist.
fn parse_language(s: &str) -> Result<LanguageId, String> {
    non_empty(s).map(LanguageId::parse)
}

fn parse_framework(s: &str) -> Result<FrameworkId, String> {
    non_empty(s).map(FrameworkId::parse)
}

fn parse_database(s: &str) -> Result<DatabaseId, String> {
    non_empty(s).map(DatabaseId::parse)
}

fn parse_env_var(s: &str) -> Result<EnvVar, String> {
    s.parse::<EnvVar>().map_err(|e| e.to_string())
}
