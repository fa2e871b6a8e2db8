//! Dockerfile recipe model and rendering

use super::output::{self, DOCKERFILE};
use super::shapes;
use super::GenerateError;
use crate::catalog::Catalog;
use crate::detection::{EnvVar, ProjectDescriptor};
use crate::fs::FileSystem;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Alias of the first stage, referenced by `COPY --from`
pub const BUILDER: &str = "builder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Workdir(String),
    Copy {
        from: Option<String>,
        sources: Vec<String>,
        dest: String,
    },
    /// Rendered as one `RUN` with `\` continuations between the parts
    Run(Vec<String>),
    Env(EnvVar),
    Expose(u16),
    Cmd(Vec<String>),
}

impl Instruction {
    pub fn workdir(dir: &str) -> Self {
        Self::Workdir(dir.to_string())
    }

    pub fn run(command: &str) -> Self {
        Self::Run(vec![command.to_string()])
    }

    pub fn run_lines(lines: &[&str]) -> Self {
        Self::Run(lines.iter().map(|l| l.to_string()).collect())
    }

    pub fn copy(sources: &[&str], dest: &str) -> Self {
        Self::Copy {
            from: None,
            sources: sources.iter().map(|s| s.to_string()).collect(),
            dest: dest.to_string(),
        }
    }

    pub fn copy_from_builder(source: &str, dest: &str) -> Self {
        Self::Copy {
            from: Some(BUILDER.to_string()),
            sources: vec![source.to_string()],
            dest: dest.to_string(),
        }
    }

    pub fn env(name: &str, value: &str) -> Self {
        Self::Env(EnvVar::new(name, value))
    }

    pub fn cmd<S: AsRef<str>>(args: &[S]) -> Self {
        Self::Cmd(args.iter().map(|a| a.as_ref().to_string()).collect())
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workdir(dir) => write!(f, "WORKDIR {}", dir),
            Self::Copy {
                from,
                sources,
                dest,
            } => {
                write!(f, "COPY ")?;
                if let Some(stage) = from {
                    write!(f, "--from={} ", stage)?;
                }
                write!(f, "{} {}", sources.join(" "), dest)
            }
            Self::Run(lines) => write!(f, "RUN {}", lines.join(" \\\n    ")),
            Self::Env(var) => {
                if var.value.is_empty() || var.value.contains(char::is_whitespace) {
                    write!(f, "ENV {}={}", var.name, quote(&var.value))
                } else {
                    write!(f, "ENV {}={}", var.name, var.value)
                }
            }
            Self::Expose(port) => write!(f, "EXPOSE {}", port),
            Self::Cmd(args) => {
                let args: Vec<String> = args.iter().map(|a| quote(a)).collect();
                write!(f, "CMD [{}]", args.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub title: &'static str,
    pub image: String,
    pub alias: Option<&'static str>,
    pub instructions: Vec<Instruction>,
}

impl Stage {
    pub fn builder(image: &str) -> Self {
        Self {
            title: "Build stage",
            image: image.to_string(),
            alias: Some(BUILDER),
            instructions: Vec::new(),
        }
    }

    pub fn runtime(image: &str) -> Self {
        Self {
            title: "Production stage",
            image: image.to_string(),
            alias: None,
            instructions: Vec::new(),
        }
    }

    pub fn with(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn with_all(mut self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions.extend(instructions);
        self
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        match self.alias {
            Some(alias) => writeln!(f, "FROM {} AS {}", self.image, alias)?,
            None => writeln!(f, "FROM {}", self.image)?,
        }
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// A multi-stage Dockerfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub stages: Vec<Stage>,
}

impl Recipe {
    pub fn runtime_stage(&self) -> Option<&Stage> {
        self.stages.last()
    }

    pub fn exposed_ports(&self) -> Vec<u16> {
        self.runtime_stage()
            .map(|stage| {
                stage
                    .instructions
                    .iter()
                    .filter_map(|i| match i {
                        Instruction::Expose(port) => Some(*port),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn command(&self) -> Option<&[String]> {
        self.runtime_stage()?.instructions.iter().rev().find_map(|i| match i {
            Instruction::Cmd(args) => Some(args.as_slice()),
            _ => None,
        })
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

/// Selects the shape for the descriptor's language and framework and assembles the recipe.
///
/// Build and start commands come from the framework's catalog entry when it has them.
/// Pure: the same descriptor and catalog always yield the same recipe.
pub fn build_recipe(descriptor: &ProjectDescriptor, catalog: &Catalog) -> Result<Recipe, GenerateError> {
    let language = descriptor
        .language
        .as_ref()
        .ok_or(GenerateError::LanguageNotDetected)?;

    let shape = shapes::shape_for(language)
        .ok_or_else(|| GenerateError::UnsupportedLanguage(language.name()))?;

    if !shape.accepts(descriptor.framework.as_ref()) {
        return Err(GenerateError::UnsupportedFramework {
            language: language.name(),
            framework: descriptor
                .framework
                .as_ref()
                .map(|f| f.key().to_string())
                .unwrap_or_else(|| "none".to_string()),
        });
    }

    if descriptor.base_image.trim().is_empty() {
        return Err(GenerateError::MissingBaseImage(language.name()));
    }

    let framework_entry = descriptor.framework.as_ref().and_then(|framework| {
        catalog
            .language(language)
            .and_then(|entry| entry.framework(framework))
    });
    let port = descriptor.primary_port();

    let build = framework_entry
        .and_then(|entry| entry.build_command(port))
        .or_else(|| shape.build_command(descriptor));
    let start = framework_entry
        .and_then(|entry| entry.start_command(port))
        .unwrap_or_else(|| shape.command(descriptor));

    let builder = shape
        .builder(descriptor)
        .with_all(build.map(|step| Instruction::Run(vec![step])));
    let runtime = shape
        .runtime(descriptor)
        .with_all(descriptor.environment.iter().cloned().map(Instruction::Env))
        .with_all(shape.exposed_ports(descriptor).into_iter().map(Instruction::Expose))
        .with(Instruction::Cmd(start));

    debug!(
        "Assembled {} recipe ({} framework)",
        language,
        descriptor
            .framework
            .as_ref()
            .map(|f| f.key())
            .unwrap_or("generic")
    );

    Ok(Recipe {
        stages: vec![builder, runtime],
    })
}

/// Renders the recipe to `<output_dir>/Dockerfile`
pub fn generate_recipe(
    descriptor: &ProjectDescriptor,
    catalog: &Catalog,
    fs: &dyn FileSystem,
    output_dir: &Path,
) -> Result<PathBuf, GenerateError> {
    let recipe = build_recipe(descriptor, catalog)?;
    let path = output_dir.join(DOCKERFILE);

    output::ensure_dir(fs, output_dir)?;
    output::write_verified(fs, &path, &recipe.to_string())?;

    info!("Generated {}", path.display());
    Ok(path)
}
