//! The normalized project descriptor shared by detection and both generators.

use crate::catalog::Catalog;
use crate::stack::{DatabaseId, FrameworkId, LanguageId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    #[error("Invalid port {0}: ports must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Unknown language '{0}': it is not in the language catalog")]
    UnknownLanguage(String),

    #[error("Cannot set framework '{0}' before a language is known")]
    FrameworkWithoutLanguage(String),

    #[error("Unknown database '{0}': it is not in the database catalog")]
    UnknownDatabase(String),

    #[error("Invalid environment declaration '{0}': expected NAME=value")]
    InvalidEnvVar(String),
}

/// One `NAME=value` environment declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl FromStr for EnvVar {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| OverrideError::InvalidEnvVar(s.to_string()))?;
        let name = name.trim();

        let valid_name = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err(OverrideError::InvalidEnvVar(s.to_string()));
        }

        Ok(Self::new(name, value))
    }
}

impl TryFrom<String> for EnvVar {
    type Error = OverrideError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EnvVar> for String {
    fn from(var: EnvVar) -> Self {
        var.to_string()
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

fn deserialize_ports<'de, D>(deserializer: D) -> Result<Vec<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let ports = Vec::<u16>::deserialize(deserializer)?;
    if ports.contains(&0) {
        return Err(serde::de::Error::custom(OverrideError::InvalidPort(0)));
    }
    Ok(ports)
}

/// Normalized summary of a detected project
///
/// Built once per invocation by [`crate::detection::ProjectAnalyzer`] or assembled by hand
/// through [`ProjectDescriptor::apply_overrides`]; generators accept either.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// `None` means the language was not detected
    pub language: Option<LanguageId>,
    /// `None` means no framework matched (generic behavior)
    pub framework: Option<FrameworkId>,
    pub base_image: String,
    /// Runtime version the base image was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_ports")]
    ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseId>,
    /// Host port for the database service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_port: Option<u16>,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
}

impl ProjectDescriptor {
    /// Descriptor for a known language with no framework, ports or environment yet
    pub fn new(language: LanguageId, base_image: impl Into<String>) -> Self {
        Self {
            language: Some(language),
            base_image: base_image.into(),
            ..Self::default()
        }
    }

    pub fn with_framework(mut self, framework: Option<FrameworkId>) -> Self {
        self.framework = framework;
        self
    }

    /// Appends each port in order; rejects port 0
    pub fn with_ports(mut self, ports: &[u16]) -> Result<Self, OverrideError> {
        for port in ports {
            self.add_port(*port)?;
        }
        Ok(self)
    }

    pub fn is_detected(&self) -> bool {
        self.language.is_some()
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn primary_port(&self) -> Option<u16> {
        self.ports.first().copied()
    }

    /// Replaces `ports[0]`, or adds it when there are no ports yet
    pub fn set_primary_port(&mut self, port: u16) -> Result<(), OverrideError> {
        if port == 0 {
            return Err(OverrideError::InvalidPort(port));
        }
        match self.ports.first_mut() {
            Some(first) => *first = port,
            None => self.ports.push(port),
        }
        Ok(())
    }

    pub fn add_port(&mut self, port: u16) -> Result<(), OverrideError> {
        if port == 0 {
            return Err(OverrideError::InvalidPort(port));
        }
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
        Ok(())
    }

    pub fn clear_ports(&mut self) {
        self.ports.clear();
    }

    /// Sets a variable, replacing an existing declaration with the same name in place
    pub fn set_env(&mut self, var: EnvVar) {
        match self.environment.iter_mut().find(|v| v.name == var.name) {
            Some(existing) => *existing = var,
            None => self.environment.push(var),
        }
    }

    /// Applies user overrides on top of a detected (or empty) descriptor.
    ///
    /// Returns warnings for choices that are accepted but look inconsistent with the catalog.
    pub fn apply_overrides(
        &mut self,
        overrides: &Overrides,
        catalog: &Catalog,
    ) -> Result<Vec<String>, OverrideError> {
        let mut warnings = Vec::new();

        if let Some(language) = &overrides.language {
            if self.language.as_ref() != Some(language) {
                let entry = catalog
                    .language(language)
                    .ok_or_else(|| OverrideError::UnknownLanguage(language.name()))?;

                let database = self.database.take();
                let database_port = self.database_port;
                *self = Self {
                    language: Some(language.clone()),
                    base_image: entry.default_image(),
                    version: Some(entry.default_version.clone()),
                    database,
                    database_port,
                    ..Self::default()
                };
            }
        }

        if let Some(framework) = &overrides.framework {
            let language = self
                .language
                .clone()
                .ok_or_else(|| OverrideError::FrameworkWithoutLanguage(framework.key().to_string()))?;

            if self.framework.as_ref() != Some(framework) {
                self.framework = Some(framework.clone());
                self.clear_ports();
                self.environment.clear();

                match catalog
                    .language(&language)
                    .and_then(|entry| entry.framework(framework))
                {
                    Some(entry) => {
                        if let Some(port) = entry.default_port() {
                            self.ports.push(port);
                        }
                        self.environment = entry.environment.clone();
                    }
                    None => warnings.push(format!(
                        "Framework '{}' is not in the {} catalog; generic settings will be used",
                        framework.key(),
                        language
                    )),
                }
            }
        }

        if let Some(port) = overrides.port {
            self.set_primary_port(port)?;
        }

        if let Some(database) = &overrides.database {
            if catalog.database(database).is_none() {
                return Err(OverrideError::UnknownDatabase(database.key().to_string()));
            }

            let framework_entry = self.language.as_ref().zip(self.framework.as_ref()).and_then(
                |(language, framework)| {
                    catalog
                        .language(language)
                        .and_then(|entry| entry.framework(framework))
                },
            );
            if let Some(entry) = framework_entry {
                if !entry.allows_database(database) {
                    warnings.push(format!(
                        "Database '{}' is not a usual choice for {}",
                        database.key(),
                        entry.name
                    ));
                }
            }
            self.database = Some(database.clone());
        }

        if let Some(port) = overrides.database_port {
            if port == 0 {
                return Err(OverrideError::InvalidPort(port));
            }
            self.database_port = Some(port);
        }

        for var in &overrides.environment {
            self.set_env(var.clone());
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        Ok(warnings)
    }
}

/// User-supplied replacements for auto-detected fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub language: Option<LanguageId>,
    pub framework: Option<FrameworkId>,
    pub port: Option<u16>,
    pub database: Option<DatabaseId>,
    pub database_port: Option<u16>,
    pub environment: Vec<EnvVar>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
