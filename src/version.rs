//! Runtime version resolution.
//!
//! A language's version is looked up in three places, first hit wins: the hints its
//! manifest carries, the auxiliary files its ecosystem uses to pin a runtime
//! (`.nvmrc`, `runtime.txt`, `build.gradle`, ...), and finally the catalog default.

use crate::catalog::LanguageCatalogEntry;
use crate::fs::FileSystem;
use crate::manifest::RawManifest;
use crate::stack::LanguageId;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

const RANGE_OPERATORS: &[&str] = &[">=", "^", "~", "<", ">", "="];

fn strip_operators(text: &str) -> &str {
    let mut rest = text.trim();
    loop {
        let before = rest;
        for op in RANGE_OPERATORS {
            rest = rest.strip_prefix(op).unwrap_or(rest).trim_start();
        }
        rest = rest.strip_prefix('v').unwrap_or(rest);
        if rest == before {
            return rest;
        }
    }
}

fn first_token(text: &str) -> &str {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '|')
        .find(|token| !token.is_empty())
        .unwrap_or("")
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

/// Normalizes a version constraint such as `>=18.2.0` or `~> 3.2` to `major.minor`.
///
/// Returns `None` when the text has no numeric `major.minor` prefix.
pub fn parse_version_constraint(text: &str) -> Option<String> {
    let token = first_token(strip_operators(text));
    let mut parts = token.split('.');
    let major = parts.next().filter(|p| is_numeric(p))?;
    let minor = parts.next().filter(|p| is_numeric(p))?;
    Some(format!("{}.{}", major, minor))
}

/// Normalizes a Java-style version to its major release: `17.0.2` to `17`, `1.8` to `8`.
pub fn parse_major_version(text: &str) -> Option<String> {
    let token = first_token(strip_operators(text)).replace('_', ".");
    let mut parts = token.split('.');
    let mut major = parts.next().filter(|p| is_numeric(p))?;
    if major == "1" {
        major = parts.next().filter(|p| is_numeric(p))?;
    }
    Some(major.trim_start_matches('0').to_string()).filter(|m| !m.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    MajorMinor,
    Major,
}

impl Precision {
    pub fn normalize(self, text: &str) -> Option<String> {
        match self {
            Self::MajorMinor => parse_version_constraint(text),
            Self::Major => parse_major_version(text),
        }
    }
}

/// A file that may pin the runtime version, with the extractor for its raw constraint
struct AuxiliarySource {
    file: &'static str,
    extract: fn(&str) -> Option<String>,
}

struct VersionRule {
    precision: Precision,
    sources: &'static [AuxiliarySource],
}

const NO_SOURCES: &[AuxiliarySource] = &[];

const NODE_SOURCES: &[AuxiliarySource] = &[
    AuxiliarySource {
        file: ".nvmrc",
        extract: first_line,
    },
    AuxiliarySource {
        file: ".node-version",
        extract: first_line,
    },
];

const PYTHON_SOURCES: &[AuxiliarySource] = &[
    AuxiliarySource {
        file: "pyproject.toml",
        extract: pyproject_python,
    },
    AuxiliarySource {
        file: "Pipfile",
        extract: pipfile_python,
    },
    AuxiliarySource {
        file: "runtime.txt",
        extract: runtime_txt_python,
    },
    AuxiliarySource {
        file: ".python-version",
        extract: first_line,
    },
];

const JAVA_SOURCES: &[AuxiliarySource] = &[
    AuxiliarySource {
        file: "build.gradle",
        extract: gradle_java,
    },
    AuxiliarySource {
        file: "build.gradle.kts",
        extract: gradle_java,
    },
];

const RUBY_SOURCES: &[AuxiliarySource] = &[AuxiliarySource {
    file: ".ruby-version",
    extract: ruby_version_file,
}];

fn rule_for(language: &LanguageId) -> VersionRule {
    let (precision, sources) = match language {
        LanguageId::NodeJs => (Precision::MajorMinor, NODE_SOURCES),
        LanguageId::Python => (Precision::MajorMinor, PYTHON_SOURCES),
        LanguageId::Java => (Precision::Major, JAVA_SOURCES),
        LanguageId::Ruby => (Precision::MajorMinor, RUBY_SOURCES),
        LanguageId::Go | LanguageId::Php | LanguageId::Custom(_) => {
            (Precision::MajorMinor, NO_SOURCES)
        }
    };
    VersionRule { precision, sources }
}

fn first_line(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

fn pyproject_python(content: &str) -> Option<String> {
    let doc: toml::Value = toml::from_str(content).ok()?;
    let requires = doc
        .get("project")
        .and_then(|p| p.get("requires-python"))
        .and_then(toml::Value::as_str);
    let poetry = || {
        doc.get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.get("python"))
            .and_then(toml::Value::as_str)
    };
    requires.or_else(poetry).map(str::to_string)
}

fn pipfile_python(content: &str) -> Option<String> {
    let doc: toml::Value = toml::from_str(content).ok()?;
    let requires = doc.get("requires")?;
    requires
        .get("python_version")
        .or_else(|| requires.get("python_full_version"))
        .and_then(toml::Value::as_str)
        .map(str::to_string)
}

fn runtime_txt_python(content: &str) -> Option<String> {
    let line = first_line(content)?;
    line.strip_prefix("python-").map(str::to_string)
}

fn ruby_version_file(content: &str) -> Option<String> {
    let line = first_line(content)?;
    Some(line.strip_prefix("ruby-").unwrap_or(&line).to_string())
}

fn gradle_java(content: &str) -> Option<String> {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            Regex::new(r"JavaLanguageVersion\.of\(\s*(\d+)\s*\)").expect("valid regex"),
            Regex::new(r#"sourceCompatibility\s*=\s*(?:JavaVersion\.VERSION_)?['"]?([0-9][0-9_.]*)"#)
                .expect("valid regex"),
        ]
    });
    patterns
        .iter()
        .find_map(|re| re.captures(content))
        .map(|caps| caps[1].to_string())
}

/// Where a resolved version came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "origin", rename_all = "snake_case")]
pub enum VersionSource {
    Manifest(String),
    File(PathBuf),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: String,
    pub source: VersionSource,
}

pub struct VersionResolver<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> VersionResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    pub fn resolve(
        &self,
        entry: &LanguageCatalogEntry,
        dir: &Path,
        manifest: Option<&RawManifest>,
    ) -> ResolvedVersion {
        let rule = rule_for(&entry.name);

        let from_manifest = manifest.into_iter().flat_map(|m| &m.version_hints).find_map(|hint| {
            rule.precision
                .normalize(&hint.constraint)
                .map(|version| (version, VersionSource::Manifest(hint.source.clone())))
        });
        if let Some((version, source)) = from_manifest {
            debug!("{} version {} from manifest {:?}", entry.name, version, source);
            return ResolvedVersion { version, source };
        }

        for aux in rule.sources {
            let path = dir.join(aux.file);
            if !self.fs.is_file(&path) {
                continue;
            }
            let content = match self.fs.read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!("Skipping unreadable {}: {:#}", path.display(), e);
                    continue;
                }
            };
            if let Some(version) = (aux.extract)(&content).and_then(|raw| rule.precision.normalize(&raw)) {
                debug!("{} version {} from {}", entry.name, version, path.display());
                return ResolvedVersion {
                    version,
                    source: VersionSource::File(path),
                };
            }
        }

        debug!(
            "No {} version found, using default {}",
            entry.name, entry.default_version
        );
        ResolvedVersion {
            version: entry.default_version.clone(),
            source: VersionSource::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::fs::MockFileSystem;
    use crate::manifest::VersionHint;
    use yare::parameterized;

    #[parameterized(
        gte = { ">=18.2.0", Some("18.2") },
        caret = { "^3.11", Some("3.11") },
        tilde = { "~1.21.0", Some("1.21") },
        pessimistic = { "~> 3.2.1", Some("3.2") },
        exact = { "==3.10.4", Some("3.10") },
        lte = { "<=8.1", Some("8.1") },
        v_prefix = { "v20.11.0", Some("20.11") },
        compound = { ">=3.8,<4.0", Some("3.8") },
        alternatives = { "^16.14 || ^18", Some("16.14") },
        padded = { "  8.2.0  ", Some("8.2") },
        major_only = { "18", None },
        wildcard = { "*", None },
        word = { "lts/hydrogen", None },
        empty = { "", None },
        star_minor = { "8.x", None },
    )]
    fn test_parse_version_constraint(input: &str, expected: Option<&str>) {
        assert_eq!(parse_version_constraint(input).as_deref(), expected);
    }

    #[test]
    fn test_parse_version_constraint_is_idempotent() {
        for input in [">=18.2.0", "^3.11", "~> 3.2.1", "v1.21"] {
            let once = parse_version_constraint(input).unwrap();
            assert_eq!(parse_version_constraint(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[parameterized(
        plain = { "17", Some("17") },
        full = { "17.0.2", Some("17") },
        legacy = { "1.8", Some("8") },
        gradle_enum = { "1_8", Some("8") },
        range = { ">=21", Some("21") },
        garbage = { "latest", None },
    )]
    fn test_parse_major_version(input: &str, expected: Option<&str>) {
        assert_eq!(parse_major_version(input).as_deref(), expected);
    }

    fn entry(language: LanguageId) -> LanguageCatalogEntry {
        Catalog::builtin().unwrap().language(&language).unwrap().clone()
    }

    #[test]
    fn test_manifest_hint_wins_over_files() {
        let fs = MockFileSystem::new();
        fs.add_file(".nvmrc", "16.20.0\n");
        let manifest = RawManifest {
            version_hints: vec![VersionHint::new("engines.node", ">=20.11.0")],
            ..Default::default()
        };

        let resolved = VersionResolver::new(&fs).resolve(
            &entry(LanguageId::NodeJs),
            Path::new("/mock"),
            Some(&manifest),
        );

        assert_eq!(resolved.version, "20.11");
        assert_eq!(
            resolved.source,
            VersionSource::Manifest("engines.node".to_string())
        );
    }

    #[test]
    fn test_malformed_hint_falls_through_to_file() {
        let fs = MockFileSystem::new();
        fs.add_file(".nvmrc", "v16.20.0\n");
        let manifest = RawManifest {
            version_hints: vec![VersionHint::new("engines.node", "*")],
            ..Default::default()
        };

        let resolved = VersionResolver::new(&fs).resolve(
            &entry(LanguageId::NodeJs),
            Path::new("/mock"),
            Some(&manifest),
        );

        assert_eq!(resolved.version, "16.20");
        assert_eq!(
            resolved.source,
            VersionSource::File(PathBuf::from("/mock/.nvmrc"))
        );
    }

    #[test]
    fn test_default_when_nothing_found() {
        let fs = MockFileSystem::new();
        let resolved =
            VersionResolver::new(&fs).resolve(&entry(LanguageId::Python), Path::new("/mock"), None);

        assert_eq!(resolved.version, "3.9");
        assert_eq!(resolved.source, VersionSource::Default);
    }

    #[parameterized(
        pyproject = { "pyproject.toml", "[project]\nrequires-python = \">=3.11\"\n", "3.11" },
        poetry = { "pyproject.toml", "[tool.poetry.dependencies]\npython = \"^3.10\"\n", "3.10" },
        pipfile = { "Pipfile", "[requires]\npython_version = \"3.12\"\n", "3.12" },
        runtime_txt = { "runtime.txt", "python-3.8.18\n", "3.8" },
        python_version = { ".python-version", "3.11.4\n", "3.11" },
    )]
    fn test_python_auxiliary_files(file: &str, content: &str, expected: &str) {
        let fs = MockFileSystem::new();
        fs.add_file(file, content);

        let resolved =
            VersionResolver::new(&fs).resolve(&entry(LanguageId::Python), Path::new("/mock"), None);

        assert_eq!(resolved.version, expected);
    }

    #[parameterized(
        toolchain = { "build.gradle.kts", "java {\n    toolchain {\n        languageVersion.set(JavaLanguageVersion.of(21))\n    }\n}\n", "21" },
        source_compat = { "build.gradle", "sourceCompatibility = '11'\n", "11" },
        enum_compat = { "build.gradle", "sourceCompatibility = JavaVersion.VERSION_1_8\n", "8" },
    )]
    fn test_java_gradle_files(file: &str, content: &str, expected: &str) {
        let fs = MockFileSystem::new();
        fs.add_file(file, content);

        let resolved =
            VersionResolver::new(&fs).resolve(&entry(LanguageId::Java), Path::new("/mock"), None);

        assert_eq!(resolved.version, expected);
    }

    #[test]
    fn test_java_manifest_property_is_major_only() {
        let fs = MockFileSystem::new();
        let manifest = RawManifest {
            version_hints: vec![VersionHint::new("java.version", "1.8")],
            ..Default::default()
        };

        let resolved = VersionResolver::new(&fs).resolve(
            &entry(LanguageId::Java),
            Path::new("/mock"),
            Some(&manifest),
        );

        assert_eq!(resolved.version, "8");
    }

    #[test]
    fn test_ruby_version_file() {
        let fs = MockFileSystem::new();
        fs.add_file(".ruby-version", "ruby-3.3.0\n");

        let resolved =
            VersionResolver::new(&fs).resolve(&entry(LanguageId::Ruby), Path::new("/mock"), None);

        assert_eq!(resolved.version, "3.3");
    }
}
