//! requirements.txt reader

use super::parsers::strip_line_comment;
use super::{ManifestError, ManifestReader, RawManifest};
use crate::stack::LanguageId;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

pub struct RequirementsReader;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid regex"))
}

/// PEP 503 normalization: lowercase, runs of `-`, `_`, `.` collapse to `-`
pub fn normalize_package_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut previous_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !previous_separator {
                normalized.push('-');
            }
            previous_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            previous_separator = false;
        }
    }
    normalized
}

fn requirement_name(line: &str) -> Option<String> {
    if let Some((_, egg)) = line.split_once("#egg=") {
        let name = egg.split(['&', ' ']).next().unwrap_or(egg);
        return (!name.is_empty()).then(|| normalize_package_name(name));
    }

    let line = strip_line_comment(line, " #").trim();
    if line.is_empty() || line.starts_with('-') || line.contains("://") {
        return None;
    }

    name_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| normalize_package_name(m.as_str()))
}

impl ManifestReader for RequirementsReader {
    fn language(&self) -> LanguageId {
        LanguageId::Python
    }

    fn manifest_name(&self) -> &'static str {
        "requirements.txt"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError> {
        let dependencies: BTreeSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(requirement_name)
            .collect();

        Ok(RawManifest {
            path: path.to_path_buf(),
            dependencies,
            version_hints: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requirements() {
        let content = "\
# web
Django>=4.2,<5.0
psycopg2-binary==2.9.9  # driver
uvicorn[standard]~=0.23
-r base.txt
--index-url https://pypi.example.com/simple
git+https://github.com/org/private_lib.git#egg=Private_Lib
https://example.com/pkg.tar.gz

requests ; python_version >= '3.8'
";

        let manifest = RequirementsReader
            .parse(Path::new("requirements.txt"), content)
            .unwrap();

        let deps: Vec<&str> = manifest.dependencies.iter().map(String::as_str).collect();
        assert_eq!(
            deps,
            vec!["django", "private-lib", "psycopg2-binary", "requests", "uvicorn"]
        );
    }

    #[test]
    fn test_normalize_package_name() {
        assert_eq!(normalize_package_name("Flask_SQLAlchemy"), "flask-sqlalchemy");
        assert_eq!(normalize_package_name("zope..interface"), "zope-interface");
    }

    #[test]
    fn test_empty_requirements() {
        let manifest = RequirementsReader
            .parse(Path::new("requirements.txt"), "")
            .unwrap();
        assert!(manifest.dependencies.is_empty());
    }
}
