//! go.mod reader

use super::parsers::strip_line_comment;
use super::{ManifestError, ManifestReader, RawManifest, VersionHint};
use crate::stack::LanguageId;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

pub struct GoModReader;

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(module|go|require)\s+(\S+)").expect("valid regex"))
}

fn requirement_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\S+)\s+v\S+").expect("valid regex"))
}

impl ManifestReader for GoModReader {
    fn language(&self) -> LanguageId {
        LanguageId::Go
    }

    fn manifest_name(&self) -> &'static str {
        "go.mod"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError> {
        let mut module = None;
        let mut dependencies = BTreeSet::new();
        let mut version_hints = Vec::new();
        let mut in_require_block = false;

        for line in content.lines() {
            let line = strip_line_comment(line, "//").trim();
            if line.is_empty() {
                continue;
            }

            if in_require_block {
                if line == ")" {
                    in_require_block = false;
                } else if let Some(caps) = requirement_pattern().captures(line) {
                    dependencies.insert(caps[1].to_string());
                }
                continue;
            }

            if line == "require (" || line == "require(" {
                in_require_block = true;
                continue;
            }

            let Some(caps) = directive_pattern().captures(line) else {
                continue;
            };
            let value = caps[2].to_string();
            match &caps[1] {
                "module" => module = Some(value),
                "go" => version_hints.push(VersionHint::new("go directive", value)),
                _ => {
                    dependencies.insert(value);
                }
            }
        }

        if module.is_none() {
            return Err(self.unreadable(path, "missing module directive".to_string()));
        }
        if in_require_block {
            return Err(self.unreadable(path, "unterminated require block".to_string()));
        }

        Ok(RawManifest {
            path: path.to_path_buf(),
            dependencies,
            version_hints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_go_mod() {
        let content = "\
module github.com/acme/api

go 1.21

toolchain go1.22.1

require github.com/gin-gonic/gin v1.9.1

require (
\tgithub.com/gofiber/fiber/v2 v2.50.0
\tgolang.org/x/text v0.14.0 // indirect
)
";

        let manifest = GoModReader.parse(Path::new("go.mod"), content).unwrap();

        let deps: Vec<&str> = manifest.dependencies.iter().map(String::as_str).collect();
        assert_eq!(
            deps,
            vec![
                "github.com/gin-gonic/gin",
                "github.com/gofiber/fiber/v2",
                "golang.org/x/text",
            ]
        );
        assert_eq!(
            manifest.version_hints,
            vec![VersionHint::new("go directive", "1.21")]
        );
    }

    #[test]
    fn test_module_only() {
        let manifest = GoModReader
            .parse(Path::new("go.mod"), "module x\n\ngo 1.21\n")
            .unwrap();
        assert!(manifest.dependencies.is_empty());
        assert_eq!(manifest.version_hints[0].constraint, "1.21");
    }

    #[test]
    fn test_missing_module_directive() {
        let err = GoModReader
            .parse(Path::new("go.mod"), "go 1.21\n")
            .unwrap_err();
        assert!(err.to_string().contains("missing module directive"));
    }

    #[test]
    fn test_unterminated_require_block() {
        let err = GoModReader
            .parse(Path::new("go.mod"), "module x\nrequire (\n\tgithub.com/a/b v1.0.0\n")
            .unwrap_err();
        assert!(matches!(err, ManifestError::Unreadable { .. }));
    }
}
