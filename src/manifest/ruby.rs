//! Gemfile reader

use super::{ManifestError, ManifestReader, RawManifest, VersionHint};
use crate::stack::LanguageId;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

pub struct GemfileReader;

fn gem_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^\s*gem\s+["']([^"']+)["']"#).expect("valid regex"))
}

fn ruby_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^\s*ruby\s+["']([^"']+)["']"#).expect("valid regex"))
}

impl ManifestReader for GemfileReader {
    fn language(&self) -> LanguageId {
        LanguageId::Ruby
    }

    fn manifest_name(&self) -> &'static str {
        "Gemfile"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError> {
        let mut dependencies = BTreeSet::new();
        let mut version_hints = Vec::new();

        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            if let Some(caps) = gem_pattern().captures(line) {
                dependencies.insert(caps[1].to_string());
            } else if let Some(caps) = ruby_pattern().captures(line) {
                version_hints.push(VersionHint::new("ruby directive", &caps[1]));
            }
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
    fn test_parse_gemfile() {
        let content = r#"source "https://rubygems.org"

ruby "3.2.2"

gem "rails", "~> 7.1.0"
gem 'pg', '~> 1.1'
# gem "sidekiq"

group :development do
  gem "web-console"
end
"#;

        let manifest = GemfileReader.parse(Path::new("Gemfile"), content).unwrap();

        let deps: Vec<&str> = manifest.dependencies.iter().map(String::as_str).collect();
        assert_eq!(deps, vec!["pg", "rails", "web-console"]);
        assert_eq!(
            manifest.version_hints,
            vec![VersionHint::new("ruby directive", "3.2.2")]
        );
    }

    #[test]
    fn test_ruby_file_directive_is_not_a_hint() {
        let manifest = GemfileReader
            .parse(Path::new("Gemfile"), "ruby file: \".ruby-version\"\n")
            .unwrap();
        assert!(manifest.version_hints.is_empty());
    }
}
