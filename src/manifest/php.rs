//! composer.json reader

use super::parsers::{json_section_keys, json_string_at, parse_json_object};
use super::{ManifestError, ManifestReader, RawManifest, VersionHint};
use crate::stack::LanguageId;
use std::path::Path;

pub struct ComposerReader;

/// Platform requirements (`php`, `ext-*`, `lib-*`) are not packages
fn is_package(name: &str) -> bool {
    name != "php"
        && !name.starts_with("ext-")
        && !name.starts_with("lib-")
        && !name.starts_with("composer-")
}

impl ManifestReader for ComposerReader {
    fn language(&self) -> LanguageId {
        LanguageId::Php
    }

    fn manifest_name(&self) -> &'static str {
        "composer.json"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError> {
        let manifest = parse_json_object(content).map_err(|e| self.unreadable(path, e))?;

        let dependencies = json_section_keys(&manifest, &["require", "require-dev"], is_package);

        let mut version_hints = Vec::new();
        if let Some(php) = json_string_at(&manifest, &["require", "php"]) {
            version_hints.push(VersionHint::new("require.php", php));
        }
        if let Some(platform) = json_string_at(&manifest, &["config", "platform", "php"]) {
            version_hints.push(VersionHint::new("config.platform.php", platform));
        }

        Ok(RawManifest {
            path: path.to_path_buf(),
            dependencies,
            version_hints,
        })
    }
}
