//! package.json reader

use super::parsers::{json_section_keys, json_string_at, parse_json_object};
use super::{ManifestError, ManifestReader, RawManifest, VersionHint};
use crate::stack::LanguageId;
use std::path::Path;

pub struct PackageJsonReader;

impl ManifestReader for PackageJsonReader {
    fn language(&self) -> LanguageId {
        LanguageId::NodeJs
    }

    fn manifest_name(&self) -> &'static str {
        "package.json"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError> {
        let manifest = parse_json_object(content).map_err(|e| self.unreadable(path, e))?;

        let dependencies =
            json_section_keys(&manifest, &["dependencies", "devDependencies"], |_| true);

        let version_hints = json_string_at(&manifest, &["engines", "node"])
            .map(|node| vec![VersionHint::new("engines.node", node)])
            .unwrap_or_default();

        Ok(RawManifest {
            path: path.to_path_buf(),
            dependencies,
            version_hints,
        })
    }
}
