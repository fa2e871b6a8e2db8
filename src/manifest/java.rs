//! pom.xml reader

use super::{ManifestError, ManifestReader, RawManifest, VersionHint};
use crate::stack::LanguageId;
use roxmltree::{Document, Node};
use std::collections::BTreeSet;
use std::path::Path;

pub struct PomReader;

/// Properties that pin the Java release, in priority order
const VERSION_PROPERTIES: &[&str] = &[
    "java.version",
    "maven.compiler.release",
    "maven.compiler.source",
    "maven.compiler.target",
];

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// `groupId:artifactId` for a `<dependency>` or `<parent>` element
fn coordinate(node: Node<'_, '_>) -> Option<String> {
    let group = child_text(node, "groupId")?;
    let artifact = child_text(node, "artifactId")?;
    Some(format!("{}:{}", group, artifact))
}

impl ManifestReader for PomReader {
    fn language(&self) -> LanguageId {
        LanguageId::Java
    }

    fn manifest_name(&self) -> &'static str {
        "pom.xml"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawManifest, ManifestError> {
        let doc = Document::parse(content).map_err(|e| self.unreadable(path, e.to_string()))?;

        let root = doc.root_element();
        if !root.has_tag_name("project") {
            return Err(self.unreadable(
                path,
                format!("expected <project> root element, found <{}>", root.tag_name().name()),
            ));
        }

        let mut dependencies = BTreeSet::new();
        for node in root.children() {
            if node.has_tag_name("parent") {
                dependencies.extend(coordinate(node));
            }
        }
        for node in root.descendants() {
            if node.has_tag_name("dependency") {
                dependencies.extend(coordinate(node));
            }
        }

        let mut version_hints = Vec::new();
        if let Some(properties) = root.children().find(|n| n.has_tag_name("properties")) {
            for property in VERSION_PROPERTIES {
                if let Some(value) = child_text(properties, property) {
                    // ${...} references are not resolved
                    if !value.starts_with("${") {
                        version_hints.push(VersionHint::new(*property, value));
                    }
                }
            }
        }

        Ok(RawManifest {
            path: path.to_path_buf(),
            dependencies,
            version_hints,
        })
    }
}
