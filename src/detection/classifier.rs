//! Framework classification over a language's catalog entries

use crate::catalog::{FrameworkCatalogEntry, LanguageCatalogEntry};
use std::collections::BTreeSet;

/// True when `dependency` is `marker` itself or a `/`-suffixed sub-path of it,
/// e.g. `github.com/gofiber/fiber/v2` for marker `github.com/gofiber/fiber`
pub fn marker_matches(marker: &str, dependency: &str) -> bool {
    if dependency.eq_ignore_ascii_case(marker) {
        return true;
    }
    match dependency.get(..marker.len()) {
        Some(prefix) => {
            prefix.eq_ignore_ascii_case(marker)
                && dependency.as_bytes().get(marker.len()) == Some(&b'/')
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameworkMatch<'a> {
    pub entry: &'a FrameworkCatalogEntry,
    pub marker: &'a str,
    pub dependency: &'a str,
}

pub struct FrameworkClassifier<'a> {
    language: &'a LanguageCatalogEntry,
}

impl<'a> FrameworkClassifier<'a> {
    pub fn new(language: &'a LanguageCatalogEntry) -> Self {
        Self { language }
    }

    /// First framework, in catalog order, with a marker among `dependencies`
    pub fn classify<'d>(&self, dependencies: &'d BTreeSet<String>) -> Option<FrameworkMatch<'a>>
    where
        'd: 'a,
    {
        self.language.frameworks.iter().find_map(|entry| {
            entry.markers.iter().find_map(|marker| {
                dependencies
                    .iter()
                    .find(|dep| marker_matches(marker, dep))
                    .map(|dep| FrameworkMatch {
                        entry,
                        marker: marker.as_str(),
                        dependency: dep.as_str(),
                    })
            })
        })
    }
}
