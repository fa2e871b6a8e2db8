//! Shared parsing helpers for manifest readers

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Parses a JSON manifest whose top level must be an object
pub fn parse_json_object(content: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object at the top level".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Collects the keys of the object-valued `sections` (e.g. `dependencies`, `devDependencies`)
pub fn json_section_keys(
    manifest: &Map<String, Value>,
    sections: &[&str],
    keep: impl Fn(&str) -> bool,
) -> BTreeSet<String> {
    sections
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys())
        .filter(|name| keep(name))
        .cloned()
        .collect()
}

/// Looks up a string at a nested path, e.g. `["engines", "node"]`
pub fn json_string_at<'a>(manifest: &'a Map<String, Value>, path: &[&str]) -> Option<&'a str> {
    let (first, rest) = path.split_first()?;
    let mut current = manifest.get(*first)?;
    for key in rest {
        current = current.get(*key)?;
    }
    current.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Strips a trailing `#` or `//` comment from a line
pub fn strip_line_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    match line.find(marker) {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}
