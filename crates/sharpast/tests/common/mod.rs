//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Directory holding the C# fixture files.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Reads one fixture by file name.
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// Every fixture file name, sorted.
pub fn fixture_names() -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(fixtures_dir())
        .expect("fixtures directory should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".cs"))
        .collect();
    names.sort();
    names
}

/// Visits every object in a projected tree.
pub fn for_each_object(value: &Value, f: &mut impl FnMut(&serde_json::Map<String, Value>)) {
    match value {
        Value::Object(map) => {
            f(map);
            for child in map.values() {
                for_each_object(child, f);
            }
        }
        Value::Array(items) => {
            for item in items {
                for_each_object(item, f);
            }
        }
        _ => {}
    }
}

/// All `@type` tags in document order.
pub fn type_tags(value: &Value) -> Vec<String> {
    let mut tags = Vec::new();
    for_each_object(value, &mut |map| {
        if let Some(Value::String(tag)) = map.get("@type") {
            tags.push(tag.clone());
        }
    });
    tags
}

/// First object whose `@type` equals `tag`.
pub fn find_by_type<'a>(value: &'a Value, tag: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if map.get("@type").and_then(Value::as_str) == Some(tag) {
                return Some(value);
            }
            map.values().find_map(|child| find_by_type(child, tag))
        }
        Value::Array(items) => items.iter().find_map(|item| find_by_type(item, tag)),
        _ => None,
    }
}

/// Nesting depth of a JSON value.
pub fn depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        Value::Array(items) => items.iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}
