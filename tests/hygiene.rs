//! Hygiene: source-level rules for the client crate.
//!
//! Production code under `src/` (sibling `*_test.rs` files excluded) must not
//! crash the page, must keep bearer tokens out of the browser console, and
//! must reach `localStorage` only through the storage adapter.

use std::fs;
use std::path::{Path, PathBuf};

/// Patterns with a zero budget in production code.
const FORBIDDEN: &[&str] = &[
    ".unwrap()",
    ".expect(",
    "panic!(",
    "unreachable!(",
    "todo!(",
    "unimplemented!(",
    "dbg!(",
    "#[allow(dead_code)]",
];

const STORAGE_ADAPTER: &str = "storage.rs";

fn production_sources(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            production_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") && !path.to_string_lossy().ends_with("_test.rs") {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

/// `path:line: text` for every line accepted by `matches`.
fn offending_lines(matches: impl Fn(&Path, &str) -> bool) -> Vec<String> {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    files
        .iter()
        .flat_map(|(path, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| matches(path, line))
                .map(move |(n, line)| format!("  {}:{}: {}", path.display(), n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn no_panicking_or_debug_constructs() {
    let hits = offending_lines(|_, line| FORBIDDEN.iter().any(|pattern| line.contains(pattern)));
    assert!(hits.is_empty(), "forbidden construct in production code:\n{}", hits.join("\n"));
}

#[test]
fn token_never_logged() {
    let hits = offending_lines(|_, line| {
        let logs = line.contains("log::") || line.contains("tracing::");
        logs && (line.contains("{token") || line.contains(", token"))
    });
    assert!(hits.is_empty(), "bearer token interpolated into a log line:\n{}", hits.join("\n"));
}

#[test]
fn local_storage_only_through_adapter() {
    let hits = offending_lines(|path, line| {
        line.contains("local_storage(") && path.file_name().is_none_or(|name| name != STORAGE_ADAPTER)
    });
    assert!(hits.is_empty(), "localStorage touched outside the storage adapter:\n{}", hits.join("\n"));
}
