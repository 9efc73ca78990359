use std::fs;
use std::path::{Path, PathBuf};

use response_view::config::{ResponseViewContent, Settings};
use response_view::content::{self, PROTOCOL_EXTENSION};
use response_view::exchange::Exchange;

/// Golden tests for content selection.
///
/// Each `tests/golden/<case>.json` holds an exchange. Alongside it,
/// `<case>.<view>.http` holds exactly what a result document shows for
/// that exchange when the given content view is configured.

fn show_diff(expected: &str, actual: &str, file_path: &Path) {
    let expected_lines: Vec<&str> = expected
        .lines()
        .collect();
    let actual_lines: Vec<&str> = actual
        .lines()
        .collect();

    let max_lines = expected_lines
        .len()
        .max(actual_lines.len());

    println!("\nDifferences found in file: {:?}", file_path);
    println!("--- Expected");
    println!("+++ Selected");

    for i in 0..max_lines {
        let expected_line = expected_lines
            .get(i)
            .unwrap_or(&"");
        let actual_line = actual_lines
            .get(i)
            .unwrap_or(&"");

        if expected_line != actual_line {
            println!("@@ Line {} @@", i + 1);
            println!("- {}", expected_line);
            println!("+ {}", actual_line);
        }
    }
}

fn load(path: &Path) -> Exchange {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read exchange {:?}: {}", path, e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse exchange {:?}: {}", path, e))
}

/// The expected renderings for a case, with the view each one is for.
fn renderings(dir: &Path, case: &str) -> Vec<(ResponseViewContent, PathBuf)> {
    let entries = fs::read_dir(dir).expect("Failed to read golden directory");

    let mut found = Vec::new();
    for entry in entries {
        let path = entry
            .expect("Failed to read directory entry")
            .path();

        let name = match path
            .file_name()
            .and_then(|s| s.to_str())
        {
            Some(name) => name,
            None => continue,
        };

        let view = match name
            .strip_prefix(case)
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(".http"))
        {
            Some(view) => view,
            None => continue,
        };

        let view: ResponseViewContent = serde_json::from_value(serde_json::Value::String(
            view.to_string(),
        ))
        .unwrap_or_else(|e| panic!("Unknown view in {:?}: {}", path, e));

        found.push((view, path));
    }
    found
}

#[test]
fn ensure_identical_output() {
    let dir = Path::new("tests/golden");
    assert!(dir.exists(), "golden directory missing");

    let entries = fs::read_dir(dir).expect("Failed to read golden directory");

    let mut cases = Vec::new();
    for entry in entries {
        let path = entry
            .expect("Failed to read directory entry")
            .path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("json")
        {
            cases.push(path);
        }
    }

    assert!(!cases.is_empty(), "No .json files found in golden directory");

    let mut failures = Vec::new();
    let mut compared = 0;

    for case in &cases {
        let exchange = load(case);
        let stem = case
            .file_stem()
            .and_then(|s| s.to_str())
            .expect("case name");

        for (view, expected_path) in renderings(dir, stem) {
            let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                panic!("Failed to read expected output {:?}: {}", expected_path, e)
            });

            let settings = Settings {
                response_view_content: view,
                ..Default::default()
            };

            let first = content::select(&exchange, &settings);
            let second = content::select(&exchange, &settings);
            assert_eq!(first, second, "selection not deterministic for {:?}", case);

            let actual = first.text();
            if actual != expected {
                show_diff(&expected, &actual, &expected_path);
                failures.push(expected_path.clone());
            }
            compared += 1;
        }
    }

    assert!(compared > 0, "No expected renderings found");

    if !failures.is_empty() {
        panic!(
            "Golden test failed: {} of {} renderings differ",
            failures.len(),
            compared
        );
    }
}

#[test]
fn empty_body_falls_back_to_protocol_text() {
    let exchange = load(Path::new("tests/golden/no-content.json"));

    let selection = content::select(&exchange, &Settings::default());

    assert!(!selection
        .content
        .is_empty());
    assert_eq!(selection.extension, Some(PROTOCOL_EXTENSION));
}
