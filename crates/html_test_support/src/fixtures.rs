//! Fragment fixtures shared by the parser, compiler and reconciler test suites.
//!
//! Each file under `fixtures/` holds `[[case]]` tables:
//!
//! ```toml
//! [[case]]
//! name = "stray top-level text"
//! input = "  <div>hi</div>  "
//! outline = ["<div>", "  \"hi\""]
//! program = ["open div key=*", "  text \"hi\"", "close div"]
//! tree = ["<div>", "  \"hi\""]
//! ```
//!
//! Every expectation is optional so a case only pins what it is about. `program` uses
//! `key=*` for generated identities and indents by nesting depth; `tree` omits keys.
//! `error` holds the rendered compile error for cases that must not compile.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(rename = "case", default)]
    cases: Vec<FragmentCase>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentCase {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub outline: Option<Vec<String>>,
    #[serde(default)]
    pub program: Option<Vec<String>>,
    #[serde(default)]
    pub tree: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Loads every case from every `*.toml` file, sorted by file name.
///
/// Panics on unreadable or malformed files: a broken fixture is a test failure.
pub fn load_cases() -> Vec<FragmentCase> {
    let dir = fixtures_dir();
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|err| panic!("failed to list fixtures in {dir:?}: {err}"))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut cases = Vec::new();
    for path in paths {
        cases.extend(load_file(&path));
    }
    assert!(!cases.is_empty(), "no fixture cases found in {dir:?}");
    cases
}

pub fn load_file(path: &Path) -> Vec<FragmentCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture file {path:?}: {err}"));
    let file: FixtureFile = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture file {path:?}: {err}"));
    for case in &file.cases {
        assert!(
            !(case.error.is_some() && (case.program.is_some() || case.tree.is_some())),
            "fixture '{}' in {path:?} expects an error and an output",
            case.name
        );
    }
    file.cases
}
