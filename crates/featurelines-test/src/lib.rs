#![deny(clippy::all)]
//! End-to-end tests for feature identifier parsing
//!
//! Fixtures live in the repository's `fixtures/` directory: one identifier per
//! line, with blank lines and `#` comments ignored. `valid-*.txt` files hold
//! identifiers that must parse and round-trip; `invalid-*.txt` files hold
//! identifiers that must be rejected.

use std::path::{Path, PathBuf};

/// The repository's `fixtures/` directory
pub fn fixtures_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .parent()
    .and_then(Path::parent)
    .expect("crate should live two levels below the workspace root")
    .join("fixtures")
}

/// Load a fixture file from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
  load_fixture_from_path(&fixtures_dir().join(filename))
}

/// Load a fixture file from a path
pub fn load_fixture_from_path(fixture_path: &Path) -> String {
  std::fs::read_to_string(fixture_path).unwrap_or_else(|e| {
    panic!(
      "Failed to read fixture file {}: {}",
      fixture_path.display(),
      e
    )
  })
}

/// The identifiers in a fixture, skipping blank lines and `#` comments
pub fn fixture_identifiers(contents: &str) -> Vec<&str> {
  contents
    .lines()
    .map(str::trim_end)
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .collect()
}
