//! Shared test utilities for the vaptest workspace.
//!
//! This crate exists because `xtask` needs fixture discovery at runtime
//! (not behind `#[cfg(test)]`).

use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;
use walkdir::WalkDir;

/// Name of the golden report file in each fixture directory.
pub const EXPECTED_OUTPUT: &str = "expected.out";

/// Name of the file holding the expected exit code, when it is not 0.
pub const EXPECTED_CODE: &str = "expected.code";

/// Repository root (the directory holding the workspace `Cargo.toml`).
pub fn repo_root() -> Utf8PathBuf {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/vaptest-test-util -> crates -> repo root
    manifest_dir
        .parent()
        .and_then(Utf8Path::parent)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

pub fn fixtures_dir() -> Utf8PathBuf {
    repo_root().join("tests").join("fixtures")
}

/// Every fixture scenario: a directory under `tests/fixtures` with an
/// `expected.out`, sorted by name.
pub fn fixture_dirs() -> Vec<Utf8PathBuf> {
    let mut dirs: Vec<Utf8PathBuf> = WalkDir::new(fixtures_dir())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .filter(|dir| dir.join(EXPECTED_OUTPUT).exists())
        .collect();
    dirs.sort();
    dirs
}

/// Manifests a fixture runs, relative to the fixture directory: `vaptest.yaml`
/// at the top, then any `*/vaptest.yaml` one level down, sorted.
pub fn fixture_manifests(dir: &Utf8Path) -> Vec<String> {
    let mut manifests: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name() == "vaptest.yaml")
        .filter_map(|entry| relative(entry.path(), dir))
        .collect();
    manifests.sort_by_key(|m| (m.contains('/'), m.clone()));
    manifests
}

fn relative(path: &Path, base: &Utf8Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    Some(rel.to_str()?.replace('\\', "/"))
}

/// Expected exit code for a fixture (defaults to 0).
pub fn expected_code(dir: &Utf8Path) -> i32 {
    std::fs::read_to_string(dir.join(EXPECTED_CODE))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Write `contents` at `root/rel`, creating parent directories.
pub fn write_file(root: &Utf8Path, rel: &str, contents: &str) -> Utf8PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {parent}: {e}"));
    }
    std::fs::write(&path, contents).unwrap_or_else(|e| panic!("write {path}: {e}"));
    path
}
