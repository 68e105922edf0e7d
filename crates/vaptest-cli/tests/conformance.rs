//! Conformance tests for vaptest.
//!
//! These tests validate:
//! 1. Every fixture manifest conforms to the published manifest schema
//! 2. A freshly scaffolded manifest conforms too

use assert_cmd::Command;
use camino::Utf8Path;
use serde_json::Value;
use tempfile::TempDir;
use vaptest_test_util::{expected_code, fixture_dirs, fixture_manifests, write_file};

fn manifest_schema() -> Value {
    serde_json::to_value(vaptest_settings::manifest_schema()).expect("schema to JSON")
}

fn yaml_to_json(path: &Utf8Path) -> Value {
    let text = std::fs::read_to_string(path).expect("Failed to read manifest");
    serde_yaml_ng::from_str(&text).expect("Failed to parse manifest YAML")
}

#[test]
fn fixture_manifests_conform_to_schema() {
    let schema = manifest_schema();
    let validator = jsonschema::validator_for(&schema).expect("compile manifest schema");

    for dir in fixture_dirs() {
        // Harness-failure fixtures are invalid on purpose.
        if expected_code(&dir) == 1 {
            continue;
        }
        for rel in fixture_manifests(&dir) {
            let path = dir.join(&rel);
            let doc = yaml_to_json(&path);
            let errors: Vec<String> = validator.iter_errors(&doc).map(|e| e.to_string()).collect();
            assert!(errors.is_empty(), "{path}: {errors:?}");
        }
    }
}

#[allow(deprecated)]
#[test]
fn scaffolded_manifest_conforms_to_schema() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = Utf8Path::from_path(temp_dir.path()).expect("utf8 temp dir");
    write_file(
        root,
        "policy.yaml",
        "apiVersion: admissionregistration.k8s.io/v1\nkind: ValidatingAdmissionPolicy\nmetadata:\n  name: p\n",
    );
    Command::cargo_bin("vaptest")
        .expect("vaptest binary not found - run `cargo build` first")
        .current_dir(root)
        .args(["init", "policy.yaml"])
        .assert()
        .success();

    let schema = manifest_schema();
    let doc = yaml_to_json(&root.join("policy.test/vaptest.yaml"));
    assert!(jsonschema::is_valid(&schema, &doc));
}
