//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use vaptest_app::{RunInput, outcome_exit_code, run_manifests};
use vaptest_cel::CelEngine;
use vaptest_settings::RunOptions;
use vaptest_test_util::{
    EXPECTED_OUTPUT, expected_code, fixture_dirs, fixture_manifests, repo_root,
};

fn schemas_dir() -> Utf8PathBuf {
    repo_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![SchemaSpec {
        filename: "vaptest.manifest.v1.json",
        generate: vaptest_settings::manifest_schema,
    }]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("Failed to write schema to {path}"))?;
        println!("Wrote {path}");
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Run every fixture in-process and compare against its golden report.
///
/// This checks:
/// 1. Schema validation: each runnable fixture manifest conforms to the manifest schema
/// 2. The report matches `expected.out` byte for byte
/// 3. The exit code matches `expected.code` (0 when absent)
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(vaptest_settings::manifest_schema())
        .context("Failed to serialize manifest schema")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))?;
    let engine = CelEngine::new();
    let mut errors = Vec::new();
    let fixtures = fixture_dirs();

    for dir in &fixtures {
        let name = dir.file_name().unwrap_or(dir.as_str());
        let before = errors.len();
        let want_code = expected_code(dir);
        let manifests = fixture_manifests(dir);
        if manifests.is_empty() {
            errors.push(format!("{name}: no vaptest.yaml"));
            continue;
        }

        if want_code != 1 {
            for rel in &manifests {
                for problem in schema_problems(&validator, &dir.join(rel))? {
                    errors.push(format!("{name}/{rel}: {problem}"));
                }
            }
        }

        let paths: Vec<Utf8PathBuf> = manifests.iter().map(|rel| dir.join(rel)).collect();
        let output = run_manifests(
            &engine,
            RunInput {
                manifests: &paths,
                options: RunOptions::default(),
            },
        );
        // Goldens name manifests relative to the fixture directory.
        let text = output.text.replace(&format!("[{dir}/"), "[");
        let code = outcome_exit_code(output.outcome());

        let expected_path = dir.join(EXPECTED_OUTPUT);
        let expected = fs::read_to_string(&expected_path)
            .with_context(|| format!("Failed to read {expected_path}"))?
            .replace("\r\n", "\n");
        if text != expected {
            errors.push(format!(
                "{name}: report mismatch\n--- expected\n{expected}--- actual\n{text}"
            ));
        }
        if code != want_code {
            errors.push(format!("{name}: exit code {code}, expected {want_code}"));
        }
        if errors.len() == before {
            println!("✓ {name}");
        }
    }

    if errors.is_empty() {
        println!("\n✓ {} fixtures conform", fixtures.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Conformance failed with {} errors", errors.len())
    }
}

fn schema_problems(
    validator: &jsonschema::Validator,
    manifest: &Utf8Path,
) -> anyhow::Result<Vec<String>> {
    let text = fs::read_to_string(manifest).with_context(|| format!("Failed to read {manifest}"))?;
    let doc: serde_json::Value =
        serde_yaml_ng::from_str(&text).with_context(|| format!("Failed to parse {manifest}"))?;
    Ok(validator.iter_errors(&doc).map(|e| e.to_string()).collect())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  conform           Run tests/fixtures and compare with expected reports");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
