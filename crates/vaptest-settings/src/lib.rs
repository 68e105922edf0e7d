//! Manifest parsing, validation, and path resolution.
//!
//! This crate is intentionally IO-free: it parses manifests provided as strings
//! and resolves their paths against a directory the caller supplies.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{ManifestV1, RunOptions};
pub use resolve::{InvalidManifest, ManifestError, ResolvedManifest, resolve_manifest, validate_manifest};

/// Parse a `vaptest.yaml` manifest into a typed model.
pub fn parse_manifest_yaml(input: &str) -> anyhow::Result<ManifestV1> {
    let manifest: ManifestV1 = serde_yaml_ng::from_str(input)?;
    Ok(manifest)
}

/// JSON schema of the manifest format.
pub fn manifest_schema() -> schemars::Schema {
    schemars::schema_for!(ManifestV1)
}
