use camino::Utf8Path;
use thiserror::Error;
use vaptest_settings::{InvalidManifest, ResolvedManifest, parse_manifest_yaml, resolve_manifest};

/// Why a manifest could not be run at all. The display text is the report line
/// shown after `FAIL: `.
#[derive(Debug, Error)]
pub enum ManifestLoadError {
    #[error("read manifest YAML: {0}")]
    Read(std::io::Error),
    #[error("parse manifest YAML: {0}")]
    Parse(anyhow::Error),
    #[error("invalid manifest: {0}")]
    Invalid(InvalidManifest),
}

/// Read, parse, and validate a manifest; its paths come back anchored at the
/// manifest's own directory.
pub fn load_manifest(path: &Utf8Path) -> Result<ResolvedManifest, ManifestLoadError> {
    let text = std::fs::read_to_string(path).map_err(ManifestLoadError::Read)?;
    let manifest = parse_manifest_yaml(&text).map_err(ManifestLoadError::Parse)?;
    let base_dir = path.parent().unwrap_or(Utf8Path::new(""));
    resolve_manifest(manifest, base_dir).map_err(ManifestLoadError::Invalid)
}
