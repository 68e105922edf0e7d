//! Filesystem adapters: read manifests, load YAML documents into the resource
//! pool, scaffold test directories.
//!
//! Load-time problems in individual documents are logged and skipped. Only the
//! manifest itself and `init` can fail outright.

#![forbid(unsafe_code)]

mod documents;
mod init;
mod load;
mod manifest;

pub use documents::decode_documents;
pub use init::{ScaffoldOutcome, scaffold, test_dir_for};
pub use load::{build_pool, load_namespaces, load_params, load_policies, load_resources};
pub use manifest::{ManifestLoadError, load_manifest};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use vaptest_domain::ResourcePool;

    /// Parse and validate arbitrary text as a `vaptest.yaml` manifest.
    pub fn parse_manifest(text: &str) -> anyhow::Result<()> {
        let manifest = vaptest_settings::parse_manifest_yaml(text)?;
        vaptest_settings::validate_manifest(&manifest)?;
        Ok(())
    }

    /// Decode arbitrary text as a resource file and index what survives.
    ///
    /// Returns the number of objects kept. **Never panics** on any input.
    pub fn load_resource_text(text: &str) -> usize {
        let mut pool = ResourcePool::new();
        crate::load::load_resource_text(&mut pool, text, "fuzz.yaml");
        pool.resource_count()
    }
}
