use crate::model::ManifestV1;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use thiserror::Error;
use vaptest_types::TestSuite;

/// One structural problem in a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("policies is required")]
    MissingPolicies,
    #[error("resources is required")]
    MissingResources,
    #[error("testSuites is required")]
    MissingTestSuites,
    #[error("testSuites[{index}].policy is empty")]
    EmptySuitePolicy { index: usize },
}

/// Every structural problem found in one manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidManifest(pub Vec<ManifestError>);

impl fmt::Display for InvalidManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidManifest {}

/// A validated manifest whose paths are anchored at the manifest's directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedManifest {
    pub policies: Vec<Utf8PathBuf>,
    pub resources: Vec<Utf8PathBuf>,
    pub params: Vec<Utf8PathBuf>,
    pub namespaces: Vec<Utf8PathBuf>,
    pub test_suites: Vec<TestSuite>,
}

pub fn validate_manifest(manifest: &ManifestV1) -> Result<(), InvalidManifest> {
    let mut errors = Vec::new();
    if manifest.policies.is_none() {
        errors.push(ManifestError::MissingPolicies);
    }
    if manifest.resources.is_none() {
        errors.push(ManifestError::MissingResources);
    }
    match &manifest.test_suites {
        None => errors.push(ManifestError::MissingTestSuites),
        Some(suites) => errors.extend(
            suites
                .iter()
                .enumerate()
                .filter(|(_, suite)| suite.policy.is_empty())
                .map(|(index, _)| ManifestError::EmptySuitePolicy { index }),
        ),
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(InvalidManifest(errors))
    }
}

/// Validate, then join every relative path with `base_dir`.
pub fn resolve_manifest(
    manifest: ManifestV1,
    base_dir: &Utf8Path,
) -> Result<ResolvedManifest, InvalidManifest> {
    validate_manifest(&manifest)?;
    let anchor = |paths: Vec<String>| -> Vec<Utf8PathBuf> {
        paths
            .into_iter()
            .map(|p| {
                let p = Utf8PathBuf::from(p);
                if p.is_absolute() { p } else { base_dir.join(p) }
            })
            .collect()
    };
    Ok(ResolvedManifest {
        policies: anchor(manifest.policies.unwrap_or_default()),
        resources: anchor(manifest.resources.unwrap_or_default()),
        params: anchor(manifest.params),
        namespaces: anchor(manifest.namespaces),
        test_suites: manifest.test_suites.unwrap_or_default(),
    })
}
