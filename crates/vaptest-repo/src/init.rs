use crate::load::policy_names;
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info};
use vaptest_settings::ManifestV1;
use vaptest_types::{Expectation, ResourceRef, TestCase, TestSuite, ids};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub test_dir: Utf8PathBuf,
    /// Policy names found in the target file, one suite each.
    pub policies: Vec<String>,
}

/// `policy.yaml` becomes `policy.test`.
pub fn test_dir_for(policy_file: &Utf8Path) -> Utf8PathBuf {
    let stem = policy_file.with_extension("");
    Utf8PathBuf::from(format!("{stem}{}", ids::TEST_DIR_SUFFIX))
}

/// Create the test directory next to `policy_file` with a starter manifest and
/// an empty resources file. Existing manifest or resources files are never
/// overwritten.
pub fn scaffold(policy_file: &Utf8Path) -> anyhow::Result<ScaffoldOutcome> {
    let test_dir = create_test_dir(policy_file).context("create test directory")?;
    let policies = create_root_manifest(policy_file, &test_dir).context("create root manifest")?;
    create_resource_manifest(&test_dir).context("create resource manifest")?;
    Ok(ScaffoldOutcome { test_dir, policies })
}

fn create_test_dir(policy_file: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    match fs::metadata(policy_file) {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            bail!("admission policy file is not found")
        }
        Err(err) => return Err(err).with_context(|| format!("check file {policy_file}")),
    }

    let parent = policy_file
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or(Utf8Path::new("."));
    let parent_meta =
        fs::metadata(parent).with_context(|| format!("get parent directory info: {parent}"))?;

    let dir = test_dir_for(policy_file);
    match fs::create_dir(&dir) {
        Ok(()) => {
            fs::set_permissions(&dir, parent_meta.permissions())
                .with_context(|| format!("set permissions on {dir}"))?;
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            info!(dir = %dir, "directory already exists");
        }
        Err(err) => return Err(err).with_context(|| format!("make dir {dir}")),
    }
    Ok(dir)
}

fn create_root_manifest(policy_file: &Utf8Path, test_dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let path = test_dir.join(ids::ROOT_MANIFEST_NAME);
    if path.exists() {
        bail!("file already exists: {path}");
    }

    let text = fs::read_to_string(policy_file)
        .with_context(|| format!("read {policy_file}"))?;
    let names = policy_names(&text, policy_file);
    debug!(policies = ?names, "test target policies");

    let file_name = policy_file.file_name().unwrap_or(policy_file.as_str());
    let yaml = serde_yaml_ng::to_string(&base_manifest(file_name, &names))
        .context("serialize manifest")?;
    fs::write(&path, yaml).with_context(|| format!("create {}", ids::ROOT_MANIFEST_NAME))?;
    Ok(names)
}

fn create_resource_manifest(test_dir: &Utf8Path) -> anyhow::Result<()> {
    let path = test_dir.join(ids::RESOURCE_MANIFEST_NAME);
    if path.exists() {
        bail!("file already exists: {path}");
    }
    fs::write(&path, "").with_context(|| format!("create {}", ids::RESOURCE_MANIFEST_NAME))
}

fn base_manifest(policy_file_name: &str, policies: &[String]) -> ManifestV1 {
    let placeholder = |name: &str, expect| {
        TestCase::new(expect).with_object(ResourceRef::kind_name(ids::PLACEHOLDER_KIND, name))
    };
    ManifestV1 {
        policies: Some(vec![format!("../{policy_file_name}")]),
        resources: Some(vec![ids::RESOURCE_MANIFEST_NAME.to_string()]),
        params: Vec::new(),
        namespaces: Vec::new(),
        test_suites: Some(
            policies
                .iter()
                .map(|policy| TestSuite {
                    policy: policy.clone(),
                    tests: vec![
                        placeholder("ok", Expectation::Admit),
                        placeholder("bad", Expectation::Deny),
                    ],
                })
                .collect(),
        ),
    }
}
