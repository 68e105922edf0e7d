//! The `init` use case: scaffold a test directory next to a policy file.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitOutput {
    pub test_dir: Utf8PathBuf,
    /// Line to print on success.
    pub message: String,
}

pub fn run_init(policy_file: &Utf8Path) -> anyhow::Result<InitOutput> {
    let outcome = vaptest_repo::scaffold(policy_file)
        .with_context(|| format!("init {policy_file}"))?;
    let message = format!("Test dir is generated at {:?}.", outcome.test_dir.as_str());
    Ok(InitOutput {
        test_dir: outcome.test_dir,
        message,
    })
}
