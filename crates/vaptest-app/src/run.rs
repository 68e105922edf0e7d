//! The `run` use case: execute manifests and summarise them.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use vaptest_domain::{PolicyEngine, run_suite};
use vaptest_render::{ManifestSummary, render_run};
use vaptest_settings::RunOptions;

#[derive(Clone, Debug)]
pub struct RunInput<'a> {
    pub manifests: &'a [Utf8PathBuf],
    pub options: RunOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutput {
    pub summaries: Vec<ManifestSummary>,
    /// The full stdout report.
    pub text: String,
}

/// How a whole invocation ended. A harness failure outranks a test failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Pass,
    TestFailure,
    HarnessFailure,
}

impl RunOutput {
    pub fn outcome(&self) -> RunOutcome {
        if self.summaries.iter().any(|s| s.harness_error) {
            RunOutcome::HarnessFailure
        } else if self.summaries.iter().any(|s| s.fail > 0) {
            RunOutcome::TestFailure
        } else {
            RunOutcome::Pass
        }
    }
}

pub fn outcome_exit_code(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Pass => 0,
        RunOutcome::HarnessFailure => 1,
        RunOutcome::TestFailure => 2,
    }
}

/// Run manifests one after another. A broken manifest is reported and the
/// rest still run.
pub fn run_manifests(engine: &dyn PolicyEngine, input: RunInput<'_>) -> RunOutput {
    let summaries: Vec<ManifestSummary> = input
        .manifests
        .iter()
        .map(|path| run_manifest(engine, path, input.options))
        .collect();
    let text = render_run(&summaries);
    RunOutput { summaries, text }
}

/// Load one manifest, build its resource pool, and run every suite in order.
pub fn run_manifest(
    engine: &dyn PolicyEngine,
    path: &Utf8Path,
    options: RunOptions,
) -> ManifestSummary {
    let manifest = match vaptest_repo::load_manifest(path) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(manifest = %path, error = %err, "manifest not runnable");
            return ManifestSummary::harness_failure(path.as_str(), &err.to_string());
        }
    };

    let pool = vaptest_repo::build_pool(&manifest);
    let results: Vec<_> = manifest
        .test_suites
        .iter()
        .flat_map(|suite| run_suite(engine, &pool, suite))
        .collect();
    debug!(manifest = %path, results = results.len(), "manifest finished");

    ManifestSummary::from_results(path.as_str(), &results, options.verbose)
}
