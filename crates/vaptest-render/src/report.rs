use crate::result::render_result;
use vaptest_types::TestResult;

const SEPARATOR_WIDTH: usize = 50;

/// Outcome of running one manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManifestSummary {
    pub path: String,
    pub pass: usize,
    pub fail: usize,
    /// Rendered result lines, joined by newlines.
    pub message: String,
    /// The manifest could not be run at all.
    pub harness_error: bool,
}

impl ManifestSummary {
    pub fn from_results(path: &str, results: &[TestResult], verbose: bool) -> Self {
        let pass = results.iter().filter(|r| r.passed()).count();
        Self {
            path: path.to_string(),
            pass,
            fail: results.len() - pass,
            message: results
                .iter()
                .map(|r| render_result(r, verbose))
                .collect::<Vec<_>>()
                .join("\n"),
            harness_error: false,
        }
    }

    /// A manifest that failed before any test ran counts as one failure.
    pub fn harness_failure(path: &str, error: &str) -> Self {
        Self {
            path: path.to_string(),
            pass: 0,
            fail: 1,
            message: format!("FAIL: {error}"),
            harness_error: true,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail
    }
}

pub fn render_total(pass: usize, fail: usize) -> String {
    format!("Total: {}, Pass: {pass}, Fail: {fail}", pass + fail)
}

/// `[path]`, the result lines, the total, then a blank line.
pub fn render_manifest(summary: &ManifestSummary) -> String {
    let mut out = format!("[{}]\n", summary.path);
    if !summary.message.is_empty() {
        out.push_str(&summary.message);
        out.push('\n');
    }
    out.push_str(&render_total(summary.pass, summary.fail));
    out.push_str("\n\n");
    out
}

/// Every manifest in order; runs over more than one manifest end with a
/// separator and the grand total.
pub fn render_run(summaries: &[ManifestSummary]) -> String {
    let mut out: String = summaries.iter().map(render_manifest).collect();
    if summaries.len() > 1 {
        let pass = summaries.iter().map(|s| s.pass).sum();
        let fail = summaries.iter().map(|s| s.fail).sum();
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
        out.push_str(&render_total(pass, fail));
        out.push('\n');
    }
    out
}
