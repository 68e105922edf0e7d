//! Text rendering for test results (stdout report).
//!
//! Output is a pure function of its input so fixture runs can be compared
//! byte-for-byte against golden files.

#![forbid(unsafe_code)]

mod report;
mod result;

pub use report::{ManifestSummary, render_manifest, render_run, render_total};
pub use result::{render_result, summary_line};
