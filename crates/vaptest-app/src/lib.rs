//! Use case orchestration for vaptest.
//!
//! This crate coordinates the repo, domain, and render layers. It is
//! intentionally thin; the evaluator is injected so the CLI decides which one
//! runs.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod init;
mod run;

pub use init::{InitOutput, run_init};
pub use run::{RunInput, RunOutcome, RunOutput, outcome_exit_code, run_manifest, run_manifests};
