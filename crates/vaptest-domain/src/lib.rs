//! Pure harness core (no IO).
//!
//! Input: a resource pool built elsewhere, a test suite, and a policy engine.
//! Output: one `TestResult` per test case, in declaration order.

#![forbid(unsafe_code)]

pub mod assemble;
pub mod engine;
pub mod input;
pub mod matcher;
pub mod pool;

mod pipeline;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use assemble::assemble;
pub use engine::{CompileError, CompiledPolicy, EvalFault, MatchResult, PolicyEngine, RawDecision};
pub use input::{EvaluationInput, RequestInfo};
pub use matcher::matches;
pub use pipeline::{normalize_decisions, reduce_decisions, run_case, run_suite};
pub use pool::{ResolveError, ResourcePool};
