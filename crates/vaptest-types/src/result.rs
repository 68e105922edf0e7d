//! Terminal result of running one test case, and its pass/fail rule.

use crate::decision::{Decision, Evaluation};
use crate::ids;
use crate::resource::ResourceRef;
use crate::testcase::{Expectation, TestCase};
use thiserror::Error;

/// A problem found while assembling the evaluation input for a test case.
///
/// All of them are collected for one case; none aborts the suite.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("object or oldObject must be given and valid")]
    NoObjectGiven,
    #[error("get object: object not found: {0}")]
    ObjectNotFound(ResourceRef),
    #[error("get object: multiple resources match {query} ({count} found)")]
    AmbiguousObject { query: ResourceRef, count: usize },
    #[error("get oldObject: oldObject not found: {0}")]
    OldObjectNotFound(ResourceRef),
    #[error("get oldObject: multiple resources match {query} ({count} found)")]
    AmbiguousOldObject { query: ResourceRef, count: usize },
    #[error("get param: param name is empty")]
    ParamNameEmpty,
    #[error("get param: param not found: {0}")]
    ParamNotFound(ResourceRef),
    #[error("get param: multiple params match {query} ({count} found)")]
    AmbiguousParam { query: ResourceRef, count: usize },
    #[error(
        "get namespace: namespace is different between object and oldObject ({object:?} != {old_object:?})"
    )]
    NamespaceMismatch { object: String, old_object: String },
    #[error("get namespace: namespace not found: {0}")]
    NamespaceNotFound(String),
}

/// One variant per terminal state of the execution pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestResult {
    /// The evaluator ran; `verdict` is the reduction of `decisions`.
    Evaluated {
        policy: String,
        case: TestCase,
        decisions: Vec<Decision>,
        verdict: Evaluation,
    },
    /// A match condition did not match, so validations never ran.
    Skipped {
        policy: String,
        case: TestCase,
        failed_condition: String,
    },
    SetupError {
        policy: String,
        case: TestCase,
        errors: Vec<SetupError>,
    },
    /// The pre-filter or the evaluator signalled a fault (not a policy deny).
    EvalError {
        policy: String,
        case: TestCase,
        errors: Vec<String>,
    },
    /// The policy could not be compiled at all.
    FatalError {
        policy: String,
        case: TestCase,
        errors: Vec<String>,
    },
    PolicyNotFound { policy: String },
}

impl TestResult {
    pub fn passed(&self) -> bool {
        match self {
            TestResult::Evaluated { case, verdict, .. } => case.expect.is_satisfied_by(*verdict),
            TestResult::Skipped { case, .. } => case.expect == Expectation::Skip,
            TestResult::EvalError { case, .. } => case.expect == Expectation::Error,
            TestResult::SetupError { .. }
            | TestResult::FatalError { .. }
            | TestResult::PolicyNotFound { .. } => false,
        }
    }

    pub fn policy(&self) -> &str {
        match self {
            TestResult::Evaluated { policy, .. }
            | TestResult::Skipped { policy, .. }
            | TestResult::SetupError { policy, .. }
            | TestResult::EvalError { policy, .. }
            | TestResult::FatalError { policy, .. }
            | TestResult::PolicyNotFound { policy } => policy,
        }
    }

    pub fn case(&self) -> Option<&TestCase> {
        match self {
            TestResult::Evaluated { case, .. }
            | TestResult::Skipped { case, .. }
            | TestResult::SetupError { case, .. }
            | TestResult::EvalError { case, .. }
            | TestResult::FatalError { case, .. } => Some(case),
            TestResult::PolicyNotFound { .. } => None,
        }
    }

    /// Label of what actually happened, as printed after `==>`.
    pub fn actual_label(&self) -> &'static str {
        match self {
            TestResult::Evaluated { verdict, .. } => verdict.label(),
            TestResult::Skipped { .. } => ids::LABEL_SKIP,
            TestResult::SetupError { .. } => ids::LABEL_SETUP_ERROR,
            TestResult::EvalError { .. } => ids::LABEL_EVAL_ERROR,
            TestResult::FatalError { .. } => ids::LABEL_FATAL_ERROR,
            TestResult::PolicyNotFound { .. } => ids::LABEL_POLICY_NOT_FOUND,
        }
    }
}
