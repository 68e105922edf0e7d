//! Seam between the harness and the policy evaluator.
//!
//! The harness never interprets policy expressions. It compiles a policy once
//! per suite and then asks the compiled form two questions per test case: does
//! the pre-filter match, and what does each validation rule decide.

use crate::input::EvaluationInput;
use thiserror::Error;
use vaptest_types::{DecisionAction, Evaluation, ValidatingAdmissionPolicy};

/// The policy is malformed and cannot be evaluated at all.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("compile policy {policy:?}: {message}")]
pub struct CompileError {
    pub policy: String,
    pub message: String,
}

impl CompileError {
    pub fn new(policy: &str, message: impl Into<String>) -> Self {
        Self {
            policy: policy.to_string(),
            message: message.into(),
        }
    }
}

/// The evaluator itself failed. A policy-level deny is never a fault.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalFault {
    #[error("match condition {name:?}: {message}")]
    MatchCondition { name: String, message: String },
    #[error("{0}")]
    Evaluator(String),
}

/// Pre-filter outcome. `failed_condition` names the first condition that did
/// not match and is empty when `matches` is true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matches: bool,
    pub failed_condition: String,
}

impl MatchResult {
    pub fn matched() -> Self {
        Self {
            matches: true,
            failed_condition: String::new(),
        }
    }

    pub fn not_matched(condition: &str) -> Self {
        Self {
            matches: false,
            failed_condition: condition.to_string(),
        }
    }
}

/// One rule's result as the evaluator reports it.
///
/// `evaluation` may be unset; the pipeline treats that as a deny.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawDecision {
    pub action: DecisionAction,
    pub evaluation: Option<Evaluation>,
    pub message: String,
    pub reason: String,
}

impl RawDecision {
    pub fn new(evaluation: Option<Evaluation>, message: &str, reason: &str) -> Self {
        let action = match evaluation {
            Some(Evaluation::Admit) => DecisionAction::Admit,
            _ => DecisionAction::Deny,
        };
        Self {
            action,
            evaluation,
            message: message.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub trait PolicyEngine {
    fn compile(
        &self,
        policy: &ValidatingAdmissionPolicy,
    ) -> Result<Box<dyn CompiledPolicy>, CompileError>;
}

pub trait CompiledPolicy {
    /// `None` when the policy declares no match conditions.
    fn match_conditions(&self, input: &EvaluationInput) -> Option<Result<MatchResult, EvalFault>>;

    /// Ordered per-rule decisions, one per validation.
    fn validate(&self, input: &EvaluationInput) -> Result<Vec<RawDecision>, EvalFault>;
}
