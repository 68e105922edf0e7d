//! Stable value types shared across the vaptest workspace.
//!
//! This crate is intentionally boring:
//! - resource identity (`Identity`, `NamespacedName`, `ResourceRef`)
//! - the policy document model consumed by evaluators
//! - per-rule decisions and the overall verdict
//! - test cases, expectations, and the terminal `TestResult` of one case

#![forbid(unsafe_code)]

pub mod decision;
pub mod ids;
pub mod policy;
pub mod resource;
pub mod result;
pub mod testcase;

pub use decision::{Decision, DecisionAction, Evaluation, Operation};
pub use policy::{
    FailurePolicy, MatchCondition, ObjectMeta, ParamKind, PolicySpec, Validation,
    ValidatingAdmissionPolicy, Variable,
};
pub use resource::{Identity, NamespacedName, ResourceRef};
pub use result::{SetupError, TestResult};
pub use testcase::{Expectation, TestCase, TestSuite, UserInfo};
