use crate::assemble::assemble;
use crate::engine::{CompileError, CompiledPolicy, PolicyEngine, RawDecision};
use crate::pool::ResourcePool;
use tracing::debug;
use vaptest_types::{Decision, Evaluation, TestCase, TestResult, TestSuite, ValidatingAdmissionPolicy};

/// Run every case of one suite, in declaration order.
///
/// A suite naming an unknown policy produces a single `PolicyNotFound` result.
/// The policy is compiled once; if that fails, each case whose inputs assemble
/// cleanly reports the compile error as fatal.
pub fn run_suite(
    engine: &dyn PolicyEngine,
    pool: &ResourcePool,
    suite: &TestSuite,
) -> Vec<TestResult> {
    let Some(policy) = pool.policy(&suite.policy) else {
        debug!(policy = %suite.policy, "policy not found");
        return vec![TestResult::PolicyNotFound {
            policy: suite.policy.clone(),
        }];
    };

    let compiled = engine.compile(policy);
    if let Err(err) = &compiled {
        debug!(policy = %suite.policy, error = %err, "compile failed");
    }
    let compiled = compiled.as_deref();

    suite
        .tests
        .iter()
        .map(|case| run_case(policy, compiled, case, pool))
        .collect()
}

/// Drive one case through assembly, the pre-filter, and validation. The first
/// failing stage decides the result.
pub fn run_case(
    policy: &ValidatingAdmissionPolicy,
    compiled: Result<&dyn CompiledPolicy, &CompileError>,
    case: &TestCase,
    pool: &ResourcePool,
) -> TestResult {
    let name = policy.name().to_string();
    debug!(policy = %name, operation = ?case.declared_operation(), "SETUP");

    let input = match assemble(policy, case, pool) {
        Ok(input) => input,
        Err(errors) => {
            return TestResult::SetupError {
                policy: name,
                case: case.clone(),
                errors,
            };
        }
    };

    let compiled = match compiled {
        Ok(compiled) => compiled,
        Err(err) => {
            return TestResult::FatalError {
                policy: name,
                case: case.clone(),
                errors: vec![err.to_string()],
            };
        }
    };

    debug!(policy = %name, operation = %input.operation(), "RUN");

    if policy.has_match_conditions() {
        match compiled.match_conditions(&input) {
            Some(Err(fault)) => {
                return TestResult::EvalError {
                    policy: name,
                    case: case.clone(),
                    errors: vec![fault.to_string()],
                };
            }
            Some(Ok(result)) if !result.matches => {
                return TestResult::Skipped {
                    policy: name,
                    case: case.clone(),
                    failed_condition: result.failed_condition,
                };
            }
            Some(Ok(_)) | None => {}
        }
    }

    match compiled.validate(&input) {
        Ok(raw) => {
            let decisions = normalize_decisions(raw);
            let verdict = reduce_decisions(&decisions);
            TestResult::Evaluated {
                policy: name,
                case: case.clone(),
                decisions,
                verdict,
            }
        }
        Err(fault) => TestResult::EvalError {
            policy: name,
            case: case.clone(),
            errors: vec![fault.to_string()],
        },
    }
}

/// Fill in unset evaluations: an evaluator that reports no evaluation has denied.
pub fn normalize_decisions(raw: Vec<RawDecision>) -> Vec<Decision> {
    raw.into_iter()
        .map(|d| Decision {
            action: d.action,
            evaluation: d.evaluation.unwrap_or(Evaluation::Deny),
            message: d.message,
            reason: d.reason,
        })
        .collect()
}

/// Error outranks deny, deny outranks admit; no decisions means admit.
pub fn reduce_decisions(decisions: &[Decision]) -> Evaluation {
    let mut verdict = Evaluation::Admit;
    for decision in decisions {
        match decision.evaluation {
            Evaluation::Error => return Evaluation::Error,
            Evaluation::Deny => verdict = Evaluation::Deny,
            Evaluation::Admit => {}
        }
    }
    verdict
}
