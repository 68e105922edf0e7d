use crate::convert;
use cel_interpreter::objects::Key;
use cel_interpreter::{Context, Program, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;
use vaptest_domain::{
    CompileError, CompiledPolicy, EvalFault, EvaluationInput, MatchResult, PolicyEngine,
    RawDecision,
};
use vaptest_types::{
    DecisionAction, Evaluation, FailurePolicy, ValidatingAdmissionPolicy, ids,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct CelEngine;

impl CelEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyEngine for CelEngine {
    fn compile(
        &self,
        policy: &ValidatingAdmissionPolicy,
    ) -> Result<Box<dyn CompiledPolicy>, CompileError> {
        check_structure(policy)?;
        let spec = &policy.spec;
        let compiled = CelPolicy {
            failure_policy: policy.failure_policy(),
            variables: spec
                .variables
                .iter()
                .map(|v| (v.name.clone(), Expr::compile(&v.expression)))
                .collect(),
            match_conditions: spec
                .match_conditions
                .iter()
                .map(|c| (c.name.clone(), Expr::compile(&c.expression)))
                .collect(),
            validations: spec
                .validations
                .iter()
                .map(|v| CompiledValidation {
                    expr: Expr::compile(&v.expression),
                    message: v.message.clone(),
                    message_expr: (!v.message_expression.is_empty())
                        .then(|| Expr::compile(&v.message_expression)),
                    reason: if v.reason.is_empty() {
                        ids::DEFAULT_DENY_REASON.to_string()
                    } else {
                        v.reason.clone()
                    },
                })
                .collect(),
        };
        debug!(
            policy = %policy.name(),
            validations = compiled.validations.len(),
            match_conditions = compiled.match_conditions.len(),
            "compiled policy"
        );
        Ok(Box::new(compiled))
    }
}

/// Shape problems that make a policy unusable regardless of input.
fn check_structure(policy: &ValidatingAdmissionPolicy) -> Result<(), CompileError> {
    let fail = |message: String| Err(CompileError::new(policy.name(), message));
    for (i, v) in policy.spec.validations.iter().enumerate() {
        if v.expression.trim().is_empty() {
            return fail(format!("spec.validations[{i}].expression is empty"));
        }
    }
    for (i, c) in policy.spec.match_conditions.iter().enumerate() {
        if c.name.is_empty() {
            return fail(format!("spec.matchConditions[{i}].name is empty"));
        }
        if c.expression.trim().is_empty() {
            return fail(format!("spec.matchConditions[{i}].expression is empty"));
        }
    }
    let mut seen = BTreeSet::new();
    for (i, v) in policy.spec.variables.iter().enumerate() {
        if v.name.is_empty() {
            return fail(format!("spec.variables[{i}].name is empty"));
        }
        if !seen.insert(v.name.as_str()) {
            return fail(format!("spec.variables[{i}].name {:?} is duplicated", v.name));
        }
    }
    Ok(())
}

struct Expr {
    source: String,
    program: Result<Program, String>,
}

impl Expr {
    fn compile(source: &str) -> Self {
        Self {
            source: source.to_string(),
            program: Program::compile(source).map_err(|err| err.to_string()),
        }
    }

    fn execute(&self, ctx: &Context) -> Result<Value, String> {
        match &self.program {
            Ok(program) => program
                .execute(ctx)
                .map_err(|err| format!("expression {:?} resulted in error: {err}", self.source)),
            Err(err) => Err(format!("compilation error: {err}")),
        }
    }
}

struct CompiledValidation {
    expr: Expr,
    message: String,
    message_expr: Option<Expr>,
    reason: String,
}

struct CelPolicy {
    failure_policy: FailurePolicy,
    variables: Vec<(String, Expr)>,
    match_conditions: Vec<(String, Expr)>,
    validations: Vec<CompiledValidation>,
}

impl CelPolicy {
    /// Bind the input and evaluate variables in declaration order. A variable
    /// that fails is left unbound, so only expressions using it fail.
    fn with_context<T>(&self, input: &EvaluationInput, f: impl FnOnce(&Context) -> T) -> T {
        let mut ctx = Context::default();
        ctx.add_variable_from_value("object", convert::optional(input.object.as_ref()));
        ctx.add_variable_from_value("oldObject", convert::optional(input.old_object.as_ref()));
        ctx.add_variable_from_value("params", convert::optional(input.params.as_ref()));
        ctx.add_variable_from_value(
            "namespaceObject",
            convert::optional(input.namespace.as_ref()),
        );
        ctx.add_variable_from_value("request", convert::request(&input.request));

        let mut variables: HashMap<Key, Value> = HashMap::new();
        ctx.add_variable_from_value("variables", convert::map(Vec::<(&str, Value)>::new()));
        for (name, expr) in &self.variables {
            match expr.execute(&ctx) {
                Ok(value) => {
                    variables.insert(Key::String(Arc::new(name.clone())), value);
                    ctx.add_variable_from_value(
                        "variables",
                        Value::Map(cel_interpreter::objects::Map {
                            map: Arc::new(variables.clone()),
                        }),
                    );
                }
                Err(err) => debug!(variable = %name, error = %err, "variable not bound"),
            }
        }
        f(&ctx)
    }

    fn failure_action(&self) -> DecisionAction {
        match self.failure_policy {
            FailurePolicy::Fail => DecisionAction::Deny,
            FailurePolicy::Ignore => DecisionAction::Admit,
        }
    }

    fn decide(&self, rule: &CompiledValidation, ctx: &Context) -> RawDecision {
        match rule.expr.execute(ctx) {
            Ok(Value::Bool(true)) => RawDecision {
                action: DecisionAction::Admit,
                evaluation: Some(Evaluation::Admit),
                message: String::new(),
                reason: String::new(),
            },
            Ok(Value::Bool(false)) => RawDecision {
                action: DecisionAction::Deny,
                evaluation: Some(Evaluation::Deny),
                message: self.deny_message(rule, ctx),
                reason: rule.reason.clone(),
            },
            Ok(other) => self.error_decision(format!(
                "expression {:?} resulted in non-boolean value {other:?}",
                rule.expr.source
            )),
            Err(err) => self.error_decision(err),
        }
    }

    fn error_decision(&self, message: String) -> RawDecision {
        RawDecision {
            action: self.failure_action(),
            evaluation: Some(Evaluation::Error),
            message,
            reason: String::new(),
        }
    }

    fn deny_message(&self, rule: &CompiledValidation, ctx: &Context) -> String {
        if let Some(expr) = &rule.message_expr {
            match expr.execute(ctx) {
                Ok(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
                Ok(other) => debug!(value = ?other, "messageExpression gave no message"),
                Err(err) => debug!(error = %err, "messageExpression failed"),
            }
        }
        if !rule.message.is_empty() {
            return rule.message.clone();
        }
        format!("failed expression: {}", rule.expr.source.trim())
    }
}

impl CompiledPolicy for CelPolicy {
    fn match_conditions(&self, input: &EvaluationInput) -> Option<Result<MatchResult, EvalFault>> {
        if self.match_conditions.is_empty() {
            return None;
        }
        Some(self.with_context(input, |ctx| {
            let mut first_error: Option<(&str, String)> = None;
            for (name, expr) in &self.match_conditions {
                match expr.execute(ctx) {
                    Ok(Value::Bool(true)) => {}
                    Ok(Value::Bool(false)) => return Ok(MatchResult::not_matched(name)),
                    Ok(other) => {
                        first_error.get_or_insert((name.as_str(), format!("non-boolean result {other:?}")));
                    }
                    Err(err) => {
                        first_error.get_or_insert((name.as_str(), err));
                    }
                }
            }
            match (first_error, self.failure_policy) {
                (None, _) => Ok(MatchResult::matched()),
                (Some((name, _)), FailurePolicy::Ignore) => Ok(MatchResult::not_matched(name)),
                (Some((name, message)), FailurePolicy::Fail) => Err(EvalFault::MatchCondition {
                    name: name.to_string(),
                    message,
                }),
            }
        }))
    }

    fn validate(&self, input: &EvaluationInput) -> Result<Vec<RawDecision>, EvalFault> {
        Ok(self.with_context(input, |ctx| {
            self.validations
                .iter()
                .map(|rule| self.decide(rule, ctx))
                .collect()
        }))
    }
}
