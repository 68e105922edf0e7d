use crate::engine::{
    CompileError, CompiledPolicy, EvalFault, MatchResult, PolicyEngine, RawDecision,
};
use crate::input::EvaluationInput;
use crate::pool::ResourcePool;
use serde_json::{Map, Value, json};
use std::cell::Cell;
use std::rc::Rc;
use vaptest_types::{
    MatchCondition, ObjectMeta, ParamKind, PolicySpec, ValidatingAdmissionPolicy,
};

pub fn object(api_version: &str, kind: &str, namespace: &str, name: &str) -> Value {
    let mut metadata = Map::new();
    metadata.insert("name".to_string(), Value::from(name));
    if !namespace.is_empty() {
        metadata.insert("namespace".to_string(), Value::from(namespace));
    }
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": metadata,
    })
}

pub fn namespace(name: &str, labels: &[(&str, &str)]) -> Value {
    let labels: Map<String, Value> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect();
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": { "name": name, "labels": labels },
    })
}

pub fn pool_with(resources: &[Value]) -> ResourcePool {
    let mut pool = ResourcePool::new();
    for obj in resources {
        pool.insert_resource(obj.clone());
    }
    pool
}

pub fn policy(name: &str) -> ValidatingAdmissionPolicy {
    ValidatingAdmissionPolicy {
        api_version: "admissionregistration.k8s.io/v1".to_string(),
        kind: "ValidatingAdmissionPolicy".to_string(),
        metadata: ObjectMeta {
            name: name.to_string(),
        },
        spec: PolicySpec::default(),
    }
}

pub fn param_policy(name: &str, api_version: &str, kind: &str) -> ValidatingAdmissionPolicy {
    let mut p = policy(name);
    p.spec.param_kind = Some(ParamKind {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
    });
    p
}

pub fn match_policy(name: &str) -> ValidatingAdmissionPolicy {
    let mut p = policy(name);
    p.spec.match_conditions.push(MatchCondition {
        name: "only-prod".to_string(),
        expression: "true".to_string(),
    });
    p
}

/// Canned evaluator with call counters.
pub struct StubEngine {
    compile_error: Option<String>,
    matched: Option<Result<MatchResult, EvalFault>>,
    decided: Result<Vec<RawDecision>, EvalFault>,
    compile_calls: Rc<Cell<usize>>,
    validate_calls: Rc<Cell<usize>>,
}

impl StubEngine {
    pub fn deciding(decisions: Vec<RawDecision>) -> Self {
        Self {
            compile_error: None,
            matched: None,
            decided: Ok(decisions),
            compile_calls: Rc::default(),
            validate_calls: Rc::default(),
        }
    }

    pub fn admitting() -> Self {
        Self::deciding(vec![RawDecision::new(
            Some(vaptest_types::Evaluation::Admit),
            "",
            "",
        )])
    }

    pub fn faulting(message: &str) -> Self {
        let mut engine = Self::deciding(Vec::new());
        engine.decided = Err(EvalFault::Evaluator(message.to_string()));
        engine
    }

    pub fn failing_compile(message: &str) -> Self {
        let mut engine = Self::admitting();
        engine.compile_error = Some(message.to_string());
        engine
    }

    pub fn with_match(mut self, result: Result<MatchResult, EvalFault>) -> Self {
        self.matched = Some(result);
        self
    }

    pub fn compile_calls(&self) -> usize {
        self.compile_calls.get()
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.get()
    }
}

struct StubCompiled {
    matched: Option<Result<MatchResult, EvalFault>>,
    decided: Result<Vec<RawDecision>, EvalFault>,
    validate_calls: Rc<Cell<usize>>,
}

impl PolicyEngine for StubEngine {
    fn compile(
        &self,
        policy: &ValidatingAdmissionPolicy,
    ) -> Result<Box<dyn CompiledPolicy>, CompileError> {
        self.compile_calls.set(self.compile_calls.get() + 1);
        if let Some(message) = &self.compile_error {
            return Err(CompileError::new(policy.name(), message.as_str()));
        }
        Ok(Box::new(StubCompiled {
            matched: self.matched.clone(),
            decided: self.decided.clone(),
            validate_calls: Rc::clone(&self.validate_calls),
        }))
    }
}

impl CompiledPolicy for StubCompiled {
    fn match_conditions(&self, _input: &EvaluationInput) -> Option<Result<MatchResult, EvalFault>> {
        self.matched.clone()
    }

    fn validate(&self, _input: &EvaluationInput) -> Result<Vec<RawDecision>, EvalFault> {
        self.validate_calls.set(self.validate_calls.get() + 1);
        self.decided.clone()
    }
}
