//! Input assembly: turn a test case's sparse references into the evaluation
//! bundle, collecting every setup problem instead of stopping at the first.

use crate::input::{EvaluationInput, RequestInfo};
use crate::pool::{ResolveError, ResourcePool};
use serde_json::Value;
use vaptest_types::{
    Operation, ResourceRef, SetupError, TestCase, UserInfo, ValidatingAdmissionPolicy,
};

pub fn assemble(
    policy: &ValidatingAdmissionPolicy,
    case: &TestCase,
    pool: &ResourcePool,
) -> Result<EvaluationInput, Vec<SetupError>> {
    let mut errors = Vec::new();

    if case.valid_object().is_none() && case.valid_old_object().is_none() {
        errors.push(SetupError::NoObjectGiven);
    }

    let object = case.valid_object().and_then(|query| {
        lookup(pool.resolve_resource(query), query, &mut errors, |q, n| match n {
            None => SetupError::ObjectNotFound(q),
            Some(count) => SetupError::AmbiguousObject { query: q, count },
        })
    });
    let old_object = case.valid_old_object().and_then(|query| {
        lookup(pool.resolve_resource(query), query, &mut errors, |q, n| match n {
            None => SetupError::OldObjectNotFound(q),
            Some(count) => SetupError::AmbiguousOldObject { query: q, count },
        })
    });

    let params = match policy.param_kind() {
        None => None,
        Some(param_kind) => match case.valid_param() {
            None => {
                errors.push(SetupError::ParamNameEmpty);
                None
            }
            Some(param) => {
                let query = ResourceRef::new(param_kind.identity(), param.clone());
                lookup(pool.resolve_param(&query), &query, &mut errors, |q, n| match n {
                    None => SetupError::ParamNotFound(q),
                    Some(count) => SetupError::AmbiguousParam { query: q, count },
                })
            }
        },
    };

    let namespace = resolve_namespace(object.as_ref(), old_object.as_ref(), pool, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    let Some(operation) = Operation::from_presence(object.is_some(), old_object.is_some()) else {
        return Err(vec![SetupError::NoObjectGiven]);
    };
    let subject = match operation {
        Operation::Delete => old_object.as_ref(),
        Operation::Create | Operation::Update => object.as_ref(),
    }
    .map(ResourceRef::from_object)
    .unwrap_or_default();

    Ok(EvaluationInput {
        object,
        old_object,
        params,
        namespace,
        request: RequestInfo {
            operation,
            kind: subject.identity,
            namespace: subject.namespaced_name.namespace,
            name: subject.namespaced_name.name,
            user_info: case.user_info.clone().unwrap_or_else(UserInfo::default),
        },
    })
}

/// Record a miss or ambiguity; `count` is `None` for a miss.
fn lookup(
    found: Result<Option<&Value>, ResolveError>,
    query: &ResourceRef,
    errors: &mut Vec<SetupError>,
    to_error: impl FnOnce(ResourceRef, Option<usize>) -> SetupError,
) -> Option<Value> {
    match found {
        Ok(Some(obj)) => Some(obj.clone()),
        Ok(None) => {
            errors.push(to_error(query.clone(), None));
            None
        }
        Err(ResolveError::Ambiguous { count, .. }) => {
            errors.push(to_error(query.clone(), Some(count)));
            None
        }
    }
}

fn resolve_namespace(
    object: Option<&Value>,
    old_object: Option<&Value>,
    pool: &ResourcePool,
    errors: &mut Vec<SetupError>,
) -> Option<Value> {
    let namespace_of = |obj: &Value| ResourceRef::from_object(obj).namespaced_name.namespace;
    let name = match (object.map(namespace_of), old_object.map(namespace_of)) {
        (Some(new), Some(old)) if new != old => {
            errors.push(SetupError::NamespaceMismatch {
                object: new,
                old_object: old,
            });
            return None;
        }
        (Some(name), _) | (None, Some(name)) => name,
        (None, None) => return None,
    };
    if name.is_empty() {
        return None;
    }
    match pool.namespace(&name) {
        Some(ns) => Some(ns.clone()),
        None => {
            errors.push(SetupError::NamespaceNotFound(name));
            None
        }
    }
}
