//! In-memory store of everything a manifest loads.
//!
//! The pool is filled once per manifest (by the repo adapters) and is read-only
//! while test cases run.

use crate::matcher::matches;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use vaptest_types::{ResourceRef, ValidatingAdmissionPolicy};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Fixtures must be unambiguous; the first match is never picked silently.
    #[error("multiple resources match {query} ({count} found)")]
    Ambiguous { query: ResourceRef, count: usize },
}

#[derive(Clone, Debug, Default)]
pub struct ResourcePool {
    policies: BTreeMap<String, ValidatingAdmissionPolicy>,
    resources: BTreeMap<ResourceRef, Value>,
    params: BTreeMap<ResourceRef, Value>,
    namespaces: BTreeMap<String, Value>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins on a name collision.
    pub fn insert_policy(&mut self, policy: ValidatingAdmissionPolicy) {
        self.policies.insert(policy.name().to_string(), policy);
    }

    /// Keyed by the object's own identity; an identical key overwrites.
    pub fn insert_resource(&mut self, obj: Value) -> ResourceRef {
        let key = ResourceRef::from_object(&obj);
        self.resources.insert(key.clone(), obj);
        key
    }

    pub fn insert_param(&mut self, obj: Value) -> ResourceRef {
        let key = ResourceRef::from_object(&obj);
        self.params.insert(key.clone(), obj);
        key
    }

    pub fn insert_namespace(&mut self, obj: Value) -> String {
        let name = ResourceRef::from_object(&obj).name().to_string();
        self.namespaces.insert(name.clone(), obj);
        name
    }

    pub fn policy(&self, name: &str) -> Option<&ValidatingAdmissionPolicy> {
        self.policies.get(name)
    }

    pub fn policy_names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn namespace(&self, name: &str) -> Option<&Value> {
        self.namespaces.get(name)
    }

    pub fn resolve_resource(&self, query: &ResourceRef) -> Result<Option<&Value>, ResolveError> {
        resolve(&self.resources, query)
    }

    pub fn resolve_param(&self, query: &ResourceRef) -> Result<Option<&Value>, ResolveError> {
        resolve(&self.params, query)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }
}

/// Scan every candidate; zero matches is `Ok(None)`, more than one is an error.
fn resolve<'a>(
    candidates: &'a BTreeMap<ResourceRef, Value>,
    query: &ResourceRef,
) -> Result<Option<&'a Value>, ResolveError> {
    let mut found = candidates
        .iter()
        .filter(|(key, _)| matches(query, key))
        .map(|(_, obj)| obj);
    let first = found.next();
    let others = found.count();
    if others > 0 {
        return Err(ResolveError::Ambiguous {
            query: query.clone(),
            count: others + 1,
        });
    }
    Ok(first)
}
