use crate::decision::{Evaluation, Operation};
use crate::resource::{NamespacedName, ResourceRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared expectation of a test case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Admit,
    Deny,
    Error,
    Skip,
}

impl Expectation {
    pub fn label(self) -> &'static str {
        match self {
            Expectation::Admit => "ADMIT",
            Expectation::Deny => "DENY",
            Expectation::Error => "ERROR",
            Expectation::Skip => "SKIP",
        }
    }

    pub fn is_satisfied_by(self, verdict: Evaluation) -> bool {
        matches!(
            (self, verdict),
            (Expectation::Admit, Evaluation::Admit)
                | (Expectation::Deny, Evaluation::Deny)
                | (Expectation::Error, Evaluation::Error)
        )
    }
}

/// Requesting user as seen by `request.userInfo`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_object: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<NamespacedName>,
    pub expect: Expectation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl TestCase {
    pub fn new(expect: Expectation) -> Self {
        Self {
            object: None,
            old_object: None,
            param: None,
            expect,
            user_info: None,
        }
    }

    pub fn with_object(mut self, object: ResourceRef) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_old_object(mut self, old_object: ResourceRef) -> Self {
        self.old_object = Some(old_object);
        self
    }

    pub fn with_param(mut self, param: NamespacedName) -> Self {
        self.param = Some(param);
        self
    }

    pub fn valid_object(&self) -> Option<&ResourceRef> {
        self.object.as_ref().filter(|r| r.is_valid())
    }

    pub fn valid_old_object(&self) -> Option<&ResourceRef> {
        self.old_object.as_ref().filter(|r| r.is_valid())
    }

    pub fn valid_param(&self) -> Option<&NamespacedName> {
        self.param.as_ref().filter(|p| p.is_valid())
    }

    /// Operation implied by the declared references (not by what was resolved).
    pub fn declared_operation(&self) -> Option<Operation> {
        Operation::from_presence(self.valid_object().is_some(), self.valid_old_object().is_some())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestSuite {
    pub policy: String,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectation_matches_only_its_own_verdict() {
        assert!(Expectation::Admit.is_satisfied_by(Evaluation::Admit));
        assert!(!Expectation::Admit.is_satisfied_by(Evaluation::Deny));
        assert!(Expectation::Error.is_satisfied_by(Evaluation::Error));
        assert!(!Expectation::Skip.is_satisfied_by(Evaluation::Admit));
        assert!(!Expectation::Skip.is_satisfied_by(Evaluation::Deny));
    }

    #[test]
    fn declared_operation_ignores_invalid_refs() {
        let case = TestCase::new(Expectation::Admit)
            .with_object(ResourceRef::kind_name("Pod", "a"))
            .with_old_object(ResourceRef::kind_name("", "missing-kind"));
        assert_eq!(case.declared_operation(), Some(Operation::Create));
    }

    #[test]
    fn parses_full_test_case() {
        let yaml = r#"
object:
  kind: Deployment
  name: new
oldObject:
  group: apps
  version: v1
  kind: Deployment
  namespace: default
  name: old
param:
  namespace: default
  name: limits
expect: deny
userInfo:
  name: alice
  groups: [dev]
  extra:
    scopes: [read]
"#;
        let case: TestCase = serde_yaml_ng::from_str(yaml).expect("parse case");
        assert_eq!(case.expect, Expectation::Deny);
        assert_eq!(case.declared_operation(), Some(Operation::Update));
        assert_eq!(case.valid_param().map(ToString::to_string).as_deref(), Some("default/limits"));
        let user = case.user_info.expect("user info");
        assert_eq!(user.name, "alice");
        assert_eq!(user.extra["scopes"], vec!["read".to_string()]);
    }

    #[test]
    fn unknown_expectation_is_rejected() {
        let err = serde_yaml_ng::from_str::<TestCase>("expect: maybe\n");
        assert!(err.is_err());
    }
}
