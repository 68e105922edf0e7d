use serde_json::Value;
use vaptest_types::{Identity, Operation, UserInfo};

/// Request attributes the evaluator exposes as `request`.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestInfo {
    pub operation: Operation,
    pub kind: Identity,
    pub namespace: String,
    pub name: String,
    pub user_info: UserInfo,
}

/// Everything one test case hands to the evaluator. Objects are cloned out of
/// the pool.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationInput {
    pub object: Option<Value>,
    pub old_object: Option<Value>,
    pub params: Option<Value>,
    pub namespace: Option<Value>,
    pub request: RequestInfo,
}

impl EvaluationInput {
    pub fn operation(&self) -> Operation {
        self.request.operation
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.request.user_info
    }
}
