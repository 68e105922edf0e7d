use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one validation rule (and of a whole policy once reduced).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Admit,
    Deny,
    Error,
}

impl Evaluation {
    pub fn label(self) -> &'static str {
        match self {
            Evaluation::Admit => "ADMIT",
            Evaluation::Deny => "DENY",
            Evaluation::Error => "ERROR",
        }
    }
}

/// What the API server would do with the request for this rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    #[default]
    Admit,
    Deny,
}

/// One rule's result after normalization: the evaluation is always set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: DecisionAction,
    pub evaluation: Evaluation,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
}

impl Decision {
    pub fn admit() -> Self {
        Self {
            action: DecisionAction::Admit,
            evaluation: Evaluation::Admit,
            message: String::new(),
            reason: String::new(),
        }
    }

    pub fn deny(message: &str, reason: &str) -> Self {
        Self {
            action: DecisionAction::Deny,
            evaluation: Evaluation::Deny,
            message: message.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn error(action: DecisionAction, message: &str) -> Self {
        Self {
            action,
            evaluation: Evaluation::Error,
            message: message.to_string(),
            reason: String::new(),
        }
    }
}

/// Admission operation implied by which of object/oldObject are present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn from_presence(has_object: bool, has_old_object: bool) -> Option<Self> {
        match (has_object, has_old_object) {
            (true, true) => Some(Operation::Update),
            (true, false) => Some(Operation::Create),
            (false, true) => Some(Operation::Delete),
            (false, false) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_follows_presence() {
        assert_eq!(Operation::from_presence(true, true), Some(Operation::Update));
        assert_eq!(Operation::from_presence(true, false), Some(Operation::Create));
        assert_eq!(Operation::from_presence(false, true), Some(Operation::Delete));
        assert_eq!(Operation::from_presence(false, false), None);
    }

    #[test]
    fn labels_are_uppercase() {
        assert_eq!(Evaluation::Admit.label(), "ADMIT");
        assert_eq!(Evaluation::Deny.label(), "DENY");
        assert_eq!(Evaluation::Error.label(), "ERROR");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
    }
}
