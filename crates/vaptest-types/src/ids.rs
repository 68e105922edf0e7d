//! Stable identifiers: document kinds, file names, and result labels.

// Document kinds
pub const KIND_POLICY: &str = "ValidatingAdmissionPolicy";
pub const KIND_NAMESPACE: &str = "Namespace";
pub const KIND_LIST: &str = "List";

// Scaffolding
pub const ROOT_MANIFEST_NAME: &str = "vaptest.yaml";
pub const RESOURCE_MANIFEST_NAME: &str = "resources.yaml";
pub const TEST_DIR_SUFFIX: &str = ".test";
pub const PLACEHOLDER_KIND: &str = "Pod";

// Result labels
pub const LABEL_SKIP: &str = "SKIP";
pub const LABEL_SETUP_ERROR: &str = "SETUP ERROR";
pub const LABEL_EVAL_ERROR: &str = "ERROR";
pub const LABEL_FATAL_ERROR: &str = "FATAL ERROR";
pub const LABEL_POLICY_NOT_FOUND: &str = "POLICY NOT FOUND";

// Evaluator defaults
pub const DEFAULT_DENY_REASON: &str = "Invalid";
