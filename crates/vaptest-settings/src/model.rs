use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vaptest_types::TestSuite;

/// `vaptest.yaml` schema v1.
///
/// `policies`, `resources`, and `testSuites` are optional here so that a
/// missing section is reported by validation rather than by the YAML parser.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV1 {
    /// Files of concatenated `ValidatingAdmissionPolicy` documents.
    #[serde(
        default,
        alias = "validatingAdmissionPolicies",
        skip_serializing_if = "Option::is_none"
    )]
    pub policies: Option<Vec<String>>,

    /// Files of concatenated objects the tests refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,

    /// Files of `Namespace` objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_suites: Option<Vec<TestSuite>>,
}

/// Options for a `run` invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print detail lines for passing cases too.
    pub verbose: bool,
}
