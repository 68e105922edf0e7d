use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Group/version/kind identity of an object.
///
/// An empty `group` or `version` means "not specified". On a query this is a
/// wildcard; on a loaded object an empty group is the core API group.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default)]
    pub kind: String,
}

impl Identity {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Split an `apiVersion` (`group/version` or bare `version`) into an identity.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct NamespacedName {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_empty() && !self.name.is_empty() {
            write!(f, "{}/{}", self.namespace, self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Lookup key written in test manifests and used to index loaded objects.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct ResourceRef {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub namespaced_name: NamespacedName,
}

impl ResourceRef {
    pub fn new(identity: Identity, namespaced_name: NamespacedName) -> Self {
        Self {
            identity,
            namespaced_name,
        }
    }

    /// Shorthand for a kind/name query without group, version, or namespace.
    pub fn kind_name(kind: &str, name: &str) -> Self {
        Self::new(Identity::new("", "", kind), NamespacedName::new("", name))
    }

    pub fn kind(&self) -> &str {
        &self.identity.kind
    }

    pub fn name(&self) -> &str {
        &self.namespaced_name.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespaced_name.namespace
    }

    pub fn is_valid(&self) -> bool {
        !self.namespaced_name.name.is_empty() && !self.identity.kind.is_empty()
    }

    /// Identity of a decoded object, read from `apiVersion`, `kind`, and `metadata`.
    ///
    /// Missing fields become empty strings; the result may be invalid.
    pub fn from_object(obj: &Value) -> Self {
        let text = |v: Option<&Value>| v.and_then(Value::as_str).unwrap_or_default().to_string();
        let api_version = text(obj.get("apiVersion"));
        let kind = text(obj.get("kind"));
        let metadata = obj.get("metadata");
        Self {
            identity: Identity::from_api_version(&api_version, &kind),
            namespaced_name: NamespacedName {
                namespace: text(metadata.and_then(|m| m.get("namespace"))),
                name: text(metadata.and_then(|m| m.get("name"))),
            },
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.identity.kind, self.namespaced_name)
    }
}
