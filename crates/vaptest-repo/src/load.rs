use crate::documents::decode_documents;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tracing::{debug, warn};
use vaptest_domain::ResourcePool;
use vaptest_settings::ResolvedManifest;
use vaptest_types::{ResourceRef, ValidatingAdmissionPolicy, ids};

/// Load everything a manifest lists. Never fails; problems are logged.
pub fn build_pool(manifest: &ResolvedManifest) -> ResourcePool {
    let mut pool = ResourcePool::new();
    load_policies(&mut pool, &manifest.policies);
    load_resources(&mut pool, &manifest.resources);
    load_params(&mut pool, &manifest.params);
    load_namespaces(&mut pool, &manifest.namespaces);
    debug!(
        resources = pool.resource_count(),
        params = pool.param_count(),
        namespaces = pool.namespace_count(),
        "resource pool built"
    );
    pool
}

pub fn load_policies(pool: &mut ResourcePool, paths: &[Utf8PathBuf]) {
    for path in paths {
        let Some(text) = read(path) else { continue };
        for doc in decode(&text, path) {
            if let Some(policy) = policy_from_document(doc, path) {
                debug!(name = %policy.name(), "policy loaded");
                pool.insert_policy(policy);
            }
        }
    }
}

pub fn load_resources(pool: &mut ResourcePool, paths: &[Utf8PathBuf]) {
    for path in paths {
        if let Some(text) = read(path) {
            load_resource_text(pool, &text, path.as_str());
        }
    }
}

pub fn load_params(pool: &mut ResourcePool, paths: &[Utf8PathBuf]) {
    for path in paths {
        let Some(text) = read(path) else { continue };
        for doc in decode(&text, path) {
            if let Some(obj) = keyed_object(doc, path.as_str()) {
                let key = pool.insert_param(obj);
                debug!(param = %key, "param loaded");
            }
        }
    }
}

pub fn load_namespaces(pool: &mut ResourcePool, paths: &[Utf8PathBuf]) {
    for path in paths {
        let Some(text) = read(path) else { continue };
        for doc in decode(&text, path) {
            let Some(obj) = keyed_object(doc, path.as_str()) else {
                continue;
            };
            let key = ResourceRef::from_object(&obj);
            if key.kind() != ids::KIND_NAMESPACE {
                debug!(path = %path, kind = %key.kind(), name = %key.name(), "skipped non-Namespace document");
                continue;
            }
            let name = pool.insert_namespace(obj);
            debug!(namespace = %name, "namespace loaded");
        }
    }
}

pub(crate) fn load_resource_text(pool: &mut ResourcePool, text: &str, origin: &str) {
    for doc in decode_documents(text) {
        let doc = match doc {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %origin, error = %err, "failed to decode resource");
                continue;
            }
        };
        if let Some(obj) = keyed_object(doc, origin) {
            let key = pool.insert_resource(obj);
            debug!(resource = %key, "resource loaded");
        }
    }
}

/// Decoded policy names in file order, for scaffolding.
pub(crate) fn policy_names(text: &str, path: &Utf8Path) -> Vec<String> {
    decode(text, path)
        .into_iter()
        .filter_map(|doc| policy_from_document(doc, path))
        .map(|policy| policy.name().to_string())
        .collect()
}

fn read(path: &Utf8Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(path = %path, error = %err, "read yaml file");
            None
        }
    }
}

/// Successfully decoded documents; failures are logged.
fn decode(text: &str, path: &Utf8Path) -> Vec<Value> {
    decode_documents(text)
        .into_iter()
        .filter_map(|doc| match doc {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(path = %path, error = %err, "failed to decode document");
                None
            }
        })
        .collect()
}

fn policy_from_document(doc: Value, path: &Utf8Path) -> Option<ValidatingAdmissionPolicy> {
    let key = ResourceRef::from_object(&doc);
    if key.kind() != ids::KIND_POLICY {
        debug!(path = %path, kind = %key.kind(), name = %key.name(), "skipped non-ValidatingAdmissionPolicy document");
        return None;
    }
    match serde_json::from_value::<ValidatingAdmissionPolicy>(doc) {
        Ok(policy) if policy.name().is_empty() => {
            warn!(path = %path, "skipped ValidatingAdmissionPolicy without a name");
            None
        }
        Ok(policy) => Some(policy),
        Err(err) => {
            warn!(path = %path, name = %key.name(), error = %err, "failed to decode ValidatingAdmissionPolicy");
            None
        }
    }
}

/// Objects need a mapping body with `kind` and `metadata.name` to be indexed.
fn keyed_object(doc: Value, origin: &str) -> Option<Value> {
    if !doc.is_object() {
        warn!(path = %origin, "skipped document that is not a mapping");
        return None;
    }
    if !ResourceRef::from_object(&doc).is_valid() {
        warn!(path = %origin, "skipped object without kind or metadata.name");
        return None;
    }
    Some(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write file");
        Utf8PathBuf::from_path_buf(path).expect("utf8 path")
    }

    const POLICIES: &str = r#"
apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingAdmissionPolicy
metadata:
  name: first
spec:
  validations:
    - expression: "true"
---
apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingAdmissionPolicyBinding
metadata:
  name: binding
---
apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingAdmissionPolicy
metadata:
  name: broken
spec:
  validations: "not a list"
---
apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingAdmissionPolicy
metadata:
  name: second
"#;

    #[test]
    fn loads_only_decodable_policies() {
        let tmp = TempDir::new().expect("temp dir");
        let path = write_file(&tmp, "policy.yaml", POLICIES);
        let mut pool = ResourcePool::new();
        load_policies(&mut pool, &[path]);
        assert_eq!(pool.policy_names().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn missing_files_are_skipped() {
        let tmp = TempDir::new().expect("temp dir");
        let good = write_file(&tmp, "resources.yaml", "apiVersion: v1\nkind: Pod\nmetadata:\n  name: a\n");
        let missing = Utf8PathBuf::from_path_buf(tmp.path().join("nope.yaml")).expect("utf8");
        let mut pool = ResourcePool::new();
        load_resources(&mut pool, &[missing, good]);
        assert_eq!(pool.resource_count(), 1);
    }

    #[test]
    fn resources_need_kind_and_name() {
        let mut pool = ResourcePool::new();
        let text = r#"
apiVersion: v1
kind: Pod
metadata:
  name: a
---
apiVersion: v1
kind: Pod
metadata: {}
---
- just
- a list
---
apiVersion: v1
kind: List
items:
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: b
      namespace: default
"#;
        load_resource_text(&mut pool, text, "inline");
        assert_eq!(pool.resource_count(), 2);
        assert!(
            pool.resolve_resource(&ResourceRef::kind_name("ConfigMap", "b"))
                .expect("resolve")
                .is_some()
        );
    }

    #[test]
    fn syntax_error_skips_rest_of_file_only() {
        let tmp = TempDir::new().expect("temp dir");
        let broken = write_file(
            &tmp,
            "broken.yaml",
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: early\n---\nkind: [unclosed\n---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: late\n",
        );
        let next = write_file(&tmp, "next.yaml", "apiVersion: v1\nkind: Pod\nmetadata:\n  name: other\n");
        let mut pool = ResourcePool::new();
        load_resources(&mut pool, &[broken, next]);

        assert_eq!(pool.resource_count(), 2);
        let found = |name: &str| {
            pool.resolve_resource(&ResourceRef::kind_name("Pod", name))
                .expect("resolve")
                .is_some()
        };
        assert!(found("early"));
        assert!(!found("late"));
        assert!(found("other"));
    }

    #[test]
    fn namespace_files_keep_only_namespaces() {
        let tmp = TempDir::new().expect("temp dir");
        let path = write_file(
            &tmp,
            "namespaces.yaml",
            "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: team-a\n---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: team-b\n",
        );
        let mut pool = ResourcePool::new();
        load_namespaces(&mut pool, &[path]);
        assert!(pool.namespace("team-a").is_some());
        assert!(pool.namespace("team-b").is_none());
    }

    #[test]
    fn params_go_to_their_own_pool() {
        let tmp = TempDir::new().expect("temp dir");
        let path = write_file(
            &tmp,
            "params.yaml",
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: limits\n  namespace: default\ndata:\n  max: \"5\"\n",
        );
        let mut pool = ResourcePool::new();
        load_params(&mut pool, &[path]);
        assert_eq!(pool.param_count(), 1);
        assert_eq!(pool.resource_count(), 0);
    }

    #[test]
    fn policy_names_follow_file_order() {
        let names = policy_names(POLICIES, Utf8Path::new("policy.yaml"));
        assert_eq!(names, vec!["first", "second"]);
    }
}
