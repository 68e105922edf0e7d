use vaptest_types::ResourceRef;

/// Does the sparse `query` (from a test case) select the loaded `candidate`?
///
/// Wildcards live on the query side only: an empty namespace, group, or version
/// in the query leaves that field unconstrained, while an empty field on the
/// candidate is an ordinary value that a non-empty query field will not match.
pub fn matches(query: &ResourceRef, candidate: &ResourceRef) -> bool {
    if !query.is_valid() || !candidate.is_valid() {
        return false;
    }
    if query.name() != candidate.name() || query.kind() != candidate.kind() {
        return false;
    }
    field_matches(query.namespace(), candidate.namespace())
        && field_matches(&query.identity.group, &candidate.identity.group)
        && field_matches(&query.identity.version, &candidate.identity.version)
}

fn field_matches(query: &str, candidate: &str) -> bool {
    query.is_empty() || query == candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaptest_types::{Identity, NamespacedName};

    fn r(group: &str, version: &str, kind: &str, namespace: &str, name: &str) -> ResourceRef {
        ResourceRef::new(
            Identity::new(group, version, kind),
            NamespacedName::new(namespace, name),
        )
    }

    #[test]
    fn table() {
        let cases = [
            // (query, candidate, want)
            (r("", "", "Pod", "", "a"), r("", "v1", "Pod", "default", "a"), true),
            (r("", "v1", "Pod", "", "a"), r("", "v1", "Pod", "", "a"), true),
            (r("apps", "", "Deployment", "", "a"), r("apps", "v1", "Deployment", "", "a"), true),
            (r("apps", "v1", "Deployment", "ns", "a"), r("apps", "v1", "Deployment", "ns", "a"), true),
            (r("", "", "Deployment", "ns", "a"), r("apps", "v1", "Deployment", "ns", "a"), true),
            (r("", "", "Pod", "", "a"), r("", "", "Pod", "", "b"), false),
            (r("", "", "Pod", "", "a"), r("", "", "pod", "", "a"), false),
            (r("", "", "Pod", "ns", "a"), r("", "", "Pod", "other", "a"), false),
            (r("", "", "Pod", "ns", "a"), r("", "", "Pod", "", "a"), false),
            (r("apps", "", "Deployment", "", "a"), r("extensions", "v1", "Deployment", "", "a"), false),
            (r("", "v2", "Thing", "", "a"), r("example.com", "v1", "Thing", "", "a"), false),
            (r("", "", "", "", "a"), r("", "", "", "", "a"), false),
            (r("", "", "Pod", "", ""), r("", "", "Pod", "", ""), false),
        ];
        for (query, candidate, want) in cases {
            assert_eq!(
                matches(&query, &candidate),
                want,
                "query={query:?} candidate={candidate:?}"
            );
        }
    }

    /// An earlier matcher treated an empty field on either side as a wildcard.
    /// Only the query side may be sparse.
    #[test]
    fn candidate_side_empty_fields_are_not_wildcards() {
        let query = r("apps", "v1", "Deployment", "team-a", "web");
        let candidate = r("", "", "Deployment", "", "web");
        assert!(!matches(&query, &candidate));
        assert!(matches(&candidate, &query));
    }
}
