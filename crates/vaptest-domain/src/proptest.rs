//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Query-side wildcards in resource matching
//! - Ambiguity detection during resolution
//! - Decision normalization and reduction

use crate::engine::RawDecision;
use crate::matcher::matches;
use crate::pipeline::{normalize_decisions, reduce_decisions};
use crate::pool::{ResolveError, ResourcePool};
use crate::test_support::object;
use proptest::prelude::*;
use vaptest_types::{DecisionAction, Evaluation, Identity, NamespacedName, ResourceRef};

// ============================================================================
// Strategies
// ============================================================================

fn arb_label() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,15}").unwrap()
}

fn arb_kind() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-zA-Z]{0,15}").unwrap()
}

fn arb_version() -> impl Strategy<Value = String> {
    (1u32..5).prop_map(|v| format!("v{v}"))
}

fn arb_evaluation() -> impl Strategy<Value = Option<Evaluation>> {
    prop_oneof![
        Just(None),
        Just(Some(Evaluation::Admit)),
        Just(Some(Evaluation::Deny)),
        Just(Some(Evaluation::Error)),
    ]
}

fn raw(evaluation: Option<Evaluation>) -> RawDecision {
    RawDecision {
        action: DecisionAction::Deny,
        evaluation,
        message: "m".to_string(),
        reason: "r".to_string(),
    }
}

fn api_version(group: &str, version: &str) -> String {
    if group.is_empty() {
        version.to_string()
    } else {
        format!("{group}/{version}")
    }
}

// ============================================================================
// Matching
// ============================================================================

proptest! {
    #[test]
    fn empty_group_and_version_in_query_are_wildcards(
        kind in arb_kind(),
        name in arb_label(),
        namespace in arb_label(),
        (g1, g2) in (arb_label(), arb_label()),
        (v1, v2) in (arb_version(), arb_version()),
    ) {
        let query = ResourceRef::new(
            Identity::new("", "", &kind),
            NamespacedName::new("", &name),
        );
        let a = ResourceRef::new(Identity::new(&g1, &v1, &kind), NamespacedName::new(&namespace, &name));
        let b = ResourceRef::new(Identity::new(&g2, &v2, &kind), NamespacedName::new("", &name));
        prop_assert!(matches(&query, &a));
        prop_assert!(matches(&query, &b));
    }

    #[test]
    fn different_namespaces_never_match(
        kind in arb_kind(),
        name in arb_label(),
        ns_query in arb_label(),
        ns_candidate in arb_label(),
    ) {
        prop_assume!(ns_query != ns_candidate);
        let query = ResourceRef::new(Identity::new("", "", &kind), NamespacedName::new(&ns_query, &name));
        let candidate = ResourceRef::new(
            Identity::new("", "v1", &kind),
            NamespacedName::new(&ns_candidate, &name),
        );
        prop_assert!(!matches(&query, &candidate));
    }

    #[test]
    fn non_empty_query_group_never_matches_empty_candidate_group(
        kind in arb_kind(),
        name in arb_label(),
        group in arb_label(),
    ) {
        let query = ResourceRef::new(Identity::new(&group, "", &kind), NamespacedName::new("", &name));
        let candidate = ResourceRef::new(Identity::new("", "v1", &kind), NamespacedName::new("", &name));
        prop_assert!(!matches(&query, &candidate));
        prop_assert!(matches(&candidate, &candidate));
    }

    #[test]
    fn two_compatible_candidates_are_ambiguous(
        kind in arb_kind(),
        name in arb_label(),
        (ns1, ns2) in (arb_label(), arb_label()),
        group in arb_label(),
        version in arb_version(),
    ) {
        prop_assume!(ns1 != ns2);
        let mut pool = ResourcePool::new();
        pool.insert_resource(object(&api_version(&group, &version), &kind, &ns1, &name));
        pool.insert_resource(object(&api_version(&group, &version), &kind, &ns2, &name));

        let query = ResourceRef::kind_name(&kind, &name);
        let result = pool.resolve_resource(&query);
        prop_assert_eq!(result, Err(ResolveError::Ambiguous { query, count: 2 }));
    }
}

// ============================================================================
// Reduction
// ============================================================================

proptest! {
    #[test]
    fn reduction_follows_precedence(evals in prop::collection::vec(arb_evaluation(), 0..8)) {
        let decisions = normalize_decisions(evals.iter().copied().map(raw).collect());
        let expected = if evals.contains(&Some(Evaluation::Error)) {
            Evaluation::Error
        } else if evals.iter().any(|e| matches!(e, None | Some(Evaluation::Deny))) {
            Evaluation::Deny
        } else {
            Evaluation::Admit
        };
        prop_assert_eq!(reduce_decisions(&decisions), expected);
    }

    #[test]
    fn unset_evaluation_is_a_deny(evals in prop::collection::vec(arb_evaluation(), 0..8)) {
        let as_is = normalize_decisions(evals.iter().copied().map(raw).collect());
        let explicit = normalize_decisions(
            evals
                .iter()
                .map(|e| raw(Some(e.unwrap_or(Evaluation::Deny))))
                .collect(),
        );
        prop_assert_eq!(&as_is, &explicit);
        prop_assert_eq!(reduce_decisions(&as_is), reduce_decisions(&explicit));
    }

    #[test]
    fn reduction_ignores_order(mut evals in prop::collection::vec(arb_evaluation(), 0..8)) {
        let forward = reduce_decisions(&normalize_decisions(evals.iter().copied().map(raw).collect()));
        evals.reverse();
        let backward = reduce_decisions(&normalize_decisions(evals.into_iter().map(raw).collect()));
        prop_assert_eq!(forward, backward);
    }
}
