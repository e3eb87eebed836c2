//! Hierarchy configuration and closure property tests
//!
//! Covers JSON configuration ordering plus reflexivity, transitivity and
//! termination of the closure table over arbitrary (cyclic) graphs.

use super::{HierarchyGraph, RoleHierarchy};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_from_json_preserves_declaration_order() {
    let hierarchy = RoleHierarchy::from_json(
        r#"{ "zeta": [], "alpha": ["zeta"], "mid": ["alpha"] }"#,
    )
    .unwrap();

    assert_eq!(hierarchy.roles().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

    let graph = HierarchyGraph::build(hierarchy);
    assert_eq!(graph.available_roles(), ["zeta", "alpha", "mid"]);
}

#[test]
fn test_from_json_rejects_non_object() {
    assert!(RoleHierarchy::from_json(r#"["user", "admin"]"#).is_err());
    assert!(RoleHierarchy::from_json(r#"{ "user": "admin" }"#).is_err());
}

#[test]
fn test_from_iterator() {
    let hierarchy: RoleHierarchy = [
        ("user", vec![]),
        ("mod", vec!["user"]),
        ("admin", vec!["mod"]),
    ]
    .into_iter()
    .collect();

    assert_eq!(hierarchy.len(), 3);
    let graph = HierarchyGraph::from(hierarchy);
    assert!(graph.closure_of("admin").contains("user"));
}

#[test]
fn test_redeclared_role_keeps_position() {
    let mut hierarchy = RoleHierarchy::new()
        .with_role("user", Vec::<String>::new())
        .with_role("admin", ["user"]);
    hierarchy.insert("user", ["guest"]);

    let graph = HierarchyGraph::build(hierarchy);
    assert_eq!(graph.available_roles(), ["user", "admin"]);
    assert_eq!(graph.includes("user"), ["guest"]);
    assert!(graph.closure_of("admin").contains("guest"));
}

#[test]
fn test_mutual_cycle_closure() {
    let graph = HierarchyGraph::build(
        RoleHierarchy::new()
            .with_role("user", Vec::<String>::new())
            .with_role("client", ["user", "customer"])
            .with_role("customer", ["client", "king"])
            .with_role("king", ["customer"]),
    );

    for role in ["client", "customer", "king"] {
        let closure = graph.closure_of(role);
        assert_eq!(closure.len(), 4, "closure of {}", role);
        for expected in ["user", "client", "customer", "king"] {
            assert!(closure.contains(expected), "{} should include {}", role, expected);
        }
    }
    assert_eq!(graph.closure_of("user").len(), 1);
}

#[test]
fn test_long_ring_terminates() {
    let size = 500;
    let hierarchy: RoleHierarchy = (0..size)
        .map(|i| (format!("role_{}", i), vec![format!("role_{}", (i + 1) % size)]))
        .collect();

    let graph = HierarchyGraph::build(hierarchy);
    assert_eq!(graph.closure_of("role_0").len(), size);
    assert_eq!(graph.closure_of("role_250").len(), size);
}

// ============================================================================
// Property Tests
// ============================================================================

/// Random graphs over a small alphabet so cycles and dangling edges are common
fn arbitrary_hierarchy() -> impl Strategy<Value = RoleHierarchy> {
    prop::collection::vec(
        (0usize..12, prop::collection::vec(0usize..16, 0..5)),
        0..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(role, includes)| {
                (
                    format!("r{}", role),
                    includes.into_iter().map(|i| format!("r{}", i)).collect::<Vec<_>>(),
                )
            })
            .collect::<RoleHierarchy>()
    })
}

/// Reference reachability by fixed-point iteration
fn reachable(graph: &HierarchyGraph, root: &str) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::from([root.to_string()]);
    loop {
        let next: HashSet<String> = seen
            .iter()
            .flat_map(|role| graph.includes(role).iter().cloned())
            .collect();
        let before = seen.len();
        seen.extend(next);
        if seen.len() == before {
            break;
        }
    }
    seen
}

proptest! {
    #[test]
    fn prop_closure_is_reflexive(hierarchy in arbitrary_hierarchy()) {
        let graph = HierarchyGraph::build(hierarchy);
        for role in graph.available_roles() {
            prop_assert!(graph.closure_of(role).contains(role));
        }
    }

    #[test]
    fn prop_closure_is_transitive(hierarchy in arbitrary_hierarchy()) {
        let graph = HierarchyGraph::build(hierarchy);
        for role in graph.available_roles() {
            let closure = graph.closure_of(role);
            for member in &closure {
                prop_assert!(graph.closure_of(member).is_subset(&closure));
            }
        }
    }

    #[test]
    fn prop_closure_matches_reachability(hierarchy in arbitrary_hierarchy()) {
        let graph = HierarchyGraph::build(hierarchy);
        for role in graph.available_roles() {
            prop_assert_eq!(graph.closure_of(role), reachable(&graph, role));
        }
    }

    #[test]
    fn prop_available_roles_follow_declaration(hierarchy in arbitrary_hierarchy()) {
        let declared: Vec<String> = hierarchy.roles().map(str::to_string).collect();
        let graph = HierarchyGraph::build(hierarchy);
        prop_assert_eq!(graph.available_roles(), declared.as_slice());
    }
}
