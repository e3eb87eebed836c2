//! Precomputed role hierarchy with cycle-safe transitive closure
//!
//! The graph is an adjacency mapping (role -> directly included roles). Every
//! declared role gets its closure computed once, at build time, with an
//! explicit-stack depth-first traversal and a visited set per root, so cycles,
//! self-references and diamonds all terminate.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use super::RoleHierarchy;

/// Immutable role hierarchy index
///
/// Built once from a [`RoleHierarchy`] and shared read-only (usually behind an
/// `Arc`) by every authorization state bound against it.
///
/// # Examples
///
/// ```rust
/// use cretoai_groups::hierarchy::{HierarchyGraph, RoleHierarchy};
///
/// let graph = HierarchyGraph::build(
///     RoleHierarchy::new()
///         .with_role("user", Vec::<String>::new())
///         .with_role("mod", ["user"])
///         .with_role("admin", ["mod"]),
/// );
///
/// assert_eq!(graph.available_roles(), ["user", "mod", "admin"]);
/// assert!(graph.closure_of("admin").contains("user"));
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyGraph {
    /// Declared role -> directly included roles, in declaration order
    edges: IndexMap<String, Vec<String>>,

    /// Declared role names in configuration order
    declared: Vec<String>,

    /// Declared role -> every role reachable from it (itself included)
    closure: HashMap<String, HashSet<String>>,
}

impl HierarchyGraph {
    /// Builds the graph and its closure table
    ///
    /// Never fails: edges may point at undeclared roles (treated as leaves)
    /// and may form cycles of any length.
    pub fn build(hierarchy: RoleHierarchy) -> Self {
        let edges = hierarchy.into_inner();
        let declared: Vec<String> = edges.keys().cloned().collect();

        let closure: HashMap<String, HashSet<String>> = declared
            .iter()
            .map(|role| (role.clone(), Self::reachable_from(&edges, role)))
            .collect();

        debug!(
            roles = declared.len(),
            edges = edges.values().map(Vec::len).sum::<usize>(),
            "Role hierarchy built"
        );

        Self {
            edges,
            declared,
            closure,
        }
    }

    /// Depth-first walk from `root`, tracking visited roles
    fn reachable_from<'a>(edges: &'a IndexMap<String, Vec<String>>, root: &'a str) -> HashSet<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<&'a str> = vec![root];

        while let Some(role) = stack.pop() {
            if !visited.insert(role.to_string()) {
                continue;
            }

            if let Some(includes) = edges.get(role) {
                stack.extend(
                    includes
                        .iter()
                        .map(String::as_str)
                        .filter(|included| !visited.contains(*included)),
                );
            }
        }

        visited
    }

    /// Declared roles, in configuration order
    pub fn available_roles(&self) -> &[String] {
        &self.declared
    }

    /// Whether the role is part of the declared catalog
    pub fn is_declared(&self, role: &str) -> bool {
        self.edges.contains_key(role)
    }

    /// Roles directly included by `role`, as declared
    ///
    /// Empty for undeclared roles.
    pub fn includes(&self, role: &str) -> &[String] {
        self.edges.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Precomputed closure of a declared role
    pub fn closure(&self, role: &str) -> Option<&HashSet<String>> {
        self.closure.get(role)
    }

    /// Every role reachable from `role`, the role itself included
    ///
    /// An undeclared role degrades to `{role}`.
    pub fn closure_of(&self, role: &str) -> HashSet<String> {
        match self.closure.get(role) {
            Some(reachable) => reachable.clone(),
            None => HashSet::from([role.to_string()]),
        }
    }

    /// Number of declared roles
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Whether no role is declared
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

impl From<RoleHierarchy> for HierarchyGraph {
    fn from(hierarchy: RoleHierarchy) -> Self {
        Self::build(hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_hierarchy() -> HierarchyGraph {
        HierarchyGraph::build(
            RoleHierarchy::new()
                .with_role("user", Vec::<String>::new())
                .with_role("client", ["user"])
                .with_role("mod", ["user"])
                .with_role("dev", ["user"])
                .with_role("admin", ["mod", "dev"]),
        )
    }

    #[test]
    fn test_empty_graph() {
        let graph = HierarchyGraph::build(RoleHierarchy::new());
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.available_roles().is_empty());
    }

    #[test]
    fn test_available_roles_keep_declaration_order() {
        let graph = admin_hierarchy();
        assert_eq!(
            graph.available_roles(),
            ["user", "client", "mod", "dev", "admin"]
        );
    }

    #[test]
    fn test_leaf_closure_is_itself() {
        let graph = admin_hierarchy();
        assert_eq!(graph.closure_of("user"), HashSet::from(["user".to_string()]));
    }

    #[test]
    fn test_diamond_closure() {
        let graph = admin_hierarchy();
        let closure = graph.closure_of("admin");

        assert_eq!(closure.len(), 4);
        for role in ["admin", "mod", "dev", "user"] {
            assert!(closure.contains(role), "missing {}", role);
        }
        assert!(!closure.contains("client"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let graph = HierarchyGraph::build(RoleHierarchy::new().with_role("loop", ["loop"]));
        assert_eq!(graph.closure_of("loop"), HashSet::from(["loop".to_string()]));
    }

    #[test]
    fn test_two_role_cycle() {
        let graph = HierarchyGraph::build(
            RoleHierarchy::new()
                .with_role("role_a", ["role_b"])
                .with_role("role_b", ["role_a"]),
        );

        for role in ["role_a", "role_b"] {
            let closure = graph.closure_of(role);
            assert!(closure.contains("role_a"));
            assert!(closure.contains("role_b"));
            assert_eq!(closure.len(), 2);
        }
    }

    #[test]
    fn test_dangling_edge_is_closure_member() {
        let graph = HierarchyGraph::build(RoleHierarchy::new().with_role("editor", ["ghost"]));

        assert!(graph.closure_of("editor").contains("ghost"));
        assert!(!graph.is_declared("ghost"));
        assert_eq!(graph.available_roles(), ["editor"]);
    }

    #[test]
    fn test_undeclared_role_degrades_to_itself() {
        let graph = admin_hierarchy();
        assert!(graph.closure("nobody").is_none());
        assert_eq!(graph.closure_of("nobody"), HashSet::from(["nobody".to_string()]));
        assert!(graph.includes("nobody").is_empty());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = HierarchyGraph::build(
            RoleHierarchy::new()
                .with_role("base", Vec::<String>::new())
                .with_role("top", ["base", "base", "base"]),
        );

        assert_eq!(graph.includes("top").len(), 3);
        assert_eq!(graph.closure_of("top").len(), 2);
    }

    #[test]
    fn test_roles_are_case_sensitive() {
        let graph = admin_hierarchy();
        assert!(graph.is_declared("admin"));
        assert!(!graph.is_declared("Admin"));
        assert!(!graph.closure_of("admin").contains("USER"));
    }
}
