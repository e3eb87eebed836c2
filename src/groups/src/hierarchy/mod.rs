//! # Role Hierarchy Module
//!
//! Configuration and precomputed index for role ("group") hierarchies.
//!
//! A hierarchy is a directed graph where an edge `A -> B` means "holding A
//! implies holding B". Graphs may contain cycles, self-references and edges to
//! roles that are never declared; all of them are legal.
//!
//! ## Example
//!
//! ```rust
//! use cretoai_groups::hierarchy::{HierarchyGraph, RoleHierarchy};
//!
//! let hierarchy = RoleHierarchy::from_json(
//!     r#"{ "user": [], "client": ["user", "customer"], "customer": ["client"] }"#,
//! )?;
//! let graph = HierarchyGraph::build(hierarchy);
//!
//! assert!(graph.closure_of("customer").contains("user"));
//! # Ok::<(), cretoai_groups::GroupsError>(())
//! ```

pub mod graph;

#[cfg(test)]
mod tests;

pub use graph::HierarchyGraph;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Ordered role hierarchy definition (role -> directly included roles)
///
/// Declaration order is preserved and defines the order of
/// [`HierarchyGraph::available_roles`]. Declaring a role twice replaces its
/// includes but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleHierarchy(IndexMap<String, Vec<String>>);

impl RoleHierarchy {
    /// Creates an empty hierarchy
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Parses a hierarchy from a JSON object, keeping key order
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declares a role and the roles it directly includes
    pub fn with_role<I, S>(mut self, role: impl Into<String>, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(role, includes);
        self
    }

    /// Declares a role in place
    pub fn insert<I, S>(&mut self, role: impl Into<String>, includes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(role.into(), includes.into_iter().map(Into::into).collect());
    }

    /// Declared role names, in order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of declared roles
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no role is declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.0
    }
}

impl<R, I, S> FromIterator<(R, I)> for RoleHierarchy
where
    R: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (R, I)>>(iter: T) -> Self {
        let mut hierarchy = Self::new();
        for (role, includes) in iter {
            hierarchy.insert(role, includes);
        }
        hierarchy
    }
}
