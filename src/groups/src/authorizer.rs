//! Group authorizer: shared hierarchy, configuration and diagnostics

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::GroupsConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::hierarchy::{HierarchyGraph, RoleHierarchy};
use crate::state::AuthzState;
use crate::user::AuthUser;

/// Role-hierarchy ("groups") authorizer
///
/// Holds the precomputed hierarchy and hands out [`AuthzState`]s. Cloning is
/// cheap; every clone shares the same graph and diagnostics sink, so one
/// instance can be built at startup and handed to every request handler.
///
/// # Examples
///
/// ```rust
/// use cretoai_groups::{Groups, RoleHierarchy};
///
/// let groups = Groups::new(
///     RoleHierarchy::new()
///         .with_role("user", Vec::<String>::new())
///         .with_role("client", ["user"])
///         .with_role("admin", ["client"]),
/// );
///
/// assert_eq!(groups.available_roles(), ["user", "client", "admin"]);
/// assert!(!groups.state().is_in_role("user"));
/// ```
#[derive(Clone)]
pub struct Groups {
    /// Shared, immutable hierarchy
    graph: Arc<HierarchyGraph>,

    /// Authorizer configuration
    config: GroupsConfig,

    /// Sink for non-fatal diagnostics
    diagnostics: Arc<dyn Diagnostics>,
}

impl Groups {
    /// Creates an authorizer with the default configuration
    pub fn new(hierarchy: RoleHierarchy) -> Self {
        Self::with_config(hierarchy, GroupsConfig::default())
    }

    /// Creates an authorizer with a custom configuration
    pub fn with_config(hierarchy: RoleHierarchy, config: GroupsConfig) -> Self {
        let groups = Self {
            graph: Arc::new(HierarchyGraph::build(hierarchy)),
            config,
            diagnostics: Arc::new(TracingDiagnostics),
        };

        info!(
            roles = groups.graph.len(),
            warn_unknown_roles = groups.config.warn_unknown_roles,
            "Group authorizer initialized"
        );

        groups
    }

    /// Creates an authorizer from a JSON hierarchy definition
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(RoleHierarchy::from_json(json)?))
    }

    /// Creates an authorizer around an already built graph
    pub fn from_graph(graph: Arc<HierarchyGraph>) -> Self {
        Self {
            graph,
            config: GroupsConfig::default(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Replaces the configuration
    pub fn configured(mut self, config: GroupsConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes diagnostics to another sink
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Shared hierarchy
    pub fn graph(&self) -> &Arc<HierarchyGraph> {
        &self.graph
    }

    /// Authorizer configuration
    pub fn config(&self) -> &GroupsConfig {
        &self.config
    }

    pub(crate) fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    /// Declared roles, in configuration order
    pub fn available_roles(&self) -> &[String] {
        self.graph.available_roles()
    }

    /// State with no user bound
    pub fn state(&self) -> AuthzState {
        AuthzState::unbound(self.clone())
    }

    /// State bound to `user`, or unbound when `None`
    pub fn for_user(&self, user: Option<Arc<dyn AuthUser>>) -> AuthzState {
        AuthzState::read(self.clone(), user, None)
    }
}

impl fmt::Debug for Groups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Groups")
            .field("roles", &self.graph.available_roles())
            .field("config", &self.config)
            .finish()
    }
}
