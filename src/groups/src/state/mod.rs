//! # Authorization State
//!
//! Immutable, user-bound snapshots of a role hierarchy.
//!
//! A state captures the user's role(s) once, at bind time, together with the
//! closure of those roles. Membership queries only consult that snapshot.
//! [`AuthzState::recalc`] re-reads the user and hands back the *same* state
//! when nothing changed, so callers can detect changes with
//! [`AuthzState::ptr_eq`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cretoai_groups::{AuthContext, AuthUser, AuthzState, Groups, RoleHierarchy, RoleValue};
//!
//! struct Alice;
//!
//! impl AuthUser for Alice {
//!     fn auth_id(&self) -> String {
//!         "alice".to_string()
//!     }
//!
//!     fn auth_role(&self, _context: Option<&dyn AuthContext>) -> RoleValue {
//!         RoleValue::from("admin")
//!     }
//! }
//!
//! let groups = Groups::new(
//!     RoleHierarchy::new()
//!         .with_role("user", Vec::<String>::new())
//!         .with_role("admin", ["user"]),
//! );
//!
//! let user: Arc<dyn AuthUser> = Arc::new(Alice);
//! let state = groups.for_user(Some(user));
//!
//! assert!(state.is_in_role("user"));
//! assert!(AuthzState::ptr_eq(&state, &state.recalc()));
//! ```


use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::authorizer::Groups;
use crate::hierarchy::HierarchyGraph;
use crate::user::{AuthContext, AuthUser, RoleValue};

/// Immutable authorization snapshot, optionally bound to a user
///
/// Cloning is cheap and clones are the same instance as far as
/// [`AuthzState::ptr_eq`] is concerned.
#[derive(Clone)]
pub struct AuthzState {
    inner: Arc<StateInner>,
}

struct StateInner {
    /// Authorizer the state was produced by (graph, config, diagnostics)
    groups: Groups,

    /// Bound user, if any
    user: Option<Arc<dyn AuthUser>>,

    /// Context the user's roles were read in
    context: Option<Arc<dyn AuthContext>>,

    /// Role value read from the user at bind time
    bound_role: Option<RoleValue>,

    /// Union of the closures of every declared bound role
    effective_roles: HashSet<String>,
}

impl AuthzState {
    /// Binds a graph to a user, using the default configuration
    ///
    /// With no user every membership query is false.
    pub fn bind(graph: Arc<HierarchyGraph>, user: Option<Arc<dyn AuthUser>>) -> Self {
        Groups::from_graph(graph).for_user(user)
    }

    /// State with neither user nor context
    pub(crate) fn unbound(groups: Groups) -> Self {
        Self::resolve(groups, None, None, None)
    }

    /// Reads the user's role(s) and resolves them
    pub(crate) fn read(
        groups: Groups,
        user: Option<Arc<dyn AuthUser>>,
        context: Option<Arc<dyn AuthContext>>,
    ) -> Self {
        let bound_role = user
            .as_ref()
            .map(|user| user.auth_role(context.as_deref()));

        Self::resolve(groups, user, context, bound_role)
    }

    /// Builds a state from an already-read role value
    fn resolve(
        groups: Groups,
        user: Option<Arc<dyn AuthUser>>,
        context: Option<Arc<dyn AuthContext>>,
        bound_role: Option<RoleValue>,
    ) -> Self {
        let mut effective_roles = HashSet::new();

        if let (Some(user), Some(role_value)) = (&user, &bound_role) {
            let graph = groups.graph();

            for role in role_value.roles() {
                match graph.closure(role) {
                    Some(closure) => effective_roles.extend(closure.iter().cloned()),
                    None => debug!(
                        user = %user.auth_id(),
                        role = %role,
                        "User holds undeclared role, ignoring"
                    ),
                }
            }

            debug!(
                user = %user.auth_id(),
                roles = %role_value,
                effective = effective_roles.len(),
                "Authorization state bound"
            );
        }

        Self {
            inner: Arc::new(StateInner {
                groups,
                user,
                context,
                bound_role,
                effective_roles,
            }),
        }
    }

    /// Whether the bound user holds `role`, directly or through the hierarchy
    ///
    /// Always false without a user. A role missing from the catalog is
    /// reported to the diagnostics sink (unless disabled) and yields false.
    pub fn is_in_role(&self, role: &str) -> bool {
        if self.inner.user.is_none() {
            return false;
        }

        let groups = &self.inner.groups;
        if !groups.graph().is_declared(role) {
            if groups.config().warn_unknown_roles {
                groups.diagnostics().unknown_role(role);
            }
            return false;
        }

        self.inner.effective_roles.contains(role)
    }

    /// Re-reads the user's role(s)
    ///
    /// Returns this very instance when no user is bound or when the user
    /// still holds the same set of roles (order and duplicates ignored);
    /// a freshly bound state otherwise.
    pub fn recalc(&self) -> AuthzState {
        let (Some(user), Some(bound_role)) = (&self.inner.user, &self.inner.bound_role) else {
            return self.clone();
        };

        let current = user.auth_role(self.context_ref());
        if current.same_roles(bound_role) {
            return self.clone();
        }

        debug!(
            user = %user.auth_id(),
            from = %bound_role,
            to = %current,
            "User roles changed, rebinding authorization state"
        );

        Self::resolve(
            self.inner.groups.clone(),
            Some(Arc::clone(user)),
            self.inner.context.clone(),
            Some(current),
        )
    }

    /// Binds another user, keeping the context
    ///
    /// Binding the user that is already bound behaves like [`recalc`].
    ///
    /// [`recalc`]: AuthzState::recalc
    pub fn for_user(&self, user: Option<Arc<dyn AuthUser>>) -> AuthzState {
        if same_instance(self.inner.user.as_ref(), user.as_ref()) {
            return self.recalc();
        }

        Self::read(self.inner.groups.clone(), user, self.inner.context.clone())
    }

    /// Binds the same user within another context
    ///
    /// The user's role(s) are read again, in the new context. Passing the
    /// context that is already bound behaves like [`recalc`].
    ///
    /// [`recalc`]: AuthzState::recalc
    pub fn for_context(&self, context: Option<Arc<dyn AuthContext>>) -> AuthzState {
        if same_instance(self.inner.context.as_ref(), context.as_ref()) {
            return self.recalc();
        }

        Self::read(self.inner.groups.clone(), self.inner.user.clone(), context)
    }

    /// Whether two handles refer to the same state instance
    pub fn ptr_eq(a: &AuthzState, b: &AuthzState) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Bound user
    pub fn user(&self) -> Option<&Arc<dyn AuthUser>> {
        self.inner.user.as_ref()
    }

    /// Bound context
    pub fn context(&self) -> Option<&Arc<dyn AuthContext>> {
        self.inner.context.as_ref()
    }

    fn context_ref(&self) -> Option<&dyn AuthContext> {
        self.inner.context.as_deref()
    }

    /// Whether a user is bound
    pub fn is_user_set(&self) -> bool {
        self.inner.user.is_some()
    }

    /// Role value read from the user when this state was bound
    pub fn bound_role(&self) -> Option<&RoleValue> {
        self.inner.bound_role.as_ref()
    }

    /// Every role the bound user effectively holds
    pub fn effective_roles(&self) -> &HashSet<String> {
        &self.inner.effective_roles
    }

    /// Declared roles, in configuration order
    pub fn available_roles(&self) -> &[String] {
        self.inner.groups.available_roles()
    }

    /// Hierarchy the state resolves against
    pub fn graph(&self) -> &Arc<HierarchyGraph> {
        self.inner.groups.graph()
    }
}

impl fmt::Debug for AuthzState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthzState")
            .field("user", &self.inner.user.as_ref().map(|user| user.auth_id()))
            .field(
                "context",
                &self.inner.context.as_ref().and_then(|context| context.auth_id()),
            )
            .field("bound_role", &self.inner.bound_role)
            .field("effective_roles", &self.inner.effective_roles)
            .finish()
    }
}

/// Compares the allocations behind two optional trait objects
fn same_instance<T: ?Sized>(a: Option<&Arc<T>>, b: Option<&Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ()),
        (None, None) => true,
        _ => false,
    }
}
