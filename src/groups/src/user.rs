//! User and context capabilities consumed by the authorizer
//!
//! The authorizer never owns user records. It only needs something that can
//! report its current role(s), plus a stable identity for logging.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role(s) held by a user, as reported at read time
///
/// A user may hold a single role or several at once. Deserializes from either
/// a JSON string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleValue {
    /// A single role
    Single(String),

    /// Several roles held simultaneously, in the order reported
    Multiple(Vec<String>),
}

impl RoleValue {
    /// Held role names, in reported order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        let roles: &[String] = match self {
            RoleValue::Single(role) => std::slice::from_ref(role),
            RoleValue::Multiple(roles) => roles,
        };
        roles.iter().map(String::as_str)
    }

    /// Held roles as a set, ignoring order and duplicates
    pub fn role_set(&self) -> BTreeSet<&str> {
        self.roles().collect()
    }

    /// Whether both values hold the same set of roles
    ///
    /// `"client"` and `["client"]` are the same holding, as are
    /// `["mod", "client"]` and `["client", "mod", "mod"]`.
    pub fn same_roles(&self, other: &RoleValue) -> bool {
        self.role_set() == other.role_set()
    }

    /// Whether no role is held
    pub fn is_empty(&self) -> bool {
        self.roles().next().is_none()
    }
}

impl Default for RoleValue {
    fn default() -> Self {
        RoleValue::Multiple(Vec::new())
    }
}

impl fmt::Display for RoleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleValue::Single(role) => write!(f, "{}", role),
            RoleValue::Multiple(roles) => write!(f, "[{}]", roles.join(", ")),
        }
    }
}

impl From<&str> for RoleValue {
    fn from(role: &str) -> Self {
        RoleValue::Single(role.to_string())
    }
}

impl From<String> for RoleValue {
    fn from(role: String) -> Self {
        RoleValue::Single(role)
    }
}

impl From<Vec<String>> for RoleValue {
    fn from(roles: Vec<String>) -> Self {
        RoleValue::Multiple(roles)
    }
}

impl From<Vec<&str>> for RoleValue {
    fn from(roles: Vec<&str>) -> Self {
        RoleValue::Multiple(roles.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RoleValue {
    fn from(roles: [&str; N]) -> Self {
        RoleValue::Multiple(roles.iter().map(|role| role.to_string()).collect())
    }
}

/// Authorization context (organization, team, tenant) a user acts within
pub trait AuthContext: Send + Sync {
    /// Stable context identifier, if it has one
    fn auth_id(&self) -> Option<String>;
}

/// User whose roles are checked
///
/// Roles are read once per bind or recalc; implementations should return the
/// current value, not a cached one.
pub trait AuthUser: Send + Sync {
    /// Stable user identifier, used for logging only
    fn auth_id(&self) -> String;

    /// Role(s) the user currently holds, optionally within a context
    fn auth_role(&self, context: Option<&dyn AuthContext>) -> RoleValue;
}
