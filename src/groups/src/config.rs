//! Authorizer configuration

use serde::{Deserialize, Serialize};

/// Group authorizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    /// Report queries for roles missing from the catalog
    ///
    /// Reported on every such query, without deduplication.
    pub warn_unknown_roles: bool,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            warn_unknown_roles: true,
        }
    }
}
