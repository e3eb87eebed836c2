//! Error types for group authorization

use thiserror::Error;

/// Group authorization errors
///
/// Building a hierarchy and answering membership queries never fail; the only
/// fallible step is turning external configuration into a [`RoleHierarchy`].
///
/// [`RoleHierarchy`]: crate::hierarchy::RoleHierarchy
#[derive(Debug, Error)]
pub enum GroupsError {
    /// Hierarchy configuration could not be parsed
    #[error("Invalid role hierarchy: {0}")]
    InvalidHierarchy(#[from] serde_json::Error),
}

/// Result type for group authorization operations
pub type Result<T> = std::result::Result<T, GroupsError>;
