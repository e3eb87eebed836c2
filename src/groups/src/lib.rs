//! # CretoAI Groups
//!
//! Role-hierarchy ("groups") authorization:
//! - Ordered role hierarchy configuration (programmatic or JSON)
//! - Cycle-safe transitive closure, precomputed once per hierarchy
//! - Immutable, user-bound authorization state
//! - Staleness detection with identity-preserving recalculation
//! - Non-fatal diagnostics for unknown roles
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cretoai_groups::{AuthContext, AuthUser, Groups, RoleHierarchy, RoleValue};
//!
//! struct Moderator;
//!
//! impl AuthUser for Moderator {
//!     fn auth_id(&self) -> String {
//!         "42".to_string()
//!     }
//!
//!     fn auth_role(&self, _context: Option<&dyn AuthContext>) -> RoleValue {
//!         RoleValue::from(["mod", "client"])
//!     }
//! }
//!
//! let groups = Groups::from_json(
//!     r#"{
//!         "user": [],
//!         "client": ["user"],
//!         "mod": ["user"],
//!         "dev": ["user"],
//!         "admin": ["mod", "dev"]
//!     }"#,
//! )?;
//!
//! let user: Arc<dyn AuthUser> = Arc::new(Moderator);
//! let authz = groups.for_user(Some(user));
//!
//! assert!(authz.is_in_role("client"));
//! assert!(authz.is_in_role("user"));
//! assert!(!authz.is_in_role("admin"));
//! # Ok::<(), cretoai_groups::GroupsError>(())
//! ```

pub mod authorizer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hierarchy;
pub mod state;
pub mod user;

pub use authorizer::Groups;
pub use config::GroupsConfig;
pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::{GroupsError, Result};
pub use hierarchy::{HierarchyGraph, RoleHierarchy};
pub use state::AuthzState;
pub use user::{AuthContext, AuthUser, RoleValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
