//! Non-fatal diagnostics raised while answering membership queries
//!
//! Queries always produce a boolean. Conditions worth surfacing (a queried
//! role that is not in the catalog) go to a [`Diagnostics`] sink instead.

use std::sync::Mutex;

use tracing::warn;

/// Sink for authorization diagnostics
pub trait Diagnostics: Send + Sync {
    /// A role that is not part of the declared catalog was queried
    fn unknown_role(&self, role: &str);
}

/// Message emitted for an unknown role
pub fn unknown_role_message(role: &str) -> String {
    format!("Unknown authz role '{}'", role)
}

/// Default sink: structured `warn!` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn unknown_role(&self, role: &str) {
        warn!(role = %role, "{}", unknown_role_message(role));
    }
}

/// Sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    /// Creates an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Number of messages recorded
    pub fn len(&self) -> usize {
        self.messages.lock().map(|messages| messages.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every recorded message
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn unknown_role(&self, role: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(unknown_role_message(role));
        }
    }
}
