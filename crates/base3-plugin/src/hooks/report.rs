//! Dispatch reports.

use serde::{Deserialize, Serialize};

/// A listener failure recorded under the isolate policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerFailureRecord {
    /// Listener that failed.
    pub listener: String,
    /// Rendered error.
    pub error: String,
}

/// Outcome of dispatching one event to all listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Event name.
    pub event: String,
    /// Number of listener invocations, failed ones included.
    pub invoked: usize,
    /// Failures that were isolated instead of aborting the dispatch.
    pub failures: Vec<ListenerFailureRecord>,
}

impl DispatchReport {
    /// Creates an empty report for `event`.
    pub fn new(event: &str) -> Self {
        Self {
            event: event.to_string(),
            invoked: 0,
            failures: Vec::new(),
        }
    }

    /// Returns whether every listener succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
