//! Hook dispatch configuration.

use serde::{Deserialize, Serialize};

/// What the hook manager does when a listener fails during dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerFailurePolicy {
    /// Stop the dispatch and propagate the error; remaining listeners are skipped.
    #[default]
    Abort,
    /// Log the failure, record it in the dispatch report, and keep going.
    Isolate,
}

impl std::fmt::Display for ListenerFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

/// Hook manager settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Listener failure policy, applied uniformly to every dispatch.
    #[serde(default)]
    pub failure_policy: ListenerFailurePolicy,
}
