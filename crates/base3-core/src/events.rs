//! Lifecycle event names fired by the bootstrap sequencer.
//!
//! Events carry no payload beyond their name. Listeners coordinate through
//! the shared container instead.

use serde::{Deserialize, Serialize};

/// The lifecycle events of one bootstrap, in the order they are fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Fired once all hook listeners are registered.
    #[serde(rename = "bootstrap.init")]
    BootstrapInit,
    /// Fired once every discovered plugin has been initialized.
    #[serde(rename = "bootstrap.start")]
    BootstrapStart,
    /// Fired after the container services were published to the host.
    #[serde(rename = "bootstrap.finish")]
    BootstrapFinish,
}

impl LifecycleEvent {
    /// All lifecycle events in firing order.
    pub const ALL: [LifecycleEvent; 3] = [
        Self::BootstrapInit,
        Self::BootstrapStart,
        Self::BootstrapFinish,
    ];

    /// Returns the wire name of this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BootstrapInit => "bootstrap.init",
            Self::BootstrapStart => "bootstrap.start",
            Self::BootstrapFinish => "bootstrap.finish",
        }
    }

    /// Parses a wire name back into a lifecycle event.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for LifecycleEvent {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
